//! HS256 JSON Web Tokens: the Auth Context Provider used by the binary.

use async_trait::async_trait;
use chrono::Utc;
use domains::{AuthContext, AuthProvider, DomainError, TokenIssuer, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// user id
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct JwtAuthProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtAuthProvider {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    fn unauthorized() -> DomainError {
        DomainError::Unauthorized("Token is not valid".to_string())
    }
}

impl TokenIssuer for JwtAuthProvider {
    fn issue(&self, user: UserId) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims { sub: user.to_string(), iat: now, exp: now + self.ttl_secs };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn resolve(&self, credential: &str) -> Result<AuthContext, DomainError> {
        let data = decode::<Claims>(credential, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected token");
            Self::unauthorized()
        })?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| Self::unauthorized())?;
        Ok(AuthContext::new(UserId(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issued_token_resolves_to_same_user() {
        let provider = JwtAuthProvider::new(b"test-secret", 3600);
        let user = UserId::new();
        let token = provider.issue(user).unwrap();
        let ctx = provider.resolve(&token).await.unwrap();
        assert_eq!(ctx.user_id, user);
    }

    #[tokio::test]
    async fn test_foreign_or_garbage_tokens_rejected() {
        let ours = JwtAuthProvider::new(b"test-secret", 3600);
        let theirs = JwtAuthProvider::new(b"other-secret", 3600);
        let token = theirs.issue(UserId::new()).unwrap();

        assert!(matches!(ours.resolve(&token).await, Err(DomainError::Unauthorized(_))));
        assert!(matches!(ours.resolve("garbage").await, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let provider = JwtAuthProvider::new(b"test-secret", -60);
        let token = provider.issue(UserId::new()).unwrap();
        assert!(matches!(provider.resolve(&token).await, Err(DomainError::Unauthorized(_))));
    }
}
