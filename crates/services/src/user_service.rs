//! Identity registrar: account creation and credential checks.

use std::sync::Arc;

use domains::{
    AuthContext, AvatarResolver, DomainError, PasswordHasher, PublicUser, Result, User, UserId,
    UserInsert, UserRepository,
};
use tracing::{info, warn};

use crate::{now, storage_error};
use crate::validation::{normalize_email, validate_email, validate_name, validate_password};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    avatars: Arc<dyn AvatarResolver>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        avatars: Arc<dyn AvatarResolver>,
    ) -> Self {
        Self { users, hasher, avatars }
    }

    /// Creates an account.
    ///
    /// An email already on file fails with [`DomainError::AccountExists`]
    /// before anything is hashed or written.
    #[tracing::instrument(skip(self, name, email, raw_password))]
    pub async fn register(&self, name: &str, email: &str, raw_password: &str) -> Result<UserId> {
        validate_name(name)?;
        validate_email(email)?;
        validate_password(raw_password)?;

        let email = normalize_email(email);
        let existing = self.users.find_by_email(&email).await.map_err(storage_error)?;
        if existing.is_some() {
            info!("registration rejected: email already on file");
            return Err(DomainError::AccountExists);
        }

        let avatar = self.avatars.avatar_url(&email);
        let password_hash = self.hasher.hash(raw_password).await.map_err(storage_error)?;

        let user = User {
            id: UserId::new(),
            name: name.trim().to_string(),
            email,
            password_hash,
            avatar,
            created_at: now(),
        };

        match self.users.insert(&user).await.map_err(storage_error)? {
            UserInsert::Created => {
                info!(user_id = %user.id, "user registered");
                Ok(user.id)
            }
            // Lost a race against a concurrent registration with the same email.
            UserInsert::EmailTaken => {
                warn!("registration rejected at insert: email taken concurrently");
                Err(DomainError::AccountExists)
            }
        }
    }

    /// Checks an email/password pair. Unknown email and wrong password are
    /// reported identically.
    #[tracing::instrument(skip(self, email, raw_password))]
    pub async fn authenticate(&self, email: &str, raw_password: &str) -> Result<UserId> {
        validate_email(email)?;
        if raw_password.is_empty() {
            return Err(DomainError::validation("Password is required"));
        }

        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await.map_err(storage_error)? else {
            return Err(DomainError::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify(raw_password, &user.password_hash)
            .await
            .map_err(storage_error)?;
        if !matches {
            info!(user_id = %user.id, "password mismatch");
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user.id)
    }

    /// The caller's own account, without the password hash.
    pub async fn profile(&self, caller: &AuthContext) -> Result<PublicUser> {
        self.users
            .find_by_id(caller.user_id)
            .await
            .map_err(storage_error)?
            .map(|user| PublicUser::from(&user))
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    }

    pub async fn user_count(&self) -> Result<u64> {
        self.users.count().await.map_err(storage_error)
    }
}
