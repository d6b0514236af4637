//! Gravatar-backed `AvatarResolver`.
//!
//! Gravatar accepts a SHA-256 of the trimmed, lowercased email. The URL is
//! computed locally; nothing is fetched.

use domains::AvatarResolver;
use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

pub struct GravatarResolver {
    /// Query string appended to every URL: size, rating, fallback image
    query: String,
}

impl GravatarResolver {
    pub fn new(size: u32, rating: &str, fallback: &str) -> Self {
        Self { query: format!("s={size}&r={rating}&d={fallback}") }
    }
}

impl Default for GravatarResolver {
    /// 200px, PG-rated, "mystery person" silhouette when no avatar exists.
    fn default() -> Self {
        Self::new(200, "pg", "mm")
    }
}

impl AvatarResolver for GravatarResolver {
    fn avatar_url(&self, email: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.trim().to_lowercase().as_bytes());
        let digest = hex::encode(hasher.finalize());
        format!("{GRAVATAR_BASE}/{digest}?{}", self.query)
    }
}
