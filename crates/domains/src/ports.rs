//! # Ports
//!
//! Every adapter must implement these traits to be wired into the binary.
//! Repositories report infrastructure failure through `anyhow::Result`;
//! outcomes the store itself decides (a taken email, a like already present)
//! come back as typed values so the services can turn them into
//! [`DomainError`](crate::errors::DomainError) variants.

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::models::{AuthContext, Like, Post, PostId, User, UserId};

/// Result of inserting a user. The store checks email uniqueness atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInsert {
    Created,
    EmailTaken,
}

/// Result of an atomic like/unlike on one (post, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeMutation {
    /// The set changed; carries the like list after the change.
    Applied(Vec<Like>),
    /// The pair was already in the requested state. Nothing was written.
    Unchanged,
    /// No post with that id (never existed or deleted).
    PostMissing,
}

/// User persistence.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up by normalized email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;
    async fn insert(&self, user: &User) -> anyhow::Result<UserInsert>;
    async fn count(&self) -> anyhow::Result<u64>;
}

/// Post persistence. Deleting a post also drops its likes.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>>;
    async fn list(&self) -> anyhow::Result<Vec<Post>>;
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: PostId) -> anyhow::Result<bool>;
}

/// Set semantics over (post, user) with insertion order.
/// Both operations must be atomic per pair.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Adds the pair at the head of the list unless already present.
    async fn add_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation>;
    /// Removes the pair if present.
    async fn remove_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation>;
}

/// Salted, deliberately slow password hashing.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, raw: &str) -> anyhow::Result<String>;
    /// `Ok(false)` on mismatch; `Err` only for a malformed stored hash.
    async fn verify(&self, raw: &str, hash: &str) -> anyhow::Result<bool>;
}

/// Derives a deterministic avatar URL from an email.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait AvatarResolver: Send + Sync {
    fn avatar_url(&self, email: &str) -> String;
}

/// Auth Context Provider: resolves a caller identity from a credential.
/// The core never parses credentials itself.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Rejected credentials surface as [`DomainError::Unauthorized`].
    async fn resolve(&self, credential: &str) -> Result<AuthContext, DomainError>;
}

/// Issues credentials that an [`AuthProvider`] will later accept.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: UserId) -> anyhow::Result<String>;
}
