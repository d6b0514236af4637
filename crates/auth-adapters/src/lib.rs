//! # auth-adapters
//!
//! Identity-related adapters: Argon2 password hashing, Gravatar avatar URLs,
//! and (behind `auth-jwt`) the JWT Auth Context Provider.

pub mod avatar;
pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use avatar::GravatarResolver;
pub use password::Argon2PasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtAuthProvider;
