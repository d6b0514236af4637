//! # services
//!
//! Business logic for registration, posts and likes. Each service holds its
//! ports as trait objects so the binary can pick adapters at startup.

pub mod like_service;
pub mod ownership;
pub mod post_service;
pub mod user_service;
pub mod validation;

pub use like_service::LikeService;
pub use post_service::PostService;
pub use user_service::UserService;

use chrono::{DateTime, SubsecRound, Utc};
use domains::DomainError;

/// Current time truncated to microseconds, the precision Postgres
/// `TIMESTAMPTZ` keeps, so a stored record reads back unchanged.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Logs an infrastructure failure and collapses it into [`DomainError::Storage`].
pub(crate) fn storage_error(err: anyhow::Error) -> DomainError {
    tracing::error!(error = ?err, "storage failure");
    DomainError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    #[test]
    fn test_now_has_microsecond_precision() {
        for _ in 0..100 {
            assert_eq!(super::now().nanosecond() % 1_000, 0);
        }
    }
}
