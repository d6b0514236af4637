//! Authorization guard for owned resources.
//!
//! Every mutating operation on an [`Owned`] resource calls [`ensure_owner`]
//! after fetching it and before touching storage.

use domains::{AuthContext, DomainError, Owned, Result};

pub fn ensure_owner<R: Owned + ?Sized>(resource: &R, caller: &AuthContext) -> Result<()> {
    if resource.owner() != caller.user_id {
        tracing::warn!(
            owner = %resource.owner(),
            caller = %caller.user_id,
            "ownership check failed"
        );
        return Err(DomainError::Unauthorized("User not authorized".to_string()));
    }
    Ok(())
}
