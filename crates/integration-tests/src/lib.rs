//! Shared wiring for the cross-crate tests: the real services over the
//! in-memory store, with the real Argon2 hasher (at a low cost) and the
//! Gravatar resolver.

use std::sync::Arc;

use auth_adapters::{Argon2PasswordHasher, GravatarResolver};
use domains::{AuthContext, UserId};
use services::{LikeService, PostService, UserService};
use storage_adapters::InMemoryStore;

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub users: UserService,
    pub posts: PostService,
    pub likes: LikeService,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let hasher = Argon2PasswordHasher::with_params(1024, 1, 1)
            .expect("static argon2 parameters are valid");
        Self {
            users: UserService::new(
                store.clone(),
                Arc::new(hasher),
                Arc::new(GravatarResolver::default()),
            ),
            posts: PostService::new(store.clone(), store.clone()),
            likes: LikeService::new(store.clone()),
            store,
        }
    }

    /// Registers with a fixed valid password and returns the caller context.
    pub async fn register(&self, name: &str, email: &str) -> AuthContext {
        let id: UserId = self
            .users
            .register(name, email, "secret1")
            .await
            .expect("registration should succeed");
        AuthContext::new(id)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
