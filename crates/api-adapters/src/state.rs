//! State shared across all request handlers.

use std::sync::Arc;

use domains::{AuthProvider, TokenIssuer};
use services::{LikeService, PostService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub likes: Arc<LikeService>,
    /// Resolves callers on every authenticated route
    pub auth: Arc<dyn AuthProvider>,
    /// Hands out credentials after register/login
    pub tokens: Arc<dyn TokenIssuer>,
}
