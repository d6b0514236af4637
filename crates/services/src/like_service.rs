//! Like toggle engine.
//!
//! Per (post, user) pair there are two states, NotLiked and Liked. Each
//! transition is a single atomic call on the [`LikeRepository`]; a request
//! for the state the pair is already in fails without writing.

use std::sync::Arc;

use domains::{
    DomainError, Like, LikeMutation, LikeRepository, PostId, Result, UserId,
};
use tracing::info;

use crate::storage_error;

pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(likes: Arc<dyn LikeRepository>) -> Self {
        Self { likes }
    }

    /// NotLiked → Liked. The caller goes to the head of the list.
    #[tracing::instrument(skip(self))]
    pub async fn like(&self, post: PostId, caller: UserId) -> Result<Vec<Like>> {
        match self.likes.add_like(post, caller).await.map_err(storage_error)? {
            LikeMutation::Applied(likes) => {
                info!(count = likes.len(), "post liked");
                Ok(likes)
            }
            LikeMutation::Unchanged => Err(DomainError::AlreadyLiked),
            LikeMutation::PostMissing => Err(DomainError::post_not_found()),
        }
    }

    /// Liked → NotLiked. Exactly the caller's entry is removed.
    #[tracing::instrument(skip(self))]
    pub async fn unlike(&self, post: PostId, caller: UserId) -> Result<Vec<Like>> {
        match self.likes.remove_like(post, caller).await.map_err(storage_error)? {
            LikeMutation::Applied(likes) => {
                info!(count = likes.len(), "post unliked");
                Ok(likes)
            }
            LikeMutation::Unchanged => Err(DomainError::NotLiked),
            LikeMutation::PostMissing => Err(DomainError::post_not_found()),
        }
    }
}
