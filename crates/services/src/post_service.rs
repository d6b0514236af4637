//! Post store accessor: create, read and owner-only delete.

use std::sync::Arc;

use domains::{
    AuthContext, AuthorSnapshot, DomainError, Post, PostId, PostRepository, Result,
    UserRepository,
};
use tracing::info;

use crate::ownership::ensure_owner;
use crate::{now, storage_error};
use crate::validation::validate_post_text;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Persists a post owned by the caller. The text is stored verbatim and
    /// the author's current name and avatar are copied into the post.
    #[tracing::instrument(skip(self, text), fields(caller = %author.user_id))]
    pub async fn create(&self, author: &AuthContext, text: &str) -> Result<Post> {
        validate_post_text(text)?;

        let user = self
            .users
            .find_by_id(author.user_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::Unauthorized("caller account does not exist".to_string()))?;

        let post = Post {
            id: PostId::new(),
            user: user.id,
            text: text.to_string(),
            author: AuthorSnapshot { name: user.name, avatar: user.avatar },
            likes: Vec::new(),
            created_at: now(),
        };
        self.posts.insert(&post).await.map_err(storage_error)?;

        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    /// All posts, newest first with a stable tie-break on id.
    pub async fn list(&self) -> Result<Vec<Post>> {
        let mut posts = self.posts.list().await.map_err(storage_error)?;
        posts.sort_by(Post::feed_order);
        Ok(posts)
    }

    pub async fn get_by_id(&self, id: PostId) -> Result<Post> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(DomainError::post_not_found)
    }

    /// Removes a post. Only its owner may do so; anyone else gets
    /// [`DomainError::Unauthorized`] and the post is left untouched.
    #[tracing::instrument(skip(self), fields(caller = %caller.user_id))]
    pub async fn delete_by_id(&self, id: PostId, caller: &AuthContext) -> Result<()> {
        let post = self.get_by_id(id).await?;
        ensure_owner(&post, caller)?;

        // Someone else (the owner, on another request) may have won the race.
        if !self.posts.delete(id).await.map_err(storage_error)? {
            return Err(DomainError::post_not_found());
        }
        info!("post removed");
        Ok(())
    }
}
