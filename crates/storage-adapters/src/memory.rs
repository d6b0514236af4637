//! # In-memory store
//!
//! DashMap-backed implementation of every repository port. Used when no
//! database is configured and by the test suites.
//!
//! A post and its like list live in one map entry, so a like/unlike runs
//! entirely under that entry's write guard and removing the entry makes the
//! post (and its likes) disappear in one step.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Like, LikeMutation, LikeRepository, Post, PostId, PostRepository, User, UserId, UserInsert,
    UserRepository,
};

#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    /// normalized email → owner; the uniqueness index
    emails: DashMap<String, UserId>,
    posts: DashMap<PostId, Post>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn insert(&self, user: &User) -> anyhow::Result<UserInsert> {
        // The email entry stays locked until the user row is in place.
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Ok(UserInsert::EmailTaken),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(UserInsert::Created)
            }
        }
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.users.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> anyhow::Result<()> {
        match self.posts.entry(post.id) {
            Entry::Occupied(_) => anyhow::bail!("duplicate post id {}", post.id),
            Entry::Vacant(slot) => {
                slot.insert(post.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|post| post.value().clone()))
    }

    async fn list(&self) -> anyhow::Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|post| post.value().clone()).collect();
        posts.sort_by(Post::feed_order);
        Ok(posts)
    }

    async fn delete(&self, id: PostId) -> anyhow::Result<bool> {
        Ok(self.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn add_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation> {
        let Some(mut entry) = self.posts.get_mut(&post) else {
            return Ok(LikeMutation::PostMissing);
        };
        if entry.is_liked_by(user) {
            return Ok(LikeMutation::Unchanged);
        }
        entry.likes.insert(0, Like { user });
        Ok(LikeMutation::Applied(entry.likes.clone()))
    }

    async fn remove_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation> {
        let Some(mut entry) = self.posts.get_mut(&post) else {
            return Ok(LikeMutation::PostMissing);
        };
        let Some(index) = entry.likes.iter().position(|like| like.user == user) else {
            return Ok(LikeMutation::Unchanged);
        };
        entry.likes.remove(index);
        Ok(LikeMutation::Applied(entry.likes.clone()))
    }
}
