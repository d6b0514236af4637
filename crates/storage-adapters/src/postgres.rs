//! # Postgres store
//!
//! Maps the relational model onto the domain models. Likes are a relation
//! keyed by (post_id, user_id) rather than a list inside the post row, so
//! like/unlike are single-row inserts and deletes.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    AuthorSnapshot, Like, LikeMutation, LikeRepository, Post, PostId, PostRepository, User,
    UserId, UserInsert, UserRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    avatar: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            avatar: row.avatar,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    author_name: String,
    author_avatar: String,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, likes: Vec<Like>) -> Post {
        Post {
            id: PostId(self.id),
            user: UserId(self.user_id),
            text: self.text,
            author: AuthorSnapshot { name: self.author_name, avatar: self.author_avatar },
            likes,
            created_at: self.created_at,
        }
    }
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("failed to connect to postgres")?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run migrations")?;
        Ok(())
    }
}

/// Most-recently-liked first.
async fn load_likes<'e, E: PgExecutor<'e>>(executor: E, post_id: Uuid) -> sqlx::Result<Vec<Like>> {
    let users: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM post_likes WHERE post_id = $1 ORDER BY seq DESC",
    )
    .bind(post_id)
    .fetch_all(executor)
    .await?;

    Ok(users.into_iter().map(|id| Like { user: UserId(id) }).collect())
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// The UNIQUE constraint on email decides races between concurrent
    /// registrations.
    async fn insert(&self, user: &User) -> anyhow::Result<UserInsert> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.id.0)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(if inserted == 0 { UserInsert::EmailTaken } else { UserInsert::Created })
    }

    async fn count(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl PostRepository for PgStore {
    async fn insert(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, text, author_name, author_avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id.0)
        .bind(post.user.0)
        .bind(&post.text)
        .bind(&post.author.name)
        .bind(&post.author.avatar)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, author_name, author_avatar, created_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let likes = load_likes(&mut *tx, id.0).await?;
        tx.commit().await?;
        Ok(Some(row.into_post(likes)))
    }

    async fn list(&self) -> anyhow::Result<Vec<Post>> {
        // One snapshot for both queries so likes match the posts returned.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, author_name, author_avatar, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let like_rows: Vec<(Uuid, Uuid)> =
            sqlx::query_as("SELECT post_id, user_id FROM post_likes ORDER BY seq DESC")
                .fetch_all(&mut *tx)
                .await?;
        tx.commit().await?;

        let mut likes: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for (post_id, user_id) in like_rows {
            likes.entry(post_id).or_default().push(Like { user: UserId(user_id) });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let post_likes = likes.remove(&row.id).unwrap_or_default();
                row.into_post(post_likes)
            })
            .collect())
    }

    /// Likes go with the post via ON DELETE CASCADE.
    async fn delete(&self, id: PostId) -> anyhow::Result<bool> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}

#[async_trait]
impl LikeRepository for PgStore {
    /// The post row is held with FOR KEY SHARE for the duration, so a
    /// concurrent delete either completes first (we report PostMissing) or
    /// waits for this transaction and then cascades the new like away.
    async fn add_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR KEY SHARE")
                .bind(post.0)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(LikeMutation::PostMissing);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post.0)
        .bind(user.0)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if inserted == 0 {
            return Ok(LikeMutation::Unchanged);
        }

        let likes = load_likes(&mut *tx, post.0).await?;
        tx.commit().await?;
        Ok(LikeMutation::Applied(likes))
    }

    async fn remove_like(&self, post: PostId, user: UserId) -> anyhow::Result<LikeMutation> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR KEY SHARE")
                .bind(post.0)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(LikeMutation::PostMissing);
        }

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post.0)
            .bind(user.0)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(LikeMutation::Unchanged);
        }

        let likes = load_likes(&mut *tx, post.0).await?;
        tx.commit().await?;
        Ok(LikeMutation::Applied(likes))
    }
}
