//! `PgStore` against a throwaway Postgres container: the same set, order and
//! deletion rules the in-memory store is tested for.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, SubsecRound, TimeZone, Utc};
use domains::{
    AuthorSnapshot, Like, LikeMutation, LikeRepository, Post, PostId, PostRepository, User,
    UserId, UserInsert, UserRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use storage_adapters::PgStore;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;
use uuid::Uuid;

/// The container lives as long as the returned handle.
async fn start() -> (PgStore, PgPool, ContainerAsync<Postgres>) {
    let node = Postgres::default().start().await.unwrap();
    let host = node.get_host().await.unwrap();
    let port = node.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

    let pool = PgPoolOptions::new().max_connections(16).connect(&url).await.unwrap();
    let store = PgStore::from_pool(pool.clone());
    store.migrate().await.unwrap();
    (store, pool, node)
}

fn user(email: &str) -> User {
    User {
        id: UserId::new(),
        name: "N".into(),
        email: email.into(),
        password_hash: "h".into(),
        avatar: "a".into(),
        created_at: Utc::now().trunc_subsecs(6),
    }
}

async fn stored_user(store: &PgStore, email: &str) -> User {
    let u = user(email);
    assert_eq!(UserRepository::insert(store, &u).await.unwrap(), UserInsert::Created);
    u
}

fn post_by(owner: UserId) -> Post {
    Post {
        id: PostId::new(),
        user: owner,
        text: "  verbatim\ntext ".into(),
        author: AuthorSnapshot { name: "N".into(), avatar: "a".into() },
        likes: vec![],
        created_at: Utc::now().trunc_subsecs(6),
    }
}

#[tokio::test]
async fn test_email_is_unique() {
    let (store, _pool, _node) = start().await;

    stored_user(&store, "a@x.io").await;
    assert_eq!(
        UserRepository::insert(&store, &user("a@x.io")).await.unwrap(),
        UserInsert::EmailTaken
    );
    assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
    assert!(store.find_by_email("a@x.io").await.unwrap().is_some());
}

#[tokio::test]
async fn test_post_reads_back_unchanged() {
    let (store, _pool, _node) = start().await;
    let owner = stored_user(&store, "owner@x.io").await;

    let post = post_by(owner.id);
    PostRepository::insert(&store, &post).await.unwrap();

    assert_eq!(PostRepository::find_by_id(&store, post.id).await.unwrap(), Some(post));
    assert_eq!(PostRepository::find_by_id(&store, PostId::new()).await.unwrap(), None);
}

#[tokio::test]
async fn test_likes_are_a_set_with_most_recent_first() {
    let (store, _pool, _node) = start().await;
    let owner = stored_user(&store, "owner@x.io").await;
    let p = post_by(owner.id);
    PostRepository::insert(&store, &p).await.unwrap();

    // Likers need not be registered users.
    let (a, b) = (UserId::new(), UserId::new());
    assert_eq!(store.add_like(p.id, a).await.unwrap(), LikeMutation::Applied(vec![Like { user: a }]));
    assert_eq!(
        store.add_like(p.id, b).await.unwrap(),
        LikeMutation::Applied(vec![Like { user: b }, Like { user: a }])
    );
    assert_eq!(store.add_like(p.id, a).await.unwrap(), LikeMutation::Unchanged);

    assert_eq!(store.remove_like(p.id, b).await.unwrap(), LikeMutation::Applied(vec![Like { user: a }]));
    assert_eq!(store.remove_like(p.id, b).await.unwrap(), LikeMutation::Unchanged);

    let stored = PostRepository::find_by_id(&store, p.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, vec![Like { user: a }]);
}

#[tokio::test]
async fn test_delete_cascades_and_is_terminal() {
    let (store, pool, _node) = start().await;
    let owner = stored_user(&store, "owner@x.io").await;
    let p = post_by(owner.id);
    PostRepository::insert(&store, &p).await.unwrap();
    store.add_like(p.id, UserId::new()).await.unwrap();

    assert!(store.delete(p.id).await.unwrap());
    assert!(!store.delete(p.id).await.unwrap());

    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(p.id.0)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
    assert_eq!(store.add_like(p.id, UserId::new()).await.unwrap(), LikeMutation::PostMissing);
    assert_eq!(store.remove_like(p.id, UserId::new()).await.unwrap(), LikeMutation::PostMissing);
}

#[tokio::test]
async fn test_list_orders_by_time_then_id_with_likes_attached() {
    let (store, _pool, _node) = start().await;
    let owner = stored_user(&store, "owner@x.io").await;
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let make = |id: u128, offset: i64| Post {
        id: PostId(Uuid::from_u128(id)),
        created_at: base + Duration::seconds(offset),
        ..post_by(owner.id)
    };

    for post in [make(10, 0), make(20, 0), make(30, 60), make(5, 60), make(7, 30)] {
        PostRepository::insert(&store, &post).await.unwrap();
    }
    let liker = UserId::new();
    store.add_like(PostId(Uuid::from_u128(7)), liker).await.unwrap();

    let listed = store.list().await.unwrap();
    let order: Vec<u128> = listed.iter().map(|p| p.id.0.as_u128()).collect();
    assert_eq!(order, vec![30, 5, 7, 20, 10]);
    assert_eq!(listed[2].likes, vec![Like { user: liker }]);
    assert!(listed[0].likes.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_apply_exactly_once_each() {
    let (store, _pool, _node) = start().await;
    let store = Arc::new(store);
    let owner = stored_user(&store, "owner@x.io").await;
    let p = post_by(owner.id);
    PostRepository::insert(store.as_ref(), &p).await.unwrap();
    let post_id = p.id;

    let users: Vec<UserId> = (0..32).map(|_| UserId::new()).collect();
    let repeat = users[0];
    let mut handles = Vec::new();
    for user in users.iter().copied().chain(std::iter::repeat(repeat).take(8)) {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { store.add_like(post_id, user).await.unwrap() }));
    }

    let mut applied = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), LikeMutation::Applied(_)) {
            applied += 1;
        }
    }
    assert_eq!(applied, users.len());

    let likes = PostRepository::find_by_id(store.as_ref(), post_id).await.unwrap().unwrap().likes;
    let likers: HashSet<UserId> = likes.iter().map(|l| l.user).collect();
    assert_eq!(likes.len(), users.len());
    assert_eq!(likers, users.into_iter().collect());
}
