//! Post store accessor: ownership, verbatim text and feed order.

use chrono::{Duration, TimeZone, Utc};
use domains::{AuthorSnapshot, DomainError, Post, PostId, PostRepository, UserId};
use integration_tests::TestApp;
use uuid::Uuid;

#[tokio::test]
async fn test_created_post_is_owned_by_caller_with_verbatim_text() {
    let app = TestApp::new();
    let a = app.register("User A", "a@example.com").await;

    for text in ["plain", "  padded  ", "multi\nline", "emoji 🎉", "<b>markup</b>"] {
        let post = app.posts.create(&a, text).await.unwrap();
        assert_eq!(post.user, a.user_id);
        assert_eq!(post.text, text);
        assert_eq!(app.posts.get_by_id(post.id).await.unwrap(), post);
    }
}

#[tokio::test]
async fn test_non_owner_delete_is_unauthorized_and_post_survives() {
    let app = TestApp::new();
    let a = app.register("User A", "a@example.com").await;
    let b = app.register("User B", "b@example.com").await;
    let post = app.posts.create(&a, "mine").await.unwrap();

    let err = app.posts.delete_by_id(post.id, &b).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));
    assert_eq!(app.posts.get_by_id(post.id).await.unwrap(), post);
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let app = TestApp::new();
    assert_eq!(
        app.posts.get_by_id(PostId::new()).await.unwrap_err(),
        DomainError::post_not_found()
    );
}

#[tokio::test]
async fn test_list_orders_by_time_then_id() {
    let app = TestApp::new();
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let owner = UserId::new();
    let make = |id: u128, offset: i64| Post {
        id: PostId(Uuid::from_u128(id)),
        user: owner,
        text: format!("post {id}"),
        author: AuthorSnapshot { name: "A".into(), avatar: "a".into() },
        likes: vec![],
        created_at: base + Duration::seconds(offset),
    };

    // two pairs of identical timestamps
    for post in [make(10, 0), make(20, 0), make(30, 60), make(5, 60), make(7, 30)] {
        PostRepository::insert(app.store.as_ref(), &post).await.unwrap();
    }

    let order: Vec<u128> = app
        .posts
        .list()
        .await
        .unwrap()
        .iter()
        .map(|p| p.id.0.as_u128())
        .collect();
    assert_eq!(order, vec![30, 5, 7, 20, 10]);

    let listed = app.posts.list().await.unwrap();
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}
