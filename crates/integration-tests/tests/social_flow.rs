//! The full register → post → like → unlike → delete scenario.

use domains::{DomainError, Like};
use integration_tests::TestApp;

#[tokio::test]
async fn test_two_users_post_like_unlike_delete() {
    let app = TestApp::new();
    let a = app.register("User A", "a@example.com").await;
    let b = app.register("User B", "b@example.com").await;

    let p = app.posts.create(&a, "hello").await.unwrap();
    assert_eq!(p.user, a.user_id);
    assert_eq!(p.text, "hello");

    let likes = app.likes.like(p.id, b.user_id).await.unwrap();
    assert_eq!(likes, vec![Like { user: b.user_id }]);

    let likes = app.likes.unlike(p.id, b.user_id).await.unwrap();
    assert!(likes.is_empty());

    app.posts.delete_by_id(p.id, &a).await.unwrap();
    assert_eq!(app.posts.get_by_id(p.id).await.unwrap_err(), DomainError::post_not_found());
}

#[tokio::test]
async fn test_author_snapshot_uses_registered_name_and_gravatar() {
    let app = TestApp::new();
    let a = app.register("User A", "Mixed.Case@Example.com").await;

    let p = app.posts.create(&a, "snapshot").await.unwrap();
    let profile = app.users.profile(&a).await.unwrap();

    assert_eq!(p.author.name, "User A");
    assert_eq!(p.author.avatar, profile.avatar);
    assert!(p.author.avatar.starts_with("https://www.gravatar.com/avatar/"));
    assert_eq!(profile.email, "mixed.case@example.com");
}

#[tokio::test]
async fn test_deleted_post_rejects_every_operation() {
    let app = TestApp::new();
    let a = app.register("User A", "a@example.com").await;
    let b = app.register("User B", "b@example.com").await;
    let p = app.posts.create(&a, "short-lived").await.unwrap();
    app.likes.like(p.id, b.user_id).await.unwrap();

    app.posts.delete_by_id(p.id, &a).await.unwrap();

    assert_eq!(app.likes.like(p.id, a.user_id).await.unwrap_err(), DomainError::post_not_found());
    assert_eq!(app.likes.unlike(p.id, b.user_id).await.unwrap_err(), DomainError::post_not_found());
    assert_eq!(app.posts.delete_by_id(p.id, &a).await.unwrap_err(), DomainError::post_not_found());
    assert!(app.posts.list().await.unwrap().is_empty());
}
