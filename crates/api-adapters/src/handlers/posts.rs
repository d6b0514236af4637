use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{DomainError, Like, Post, PostId};
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;
use crate::error::ApiError;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: String,
}

/// A malformed id can't name an existing post.
fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    Uuid::parse_str(raw)
        .map(PostId)
        .map_err(|_| DomainError::post_not_found().into())
}

/// `POST /api/posts`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.posts.create(&caller, &req.text).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /api/posts`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list().await?))
}

/// `GET /api/posts/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    Ok(Json(state.posts.get_by_id(id).await?))
}

/// `DELETE /api/posts/{id}`
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_post_id(&id)?;
    state.posts.delete_by_id(id, &caller).await?;
    Ok(Json(MessageResponse { msg: "Post removed".to_string() }))
}

/// `PUT /api/posts/like/{id}`
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    Ok(Json(state.likes.like(id, caller.user_id).await?))
}

/// `PUT /api/posts/unlike/{id}`
pub async fn unlike(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    Ok(Json(state.likes.unlike(id, caller.user_id).await?))
}
