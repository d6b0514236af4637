//! # Handlers
//!
//! Thin adapters between HTTP and the services. Each one extracts input,
//! calls exactly one service operation and serializes the result.

pub mod auth;
pub mod posts;
pub mod users;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}
