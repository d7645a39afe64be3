//! Gateway error type and [`axum::response::IntoResponse`] implementation.
//!
//! Storage failures are logged server-side with request context; clients
//! only ever see a generic message and a JSON `{"error": ...}` body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by a gateway handler.
#[derive(Debug, Error)]
pub enum Error {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid username or password")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("storage operation timed out")]
  Timeout,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::Unauthorized => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::Hash(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal storage error".to_string(),
        )
      }
      Error::Timeout => {
        tracing::error!("storage operation timed out");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "storage operation timed out".to_string(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
