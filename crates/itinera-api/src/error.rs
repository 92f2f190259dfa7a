//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use itinera_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthenticated,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();

    let (status, body) = match &self {
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, json!({ "error": message }))
      }
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
      ApiError::BadRequest(_) => {
        (StatusCode::BAD_REQUEST, json!({ "error": message }))
      }
      ApiError::Core(core) => match core {
        CoreError::NotAuthorized => {
          (StatusCode::FORBIDDEN, json!({ "error": message }))
        }
        CoreError::InvalidEmail(_) | CoreError::UngrantableRole(_) => {
          (StatusCode::BAD_REQUEST, json!({ "error": message }))
        }
        CoreError::InvalidToken
        | CoreError::CollaboratorNotFound(_)
        | CoreError::JourneyNotFound(_) => {
          (StatusCode::NOT_FOUND, json!({ "error": message }))
        }
        CoreError::NotPending(_) => {
          (StatusCode::CONFLICT, json!({ "error": message }))
        }
        CoreError::ExpiredToken(_) => (StatusCode::GONE, json!({ "error": message })),
        // Surface the live link so the owner's retry path is "reuse
        // this", not "guess what went wrong".
        CoreError::AlreadyActive { token, expires_at } => (
          StatusCode::CONFLICT,
          json!({
            "error":      message,
            "token":      token,
            "expires_at": expires_at,
          }),
        ),
        CoreError::Serialization(_) | CoreError::Store(_) => {
          (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
        }
      },
    };

    (status, Json(body)).into_response()
  }
}
