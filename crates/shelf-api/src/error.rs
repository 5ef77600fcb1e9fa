//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// One failed field in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("Some fields are invalid")]
  Invalid(Vec<FieldError>),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] shelf_core::Error),
}

impl From<shelf_core::Error> for ApiError {
  fn from(err: shelf_core::Error) -> Self {
    use shelf_core::Error as E;
    match err {
      E::InvalidInput(_) | E::ReferenceNotFound { .. } => Self::BadRequest(err.to_string()),
      E::NotFound { .. } => Self::NotFound(err.to_string()),
      E::Conflict(_) => Self::Conflict(err.to_string()),
      E::StorageUnavailable(_) | E::Credential(_) => Self::Internal(err),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self {
    let mut causes: Vec<FieldError> = errors
      .field_errors()
      .into_iter()
      .flat_map(|(field, errs)| {
        errs.iter().map(move |e| FieldError {
          field:   field.to_string(),
          message: e
            .message
            .as_ref()
            .map_or_else(|| e.code.to_string(), |m| m.to_string()),
        })
      })
      .collect();
    causes.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    Self::Invalid(causes)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Invalid(causes) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": self.to_string(), "causes": causes }),
      ),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
