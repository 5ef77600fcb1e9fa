//! Request extractors that report failures as [`ApiError`] JSON bodies.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Query, Request},
  http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};
use shelf_core::store::Page;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

// ─── Validated JSON body ─────────────────────────────────────────────────────

/// A JSON body that has been deserialised and then checked with
/// [`Validate`]. Malformed JSON and failed rules are both `400`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Validate,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    value.validate()?;
    Ok(Self(value))
  }
}

// ─── Id path segment ─────────────────────────────────────────────────────────

/// A single `{id}` path segment that must be a UUID, converted into the
/// typed id `I`.
pub struct IdPath<I>(pub I);

impl<S, I> FromRequestParts<S> for IdPath<I>
where
  S: Send + Sync,
  I: From<String> + Send,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if Uuid::parse_str(&raw).is_err() {
      return Err(ApiError::BadRequest(format!("invalid id: {raw:?} is not a UUID")));
    }
    Ok(Self(I::from(raw)))
  }
}

// ─── Query string ────────────────────────────────────────────────────────────

/// Query-string parameters, rejected with the usual JSON error body.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Self(value))
  }
}

// ─── Paging ──────────────────────────────────────────────────────────────────

/// `?limit=&offset=` on list endpoints. Both are optional; no limit means the
/// whole result set.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

impl PageParams {
  pub fn page(&self) -> Page { Page::new(self.limit, self.offset.unwrap_or(0)) }
}
