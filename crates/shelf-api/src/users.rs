//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Optional `?limit=&offset=` |
//! | `POST`   | `/users` | Body: [`UserBody`]; returns the stored user |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`    | `/users/{id}` | Body: [`UserBody`] |
//! | `DELETE` | `/users/{id}` | 204 |
//! | `POST`   | `/users/{id}/password` | Body: `{"password":"..."}`; returns `{"valid":bool}` |
//!
//! Responses never carry the password hash.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shelf_core::{id::UserId, store::CatalogStore, user::User};
use shelf_service::UserInput;
use validator::Validate;

use crate::{
  AppState,
  error::ApiError,
  extract::{IdPath, PageParams, QueryParams, ValidJson},
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
  pub id:    UserId,
  pub name:  String,
  pub email: String,
}

impl From<User> for UserResponse {
  fn from(user: User) -> Self {
    Self { id: user.id, name: user.name, email: user.email }
  }
}

#[derive(Deserialize, Validate)]
pub struct UserBody {
  #[validate(length(min = 3, max = 100, message = "name must be 3 to 100 characters"))]
  pub name:     String,
  #[validate(email(message = "email must be a valid address"))]
  pub email:    String,
  #[validate(length(min = 6, max = 100, message = "password must be 6 to 100 characters"))]
  pub password: String,
}

impl From<UserBody> for UserInput {
  fn from(b: UserBody) -> Self {
    UserInput { name: b.name, email: b.email, password: b.password }
  }
}

/// `GET /users`
pub async fn list<S: CatalogStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
  let users = state.users.find_all(params.page()).await?;
  Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `GET /users/{id}`
pub async fn get_one<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
  Ok(Json(state.users.find_by_id(&id).await?.into()))
}

/// `POST /users`
pub async fn create<S: CatalogStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<UserBody>,
) -> Result<Json<UserResponse>, ApiError> {
  Ok(Json(state.users.create(body.into()).await?.into()))
}

/// `PUT /users/{id}`
pub async fn update<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<UserId>,
  ValidJson(body): ValidJson<UserBody>,
) -> Result<Json<UserResponse>, ApiError> {
  Ok(Json(state.users.update(&id, body.into()).await?.into()))
}

/// `DELETE /users/{id}`
pub async fn delete<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<UserId>,
) -> Result<StatusCode, ApiError> {
  state.users.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Password check ──────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct PasswordBody {
  #[validate(length(min = 1, message = "password is required"))]
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordCheck {
  pub valid: bool,
}

/// `POST /users/{id}/password`
pub async fn check_password<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<UserId>,
  ValidJson(body): ValidJson<PasswordBody>,
) -> Result<Json<PasswordCheck>, ApiError> {
  let valid = state.users.validate_password(&id, &body.password).await?;
  Ok(Json(PasswordCheck { valid }))
}
