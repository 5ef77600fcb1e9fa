//! Handlers for `/categories` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/categories` | Optional `?limit=&offset=` |
//! | `POST`   | `/categories` | Body: [`CategoryBody`] |
//! | `GET`    | `/categories/{id}` | 404 if not found |
//! | `PUT`    | `/categories/{id}` | Body: [`CategoryBody`] |
//! | `DELETE` | `/categories/{id}` | 204; 409 while products reference it |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use serde::Deserialize;
use shelf_core::{catalog::Category, id::CategoryId, store::CatalogStore};
use shelf_service::CategoryInput;
use validator::Validate;

use crate::{
  AppState,
  error::ApiError,
  extract::{IdPath, PageParams, QueryParams, ValidJson},
};

#[derive(Deserialize, Validate)]
pub struct CategoryBody {
  #[validate(length(min = 1, message = "name is required"))]
  pub name:        String,
  #[validate(length(
    min = 8,
    max = 1000,
    message = "description must be 8 to 1000 characters"
  ))]
  pub description: String,
}

impl From<CategoryBody> for CategoryInput {
  fn from(b: CategoryBody) -> Self {
    CategoryInput { name: b.name, description: b.description }
  }
}

/// `GET /categories`
pub async fn list<S: CatalogStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Vec<Category>>, ApiError> {
  Ok(Json(state.categories.find_all(params.page()).await?))
}

/// `GET /categories/{id}`
pub async fn get_one<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<CategoryId>,
) -> Result<Json<Category>, ApiError> {
  Ok(Json(state.categories.find_by_id(&id).await?))
}

/// `POST /categories`
pub async fn create<S: CatalogStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<CategoryBody>,
) -> Result<Json<Category>, ApiError> {
  Ok(Json(state.categories.create(body.into()).await?))
}

/// `PUT /categories/{id}`
pub async fn update<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<CategoryId>,
  ValidJson(body): ValidJson<CategoryBody>,
) -> Result<Json<Category>, ApiError> {
  Ok(Json(state.categories.update(&id, body.into()).await?))
}

/// `DELETE /categories/{id}`
pub async fn delete<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<CategoryId>,
) -> Result<StatusCode, ApiError> {
  state.categories.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
