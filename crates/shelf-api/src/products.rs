//! Handlers for `/products` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/products` | Optional `?category_id=&limit=&offset=` |
//! | `POST`   | `/products` | Body: [`ProductBody`]; 400 if the category does not exist |
//! | `GET`    | `/products/{id}` | 404 if not found |
//! | `PUT`    | `/products/{id}` | Body: [`ProductBody`] |
//! | `DELETE` | `/products/{id}` | 204 |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shelf_core::{
  catalog::{Price, Product},
  id::{CategoryId, ProductId},
  store::{CatalogStore, Page},
};
use shelf_service::ProductInput;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
  AppState,
  error::ApiError,
  extract::{IdPath, QueryParams, ValidJson},
};

fn positive(price: &Decimal) -> Result<(), ValidationError> {
  if price.is_sign_positive() && !price.is_zero() {
    return Ok(());
  }
  Err(ValidationError::new("range").with_message("price must be greater than zero".into()))
}

fn uuid_text(value: &str) -> Result<(), ValidationError> {
  Uuid::parse_str(value)
    .map(|_| ())
    .map_err(|_| ValidationError::new("uuid").with_message("category_id must be a UUID".into()))
}

#[derive(Deserialize, Validate)]
pub struct ProductBody {
  #[validate(length(min = 3, max = 100, message = "name must be 3 to 100 characters"))]
  pub name:        String,
  #[validate(custom(function = "positive"))]
  pub price:       Decimal,
  #[validate(custom(function = "uuid_text"))]
  pub category_id: Option<String>,
}

impl TryFrom<ProductBody> for ProductInput {
  type Error = shelf_core::Error;

  fn try_from(b: ProductBody) -> Result<Self, Self::Error> {
    Ok(ProductInput {
      name:        b.name,
      price:       Price::new(b.price)?,
      category_id: b.category_id.map(CategoryId::from),
    })
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub category_id: Option<String>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

/// `GET /products[?category_id=...][&limit=...][&offset=...]`
pub async fn list<S: CatalogStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
  let page = Page::new(params.limit, params.offset.unwrap_or(0));
  let products = match params.category_id {
    Some(category_id) => {
      state
        .products
        .find_by_category(&CategoryId::from(category_id), page)
        .await?
    }
    None => state.products.find_all(page).await?,
  };
  Ok(Json(products))
}

/// `GET /products/{id}`
pub async fn get_one<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<ProductId>,
) -> Result<Json<Product>, ApiError> {
  Ok(Json(state.products.find_by_id(&id).await?))
}

/// `POST /products`
pub async fn create<S: CatalogStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<ProductBody>,
) -> Result<Json<Product>, ApiError> {
  let input = ProductInput::try_from(body)?;
  Ok(Json(state.products.create(input).await?))
}

/// `PUT /products/{id}`
pub async fn update<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<ProductId>,
  ValidJson(body): ValidJson<ProductBody>,
) -> Result<Json<Product>, ApiError> {
  let input = ProductInput::try_from(body)?;
  Ok(Json(state.products.update(&id, input).await?))
}

/// `DELETE /products/{id}`
pub async fn delete<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(id): IdPath<ProductId>,
) -> Result<StatusCode, ApiError> {
  state.products.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
