//! Handlers for `/activities` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/activities` | Body: `{"user_id","product_id","action"}`; 400 on an unknown user or product |
//! | `GET`  | `/activities` | Optional `?limit=&offset=` |
//! | `GET`  | `/activities/{user_id}` | Possibly empty |

use axum::{
  Json,
  extract::State,
};
use serde::Deserialize;
use shelf_core::{
  activity::{Action, UserActivity},
  id::{ProductId, UserId},
  store::CatalogStore,
};
use validator::{Validate, ValidationError};

use crate::{
  AppState,
  error::ApiError,
  extract::{IdPath, PageParams, QueryParams, ValidJson},
};

fn known_action(value: &str) -> Result<(), ValidationError> {
  value.parse::<Action>().map(|_| ()).map_err(|_| {
    ValidationError::new("action").with_message(
      format!(
        "action must be one of {}",
        Action::ALL.map(|a| a.as_str()).join(", ")
      )
      .into(),
    )
  })
}

#[derive(Deserialize, Validate)]
pub struct ActivityBody {
  #[validate(length(min = 1, message = "user_id is required"))]
  pub user_id:    String,
  #[validate(length(min = 1, message = "product_id is required"))]
  pub product_id: String,
  #[validate(custom(function = "known_action"))]
  pub action:     String,
}

/// `POST /activities`
pub async fn create<S: CatalogStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<ActivityBody>,
) -> Result<Json<UserActivity>, ApiError> {
  let activity = state
    .activities
    .save_activity(
      UserId::from(body.user_id),
      ProductId::from(body.product_id),
      &body.action,
    )
    .await?;
  Ok(Json(activity))
}

/// `GET /activities`
pub async fn list<S: CatalogStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Vec<UserActivity>>, ApiError> {
  Ok(Json(state.activities.get_all_activities(params.page()).await?))
}

/// `GET /activities/{user_id}`
pub async fn by_user<S: CatalogStore>(
  State(state): State<AppState<S>>,
  IdPath(user_id): IdPath<UserId>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Vec<UserActivity>>, ApiError> {
  Ok(Json(
    state
      .activities
      .get_activity_by_user_id(&user_id, params.page())
      .await?,
  ))
}
