//! Drives the router end to end with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use shelf_api::{AppState, api_router};
use shelf_core::{
  Error,
  activity::UserActivity,
  catalog::Product,
  id::{CategoryId, UserId},
  store::{ActivityStore, CatalogStore, Entity, EntityStore, Page, ProductStore},
};
use shelf_store_document::DocumentStore;
use shelf_store_sqlite::SqliteStore;
use tower::ServiceExt;

fn app<S: CatalogStore>(store: S) -> Router {
  let hasher = Argon2::new(
    Algorithm::Argon2id,
    Version::V0x13,
    Params::new(8, 1, 1, None).unwrap(),
  );
  Router::new().nest(
    "/api/v1",
    api_router(AppState::with_hasher(Arc::new(store), hasher)),
  )
}

async fn document_app() -> Router { app(DocumentStore::open_in_memory().await.unwrap()) }

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn create_user(app: &Router) -> String {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/users",
    Some(json!({ "name": "Ada Lovelace", "email": "ada@example.com", "password": "engine" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn create_category(app: &Router) -> String {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/categories",
    Some(json!({ "name": "Kitchen", "description": "Pots, pans and kettles" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn create_product(app: &Router, category_id: Option<&str>) -> String {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/products",
    Some(json!({ "name": "Kettle", "price": 12.5, "category_id": category_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

// ─── Activities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_read_activity() {
  let app = document_app().await;
  let user_id = create_user(&app).await;
  let product_id = create_product(&app, None).await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/activities",
    Some(json!({ "user_id": user_id, "product_id": product_id, "action": "view" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({ "user_id": user_id, "product_id": product_id, "action": "View" })
  );

  let (status, body) = send(&app, Method::GET, &format!("/api/v1/activities/{user_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, body) = send(&app, Method::GET, "/api/v1/activities", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["action"], "View");
}

#[tokio::test]
async fn activity_for_unknown_user_is_a_bad_request() {
  let app = document_app().await;
  let product_id = create_product(&app, None).await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/activities",
    Some(json!({ "user_id": UNKNOWN_ID, "product_id": product_id, "action": "view" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("user"));

  let (_, all) = send(&app, Method::GET, "/api/v1/activities", None).await;
  assert_eq!(all, json!([]));
}

#[tokio::test]
async fn unknown_action_fails_validation() {
  let app = document_app().await;
  let user_id = create_user(&app).await;
  let product_id = create_product(&app, None).await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/activities",
    Some(json!({ "user_id": user_id, "product_id": product_id, "action": "teleport" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Some fields are invalid");
  assert_eq!(body["causes"][0]["field"], "action");
}

#[tokio::test]
async fn history_of_an_unknown_user_is_empty() {
  let app = document_app().await;
  let (status, body) =
    send(&app, Method::GET, &format!("/api/v1/activities/{UNKNOWN_ID}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_responses_never_carry_the_password() {
  let app = document_app().await;
  let user_id = create_user(&app).await;

  let (status, body) = send(&app, Method::GET, &format!("/api/v1/users/{user_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({ "id": user_id, "name": "Ada Lovelace", "email": "ada@example.com" })
  );

  let (_, list) = send(&app, Method::GET, "/api/v1/users", None).await;
  assert!(list[0].get("password_hash").is_none());
}

#[tokio::test]
async fn invalid_user_fields_are_listed() {
  let app = document_app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/users",
    Some(json!({ "name": "Ada", "email": "not-an-email", "password": "123" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let fields: Vec<&str> = body["causes"]
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["field"].as_str().unwrap())
    .collect();
  assert_eq!(fields, ["email", "password"]);
}

#[tokio::test]
async fn password_check() {
  let app = document_app().await;
  let user_id = create_user(&app).await;
  let uri = format!("/api/v1/users/{user_id}/password");

  let (_, body) = send(&app, Method::POST, &uri, Some(json!({ "password": "engine" }))).await;
  assert_eq!(body, json!({ "valid": true }));

  let (_, body) = send(&app, Method::POST, &uri, Some(json!({ "password": "wrong" }))).await;
  assert_eq!(body, json!({ "valid": false }));
}

#[tokio::test]
async fn ids_must_be_uuids_and_exist() {
  let app = document_app().await;

  let (status, _) = send(&app, Method::GET, "/api/v1/users/not-a-uuid", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(&app, Method::GET, &format!("/api/v1/users/{UNKNOWN_ID}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) =
    send(&app, Method::DELETE, &format!("/api/v1/products/{UNKNOWN_ID}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
  let app = document_app().await;
  let request = Request::builder()
    .method(Method::POST)
    .uri("/api/v1/categories")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{ not json"))
    .unwrap();
  let response = app.oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn product_needs_an_existing_category() {
  let app = document_app().await;

  let (status, _) = send(
    &app,
    Method::POST,
    "/api/v1/products",
    Some(json!({ "name": "Kettle", "price": 12.5, "category_id": UNKNOWN_ID })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, products) = send(&app, Method::GET, "/api/v1/products", None).await;
  assert_eq!(products, json!([]));
}

#[tokio::test]
async fn product_price_must_be_positive() {
  let app = document_app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/products",
    Some(json!({ "name": "Kettle", "price": 0 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["causes"][0]["field"], "price");
}

#[tokio::test]
async fn price_comes_back_exactly() {
  let app = document_app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/products",
    Some(json!({ "name": "Telescope", "price": "123456789012345.6789" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");

  let uri = format!("/api/v1/products/{}", body["id"].as_str().unwrap());
  let (_, fetched) = send(&app, Method::GET, &uri, None).await;
  assert_eq!(fetched["price"], "123456789012345.6789");
}

#[tokio::test]
async fn malformed_paging_is_a_json_bad_request() {
  let app = document_app().await;
  let (status, body) = send(&app, Method::GET, "/api/v1/products?limit=abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn category_lifecycle_with_products() {
  let app = document_app().await;
  let category_id = create_category(&app).await;
  let product_id = create_product(&app, Some(&category_id)).await;

  let (status, body) =
    send(&app, Method::GET, &format!("/api/v1/products/{product_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({ "id": product_id, "name": "Kettle", "price": "12.5", "category_id": category_id })
  );

  let (_, filtered) = send(
    &app,
    Method::GET,
    &format!("/api/v1/products?category_id={category_id}"),
    None,
  )
  .await;
  assert_eq!(filtered.as_array().unwrap().len(), 1);

  let category_uri = format!("/api/v1/categories/{category_id}");
  let (status, _) = send(&app, Method::DELETE, &category_uri, None).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, _) =
    send(&app, Method::DELETE, &format!("/api/v1/products/{product_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, Method::DELETE, &category_uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn update_keeps_the_path_id() {
  let app = document_app().await;
  let category_id = create_category(&app).await;

  let (status, body) = send(
    &app,
    Method::PUT,
    &format!("/api/v1/categories/{category_id}"),
    Some(json!({ "name": "Cookware", "description": "Pots and pans only" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], category_id);
  assert_eq!(body["name"], "Cookware");
}

#[tokio::test]
async fn list_endpoints_page() {
  let app = document_app().await;
  for _ in 0..3 {
    create_category(&app).await;
  }
  let (_, body) = send(&app, Method::GET, "/api/v1/categories?limit=2&offset=2", None).await;
  assert_eq!(body.as_array().unwrap().len(), 1);
}

// ─── Relational backend ──────────────────────────────────────────────────────

#[tokio::test]
async fn sqlite_backend_serves_the_same_routes() {
  let app = app(SqliteStore::open_in_memory().await.unwrap());
  let user_id = create_user(&app).await;
  let category_id = create_category(&app).await;
  let product_id = create_product(&app, Some(&category_id)).await;

  for action in ["view", "purchase"] {
    let (status, _) = send(
      &app,
      Method::POST,
      "/api/v1/activities",
      Some(json!({ "user_id": user_id, "product_id": product_id, "action": action })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  let (_, history) =
    send(&app, Method::GET, &format!("/api/v1/activities/{user_id}"), None).await;
  let actions: Vec<&str> = history
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["action"].as_str().unwrap())
    .collect();
  assert_eq!(actions, ["View", "Purchase"]);

  let (status, _) =
    send(&app, Method::DELETE, &format!("/api/v1/categories/{category_id}"), None).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

// ─── Storage failures ────────────────────────────────────────────────────────

/// A backend that is down: every call fails with a storage error.
struct Unavailable;

fn offline() -> Error { Error::storage(std::io::Error::other("database offline")) }

impl<E: Entity> EntityStore<E> for Unavailable {
  async fn find_all(&self, _page: Page) -> shelf_core::Result<Vec<E>> { Err(offline()) }

  async fn find_by_id(&self, _id: &E::Id) -> shelf_core::Result<Option<E>> { Err(offline()) }

  async fn create(&self, _entity: E) -> shelf_core::Result<E> { Err(offline()) }

  async fn update(&self, _id: &E::Id, _entity: E) -> shelf_core::Result<E> { Err(offline()) }

  async fn delete(&self, _id: &E::Id) -> shelf_core::Result<()> { Err(offline()) }
}

impl ProductStore for Unavailable {
  async fn find_by_category(
    &self,
    _category_id: &CategoryId,
    _page: Page,
  ) -> shelf_core::Result<Vec<Product>> {
    Err(offline())
  }
}

impl ActivityStore for Unavailable {
  async fn save_activity(&self, _activity: UserActivity) -> shelf_core::Result<UserActivity> {
    Err(offline())
  }

  async fn find_by_user(
    &self,
    _user_id: &UserId,
    _page: Page,
  ) -> shelf_core::Result<Vec<UserActivity>> {
    Err(offline())
  }

  async fn find_all_activities(&self, _page: Page) -> shelf_core::Result<Vec<UserActivity>> {
    Err(offline())
  }
}

#[tokio::test]
async fn storage_failure_is_a_server_error_not_a_bad_request() {
  let app = app(Unavailable);

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/activities",
    Some(json!({ "user_id": UNKNOWN_ID, "product_id": UNKNOWN_ID, "action": "view" })),
  )
  .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["error"].is_string());

  let (status, _) = send(&app, Method::GET, "/api/v1/products", None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
