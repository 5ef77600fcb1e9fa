//! HTTP server wiring for Shelf.
//!
//! Mounts the JSON API under `/api/v1`, wraps it in request tracing, and
//! serves it for whichever backend the configuration selects.

pub mod settings;

pub use settings::{Backend, LogFormat, ServerConfig};

use std::sync::Arc;

use axum::Router;
use shelf_api::{AppState, api_router};
use shelf_core::store::CatalogStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Build the full application router over `store`.
pub fn router<S: CatalogStore>(store: Arc<S>) -> Router {
  Router::new()
    .nest("/api/v1", api_router(AppState::new(store)))
    .layer(TraceLayer::new_for_http())
}

/// Serve `store` on `listener` until the server stops.
pub async fn serve<S: CatalogStore>(store: S, listener: TcpListener) -> std::io::Result<()> {
  axum::serve(listener, router(Arc::new(store))).await
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use shelf_store_document::DocumentStore;
  use shelf_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn get(app: Router, uri: &str) -> StatusCode {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap().status()
  }

  #[tokio::test]
  async fn api_is_mounted_under_v1() {
    let app = router(Arc::new(DocumentStore::open_in_memory().await.unwrap()));
    assert_eq!(get(app.clone(), "/api/v1/categories").await, StatusCode::OK);
    assert_eq!(get(app, "/categories").await, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn sqlite_backend_is_routable() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(Arc::new(store));
    assert_eq!(get(app, "/api/v1/activities").await, StatusCode::OK);
  }
}
