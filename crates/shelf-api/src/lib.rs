//! JSON REST API for Shelf.
//!
//! Exposes an axum [`Router`] backed by any [`CatalogStore`]. TLS, request
//! tracing and listening are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", shelf_api::api_router(AppState::new(store.clone())))
//! ```

pub mod activities;
pub mod categories;
pub mod error;
pub mod extract;
pub mod products;
pub mod users;

use std::sync::Arc;

use argon2::Argon2;
use axum::{
  Router,
  routing::{get, post},
};
use shelf_core::store::CatalogStore;
use shelf_service::{
  ActivityService, CategoryService, ProductService, UserService,
};

pub use error::ApiError;

/// The services every handler draws on, all sharing one backend.
pub struct AppState<S> {
  pub users:      UserService<S>,
  pub categories: CategoryService<S>,
  pub products:   ProductService<S>,
  pub activities: ActivityService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      users:      self.users.clone(),
      categories: self.categories.clone(),
      products:   self.products.clone(),
      activities: self.activities.clone(),
    }
  }
}

impl<S: CatalogStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_hasher(store, Argon2::default()) }

  /// Like [`AppState::new`], hashing passwords with `hasher`.
  pub fn with_hasher(store: Arc<S>, hasher: Argon2<'static>) -> Self {
    let users = UserService::with_hasher(store.clone(), hasher);
    let categories = CategoryService::new(store.clone());
    let products = ProductService::new(store.clone(), categories.clone());
    let activities = ActivityService::new(users.clone(), products.clone(), store);
    Self { users, categories, products, activities }
  }
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: CatalogStore>(state: AppState<S>) -> Router<()> {
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    .route("/users/{id}/password", post(users::check_password::<S>))
    // Categories
    .route(
      "/categories",
      get(categories::list::<S>).post(categories::create::<S>),
    )
    .route(
      "/categories/{id}",
      get(categories::get_one::<S>)
        .put(categories::update::<S>)
        .delete(categories::delete::<S>),
    )
    // Products
    .route("/products", get(products::list::<S>).post(products::create::<S>))
    .route(
      "/products/{id}",
      get(products::get_one::<S>)
        .put(products::update::<S>)
        .delete(products::delete::<S>),
    )
    // Activities
    .route(
      "/activities",
      get(activities::list::<S>).post(activities::create::<S>),
    )
    .route("/activities/{user_id}", get(activities::by_user::<S>))
    .with_state(state)
}
