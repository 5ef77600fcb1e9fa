//! The entity store traits and supporting query types.
//!
//! The traits are implemented by storage backends (`shelf-store-sqlite`,
//! `shelf-store-document`). Higher layers (`shelf-service`, `shelf-api`)
//! depend on this abstraction, never on a concrete backend.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  activity::UserActivity,
  catalog::{Category, Product},
  id::{CategoryId, ProductId, UserId},
  user::User,
};

// ─── Entity kinds ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  User,
  Category,
  Product,
  Activity,
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::User => "user",
      Self::Category => "category",
      Self::Product => "product",
      Self::Activity => "activity",
    })
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// A result window for list and search reads. The default window is
/// unbounded, so callers that pass [`Page::all`] get the whole matching set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
  pub limit:  Option<usize>,
  pub offset: usize,
}

impl Page {
  pub const fn all() -> Self { Self { limit: None, offset: 0 } }

  pub const fn new(limit: Option<usize>, offset: usize) -> Self {
    Self { limit, offset }
  }

  /// Apply the window to an already-ordered sequence.
  pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
    let skipped = items.into_iter().skip(self.offset);
    match self.limit {
      Some(limit) => skipped.take(limit).collect(),
      None => skipped.collect(),
    }
  }
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// A value that an [`EntityStore`] can persist under its own identifier.
pub trait Entity: Clone + Send + Sync + 'static {
  const KIND: EntityKind;
  type Id: Clone + fmt::Display + Send + Sync + 'static;

  fn id(&self) -> &Self::Id;

  /// The same value under a different identifier.
  fn with_id(self, id: Self::Id) -> Self;
}

impl Entity for User {
  const KIND: EntityKind = EntityKind::User;
  type Id = UserId;

  fn id(&self) -> &UserId { &self.id }

  fn with_id(self, id: UserId) -> Self { self.with_new_id(id) }
}

impl Entity for Category {
  const KIND: EntityKind = EntityKind::Category;
  type Id = CategoryId;

  fn id(&self) -> &CategoryId { &self.id }

  fn with_id(self, id: CategoryId) -> Self { Self { id, ..self } }
}

impl Entity for Product {
  const KIND: EntityKind = EntityKind::Product;
  type Id = ProductId;

  fn id(&self) -> &ProductId { &self.id }

  fn with_id(self, id: ProductId) -> Self { Self { id, ..self } }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Persistence for one entity type.
///
/// Whether `create` keeps the caller's id or mints its own is up to the
/// backend; callers must use the id on the returned value.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EntityStore<E: Entity>: Send + Sync {
  fn find_all(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<E>>> + Send + '_;

  /// Returns `None` if no entity has this id.
  fn find_by_id<'a>(
    &'a self,
    id: &'a E::Id,
  ) -> impl Future<Output = Result<Option<E>>> + Send + 'a;

  fn create(&self, entity: E) -> impl Future<Output = Result<E>> + Send + '_;

  /// Replace the entity stored under `id`. Fails with
  /// [`Error::NotFound`](crate::Error::NotFound) if there is none.
  fn update<'a>(
    &'a self,
    id: &'a E::Id,
    entity: E,
  ) -> impl Future<Output = Result<E>> + Send + 'a;

  /// Fails with [`Error::NotFound`](crate::Error::NotFound) if there is
  /// nothing to delete, and with [`Error::Conflict`](crate::Error::Conflict)
  /// if other entities still reference this one.
  fn delete<'a>(
    &'a self,
    id: &'a E::Id,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

/// Product persistence, plus lookup by category reference.
pub trait ProductStore: EntityStore<Product> {
  fn find_by_category<'a>(
    &'a self,
    category_id: &'a CategoryId,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Product>>> + Send + 'a;
}

/// Append-style persistence for activity events.
pub trait ActivityStore: Send + Sync {
  /// Persist an activity. Backends that key activities by (user, product)
  /// overwrite any earlier record for the same pair.
  fn save_activity(
    &self,
    activity: UserActivity,
  ) -> impl Future<Output = Result<UserActivity>> + Send + '_;

  fn find_by_user<'a>(
    &'a self,
    user_id: &'a UserId,
    page: Page,
  ) -> impl Future<Output = Result<Vec<UserActivity>>> + Send + 'a;

  fn find_all_activities(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<UserActivity>>> + Send + '_;
}

/// Everything the services need from one backend.
pub trait CatalogStore:
  EntityStore<User> + EntityStore<Category> + ProductStore + ActivityStore + 'static
{
}

impl<T> CatalogStore for T where
  T: EntityStore<User> + EntityStore<Category> + ProductStore + ActivityStore + 'static
{
}
