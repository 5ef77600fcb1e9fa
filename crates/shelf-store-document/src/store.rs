//! [`DocumentStore`]: the document/search implementation of the Shelf store
//! traits.

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use shelf_core::{
  activity::UserActivity,
  catalog::{Category, Product},
  id::{CategoryId, ProductId, UserId},
  store::{ActivityStore, Entity as _, EntityKind, EntityStore, Page, ProductStore},
  user::User,
};

use crate::{
  Error, Result,
  document::{ActivityDoc, CategoryDoc, ProductDoc, UserDoc},
  index::{Indices, Query},
};

pub const USER_INDEX: &str = "users";
pub const PRODUCT_INDEX: &str = "products";
pub const CATEGORY_INDEX: &str = "categories";
pub const ACTIVITY_INDEX: &str = "user_activity";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf store backed by document indices.
///
/// `create` always mints a fresh id, discarding whatever id the caller put on
/// the value. List reads are searches, bounded only by the [`Page`] passed in.
#[derive(Clone)]
pub struct DocumentStore {
  indices: Indices,
}

impl DocumentStore {
  /// A store whose indices live on disk under `root`, one directory per
  /// index. Documents already there are kept.
  pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
    Self::with_indices(Indices::open(root)).await
  }

  /// A store over fresh in-memory indices.
  pub async fn open_in_memory() -> Result<Self> {
    Self::with_indices(Indices::in_memory()).await
  }

  /// A store over existing indices, opening any of the four Shelf indices
  /// that are not open yet.
  pub async fn with_indices(indices: Indices) -> Result<Self> {
    let layout: [(&str, &[&str]); 4] = [
      (USER_INDEX, &[]),
      (PRODUCT_INDEX, &["category.id"]),
      (CATEGORY_INDEX, &[]),
      (ACTIVITY_INDEX, &["user_id"]),
    ];
    for (name, filterable) in layout {
      if indices.create_index(name, filterable).await? {
        tracing::debug!(index = name, "created document index");
      }
    }
    Ok(Self { indices })
  }

  pub fn indices(&self) -> &Indices { &self.indices }

  async fn load<D: DeserializeOwned>(&self, index: &str, id: &str) -> Result<Option<D>> {
    self
      .indices
      .get(index, id)
      .await?
      .map(serde_json::from_value)
      .transpose()
      .map_err(Error::from)
  }

  async fn search_docs<D: DeserializeOwned>(
    &self,
    index: &str,
    query: &Query,
    page: Page,
  ) -> Result<Vec<D>> {
    self
      .indices
      .search(index, query, page)
      .await?
      .into_iter()
      .map(|hit| serde_json::from_value(hit.source).map_err(Error::from))
      .collect()
  }

  async fn put_doc<D: Serialize>(&self, index: &str, id: &str, doc: &D) -> Result<()> {
    self.indices.put(index, id, serde_json::to_value(doc)?).await
  }

  async fn update_doc<D: Serialize>(
    &self,
    kind: EntityKind,
    index: &str,
    id: &str,
    doc: &D,
  ) -> shelf_core::Result<()> {
    let source = serde_json::to_value(doc).map_err(Error::from)?;
    match self.indices.update(index, id, source).await {
      Err(Error::DocumentMissing { .. }) => Err(shelf_core::Error::not_found(kind, id)),
      other => Ok(other?),
    }
  }

  async fn delete_doc(&self, kind: EntityKind, index: &str, id: &str) -> shelf_core::Result<()> {
    if !self.indices.delete(index, id).await? {
      return Err(shelf_core::Error::not_found(kind, id));
    }
    Ok(())
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

impl EntityStore<User> for DocumentStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<User>> {
    let docs: Vec<UserDoc> = self.search_docs(USER_INDEX, &Query::MatchAll, page).await?;
    Ok(docs.into_iter().map(UserDoc::into_user).collect::<Result<_>>()?)
  }

  async fn find_by_id(&self, id: &UserId) -> shelf_core::Result<Option<User>> {
    let doc: Option<UserDoc> = self.load(USER_INDEX, id.as_str()).await?;
    Ok(doc.map(UserDoc::into_user).transpose()?)
  }

  async fn create(&self, user: User) -> shelf_core::Result<User> {
    let user = user.with_id(UserId::generate());
    self
      .put_doc(USER_INDEX, user.id.as_str(), &UserDoc::from_user(&user))
      .await?;
    Ok(user)
  }

  async fn update(&self, id: &UserId, user: User) -> shelf_core::Result<User> {
    let user = user.with_id(id.clone());
    self
      .update_doc(EntityKind::User, USER_INDEX, id.as_str(), &UserDoc::from_user(&user))
      .await?;
    Ok(user)
  }

  async fn delete(&self, id: &UserId) -> shelf_core::Result<()> {
    self.delete_doc(EntityKind::User, USER_INDEX, id.as_str()).await
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

impl EntityStore<Category> for DocumentStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<Category>> {
    let docs: Vec<CategoryDoc> =
      self.search_docs(CATEGORY_INDEX, &Query::MatchAll, page).await?;
    Ok(docs.into_iter().map(CategoryDoc::into_category).collect())
  }

  async fn find_by_id(&self, id: &CategoryId) -> shelf_core::Result<Option<Category>> {
    let doc: Option<CategoryDoc> = self.load(CATEGORY_INDEX, id.as_str()).await?;
    Ok(doc.map(CategoryDoc::into_category))
  }

  async fn create(&self, category: Category) -> shelf_core::Result<Category> {
    let category = category.with_id(CategoryId::generate());
    self
      .put_doc(
        CATEGORY_INDEX,
        category.id.as_str(),
        &CategoryDoc::from_category(&category),
      )
      .await?;
    Ok(category)
  }

  async fn update(
    &self,
    id: &CategoryId,
    category: Category,
  ) -> shelf_core::Result<Category> {
    let category = category.with_id(id.clone());
    self
      .update_doc(
        EntityKind::Category,
        CATEGORY_INDEX,
        id.as_str(),
        &CategoryDoc::from_category(&category),
      )
      .await?;
    Ok(category)
  }

  /// Refused while any product document still points at the category.
  async fn delete(&self, id: &CategoryId) -> shelf_core::Result<()> {
    let referencing = self
      .indices
      .search(
        PRODUCT_INDEX,
        &Query::term("category.id", id.as_str()),
        Page::new(Some(1), 0),
      )
      .await?;
    if !referencing.is_empty() {
      return Err(shelf_core::Error::Conflict(format!(
        "category {id} is still referenced by products"
      )));
    }
    self.delete_doc(EntityKind::Category, CATEGORY_INDEX, id.as_str()).await
  }
}

// ─── Products ────────────────────────────────────────────────────────────────

impl EntityStore<Product> for DocumentStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<Product>> {
    let docs: Vec<ProductDoc> =
      self.search_docs(PRODUCT_INDEX, &Query::MatchAll, page).await?;
    Ok(docs.into_iter().map(ProductDoc::into_product).collect::<Result<_>>()?)
  }

  async fn find_by_id(&self, id: &ProductId) -> shelf_core::Result<Option<Product>> {
    let doc: Option<ProductDoc> = self.load(PRODUCT_INDEX, id.as_str()).await?;
    Ok(doc.map(ProductDoc::into_product).transpose()?)
  }

  async fn create(&self, product: Product) -> shelf_core::Result<Product> {
    let product = product.with_id(ProductId::generate());
    self
      .put_doc(
        PRODUCT_INDEX,
        product.id.as_str(),
        &ProductDoc::from_product(&product),
      )
      .await?;
    Ok(product)
  }

  async fn update(&self, id: &ProductId, product: Product) -> shelf_core::Result<Product> {
    let product = product.with_id(id.clone());
    self
      .update_doc(
        EntityKind::Product,
        PRODUCT_INDEX,
        id.as_str(),
        &ProductDoc::from_product(&product),
      )
      .await?;
    Ok(product)
  }

  async fn delete(&self, id: &ProductId) -> shelf_core::Result<()> {
    self.delete_doc(EntityKind::Product, PRODUCT_INDEX, id.as_str()).await
  }
}

impl ProductStore for DocumentStore {
  async fn find_by_category(
    &self,
    category_id: &CategoryId,
    page: Page,
  ) -> shelf_core::Result<Vec<Product>> {
    let query = Query::term("category.id", category_id.as_str());
    let docs: Vec<ProductDoc> = self.search_docs(PRODUCT_INDEX, &query, page).await?;
    Ok(docs.into_iter().map(ProductDoc::into_product).collect::<Result<_>>()?)
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

impl ActivityStore for DocumentStore {
  /// Keyed by (user, product): recording the same pair again replaces the
  /// earlier document.
  async fn save_activity(&self, activity: UserActivity) -> shelf_core::Result<UserActivity> {
    self
      .put_doc(
        ACTIVITY_INDEX,
        &ActivityDoc::key(&activity),
        &ActivityDoc::from_activity(&activity),
      )
      .await?;
    Ok(activity)
  }

  async fn find_by_user(
    &self,
    user_id: &UserId,
    page: Page,
  ) -> shelf_core::Result<Vec<UserActivity>> {
    let query = Query::term("user_id", user_id.as_str());
    let docs: Vec<ActivityDoc> = self.search_docs(ACTIVITY_INDEX, &query, page).await?;
    Ok(docs.into_iter().map(ActivityDoc::into_activity).collect::<Result<_>>()?)
  }

  async fn find_all_activities(&self, page: Page) -> shelf_core::Result<Vec<UserActivity>> {
    let docs: Vec<ActivityDoc> =
      self.search_docs(ACTIVITY_INDEX, &Query::MatchAll, page).await?;
    Ok(docs.into_iter().map(ActivityDoc::into_activity).collect::<Result<_>>()?)
  }
}
