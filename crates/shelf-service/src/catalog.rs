//! Category and product lookup.

use std::sync::Arc;

use shelf_core::{
  Error, Result,
  catalog::{Category, Price, Product},
  id::{CategoryId, ProductId},
  store::{EntityKind, EntityStore, Page, ProductStore},
};

// ─── Categories ──────────────────────────────────────────────────────────────

/// Fields a caller supplies for a category; the id is never one of them.
#[derive(Debug, Clone)]
pub struct CategoryInput {
  pub name:        String,
  pub description: String,
}

impl CategoryInput {
  fn into_category(self, id: CategoryId) -> Category {
    Category { id, name: self.name, description: self.description }
  }
}

pub struct CategoryService<S> {
  store: Arc<S>,
}

impl<S> Clone for CategoryService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: EntityStore<Category>> CategoryService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn find_all(&self, page: Page) -> Result<Vec<Category>> {
    self.store.find_all(page).await
  }

  pub async fn find_by_id(&self, id: &CategoryId) -> Result<Category> {
    self
      .store
      .find_by_id(id)
      .await?
      .ok_or_else(|| Error::not_found(EntityKind::Category, id))
  }

  pub async fn create(&self, input: CategoryInput) -> Result<Category> {
    let category = self
      .store
      .create(input.into_category(CategoryId::generate()))
      .await?;
    tracing::info!(category_id = %category.id, "created category");
    Ok(category)
  }

  pub async fn update(&self, id: &CategoryId, input: CategoryInput) -> Result<Category> {
    let category = self
      .store
      .update(id, input.into_category(id.clone()))
      .await?;
    tracing::debug!(category_id = %id, "updated category");
    Ok(category)
  }

  pub async fn delete(&self, id: &CategoryId) -> Result<()> {
    self.store.delete(id).await?;
    tracing::info!(category_id = %id, "deleted category");
    Ok(())
  }
}

// ─── Products ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProductInput {
  pub name:        String,
  pub price:       Price,
  pub category_id: Option<CategoryId>,
}

impl ProductInput {
  fn into_product(self, id: ProductId) -> Product {
    Product {
      id,
      name: self.name,
      price: self.price,
      category_id: self.category_id,
    }
  }
}

/// Product lookup. A category reference on the input must resolve through
/// the category service before the product is written.
///
/// `P` and `C` are usually the same backend; they are split so that each
/// bound names exactly one entity store.
pub struct ProductService<P, C = P> {
  products:   Arc<P>,
  categories: CategoryService<C>,
}

impl<P, C> Clone for ProductService<P, C> {
  fn clone(&self) -> Self {
    Self {
      products:   Arc::clone(&self.products),
      categories: self.categories.clone(),
    }
  }
}

impl<P, C> ProductService<P, C>
where
  P: ProductStore,
  C: EntityStore<Category>,
{
  pub fn new(products: Arc<P>, categories: CategoryService<C>) -> Self {
    Self { products, categories }
  }

  pub async fn find_all(&self, page: Page) -> Result<Vec<Product>> {
    self.products.find_all(page).await
  }

  pub async fn find_by_id(&self, id: &ProductId) -> Result<Product> {
    self
      .products
      .find_by_id(id)
      .await?
      .ok_or_else(|| Error::not_found(EntityKind::Product, id))
  }

  pub async fn find_by_category(
    &self,
    category_id: &CategoryId,
    page: Page,
  ) -> Result<Vec<Product>> {
    self.products.find_by_category(category_id, page).await
  }

  pub async fn create(&self, input: ProductInput) -> Result<Product> {
    self.resolve_category(input.category_id.as_ref()).await?;
    let product = self
      .products
      .create(input.into_product(ProductId::generate()))
      .await?;
    tracing::info!(product_id = %product.id, "created product");
    Ok(product)
  }

  pub async fn update(&self, id: &ProductId, input: ProductInput) -> Result<Product> {
    self.resolve_category(input.category_id.as_ref()).await?;
    let product = self
      .products
      .update(id, input.into_product(id.clone()))
      .await?;
    tracing::debug!(product_id = %id, "updated product");
    Ok(product)
  }

  pub async fn delete(&self, id: &ProductId) -> Result<()> {
    self.products.delete(id).await?;
    tracing::info!(product_id = %id, "deleted product");
    Ok(())
  }

  async fn resolve_category(&self, category_id: Option<&CategoryId>) -> Result<()> {
    let Some(category_id) = category_id else {
      return Ok(());
    };
    if let Err(err) = self.categories.find_by_id(category_id).await {
      tracing::warn!(%category_id, error = %err, "product category did not resolve");
      return Err(err.into_reference());
    }
    Ok(())
  }
}
