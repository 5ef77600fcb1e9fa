//! [`SqliteStore`]: the relational implementation of the Shelf store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::types::Value;
use shelf_core::{
  activity::UserActivity,
  catalog::{Category, Product},
  id::{CategoryId, ProductId, UserId},
  store::{ActivityStore, Entity as _, EntityKind, EntityStore, Page, ProductStore},
  user::User,
};

use crate::{
  Result,
  encode::{
    RawActivity, RawCategory, RawProduct, RawUser, encode_dt, encode_price,
    encode_window,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a query and map every returned row with `from_row`.
  async fn fetch<R, F>(
    &self,
    sql: String,
    params: Vec<Value>,
    from_row: F,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run a single write statement and return the number of rows it changed.
  async fn execute(&self, sql: &'static str, params: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(params))?))
      .await?;
    Ok(changed)
  }

  /// Map "zero rows changed" to a `NotFound` for the addressed entity.
  fn require_changed(
    changed: usize,
    entity: EntityKind,
    id: impl std::fmt::Display,
  ) -> shelf_core::Result<()> {
    if changed == 0 {
      return Err(shelf_core::Error::not_found(entity, id));
    }
    Ok(())
  }
}

fn windowed(sql: &str, page: Page, mut params: Vec<Value>) -> (String, Vec<Value>) {
  let (limit, offset) = encode_window(page);
  let n = params.len();
  params.push(Value::Integer(limit));
  params.push(Value::Integer(offset));
  (format!("{sql} LIMIT ?{} OFFSET ?{}", n + 1, n + 2), params)
}

// ─── Users ───────────────────────────────────────────────────────────────────

impl EntityStore<User> for SqliteStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<User>> {
    let (sql, params) = windowed(
      &format!("SELECT {} FROM users ORDER BY rowid", RawUser::COLUMNS),
      page,
      vec![],
    );
    let raws = self.fetch(sql, params, RawUser::from_row).await?;
    Ok(raws.into_iter().map(RawUser::into_user).collect::<Result<_>>()?)
  }

  async fn find_by_id(&self, id: &UserId) -> shelf_core::Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS);
    let raws = self
      .fetch(sql, vec![Value::from(id.to_string())], RawUser::from_row)
      .await?;
    Ok(raws.into_iter().next().map(RawUser::into_user).transpose()?)
  }

  async fn create(&self, user: User) -> shelf_core::Result<User> {
    self
      .execute(
        "INSERT INTO users (user_id, name, email, password_hash)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::from(user.id.to_string()),
          Value::from(user.name.clone()),
          Value::from(user.email.clone()),
          Value::from(user.password_hash().as_phc().to_owned()),
        ],
      )
      .await?;
    Ok(user)
  }

  async fn update(&self, id: &UserId, user: User) -> shelf_core::Result<User> {
    let user = user.with_id(id.clone());
    let changed = self
      .execute(
        "UPDATE users SET name = ?2, email = ?3, password_hash = ?4
         WHERE user_id = ?1",
        vec![
          Value::from(id.to_string()),
          Value::from(user.name.clone()),
          Value::from(user.email.clone()),
          Value::from(user.password_hash().as_phc().to_owned()),
        ],
      )
      .await?;
    Self::require_changed(changed, EntityKind::User, id)?;
    Ok(user)
  }

  async fn delete(&self, id: &UserId) -> shelf_core::Result<()> {
    let changed = self
      .execute(
        "DELETE FROM users WHERE user_id = ?1",
        vec![Value::from(id.to_string())],
      )
      .await?;
    Self::require_changed(changed, EntityKind::User, id)
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

impl EntityStore<Category> for SqliteStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<Category>> {
    let (sql, params) = windowed(
      &format!("SELECT {} FROM categories ORDER BY rowid", RawCategory::COLUMNS),
      page,
      vec![],
    );
    let raws = self.fetch(sql, params, RawCategory::from_row).await?;
    Ok(raws.into_iter().map(RawCategory::into_category).collect())
  }

  async fn find_by_id(&self, id: &CategoryId) -> shelf_core::Result<Option<Category>> {
    let sql = format!(
      "SELECT {} FROM categories WHERE category_id = ?1",
      RawCategory::COLUMNS
    );
    let raws = self
      .fetch(sql, vec![Value::from(id.to_string())], RawCategory::from_row)
      .await?;
    Ok(raws.into_iter().next().map(RawCategory::into_category))
  }

  async fn create(&self, category: Category) -> shelf_core::Result<Category> {
    self
      .execute(
        "INSERT INTO categories (category_id, name, description) VALUES (?1, ?2, ?3)",
        vec![
          Value::from(category.id.to_string()),
          Value::from(category.name.clone()),
          Value::from(category.description.clone()),
        ],
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
    let changed = self
      .execute(
        "UPDATE categories SET name = ?2, description = ?3 WHERE category_id = ?1",
        vec![
          Value::from(id.to_string()),
          Value::from(category.name.clone()),
          Value::from(category.description.clone()),
        ],
      )
      .await?;
    Self::require_changed(changed, EntityKind::Category, id)?;
    Ok(category)
  }

  async fn delete(&self, id: &CategoryId) -> shelf_core::Result<()> {
    let changed = self
      .execute(
        "DELETE FROM categories WHERE category_id = ?1",
        vec![Value::from(id.to_string())],
      )
      .await
      .map_err(|e| match e.constraint_violation() {
        Some(_) => shelf_core::Error::Conflict(format!(
          "category {id} is still referenced by products"
        )),
        None => e.into(),
      })?;
    Self::require_changed(changed, EntityKind::Category, id)
  }
}

// ─── Products ────────────────────────────────────────────────────────────────

impl EntityStore<Product> for SqliteStore {
  async fn find_all(&self, page: Page) -> shelf_core::Result<Vec<Product>> {
    let (sql, params) = windowed(
      &format!("SELECT {} FROM products ORDER BY rowid", RawProduct::COLUMNS),
      page,
      vec![],
    );
    let raws = self.fetch(sql, params, RawProduct::from_row).await?;
    Ok(raws.into_iter().map(RawProduct::into_product).collect::<Result<_>>()?)
  }

  async fn find_by_id(&self, id: &ProductId) -> shelf_core::Result<Option<Product>> {
    let sql = format!(
      "SELECT {} FROM products WHERE product_id = ?1",
      RawProduct::COLUMNS
    );
    let raws = self
      .fetch(sql, vec![Value::from(id.to_string())], RawProduct::from_row)
      .await?;
    Ok(raws.into_iter().next().map(RawProduct::into_product).transpose()?)
  }

  async fn create(&self, product: Product) -> shelf_core::Result<Product> {
    self
      .execute(
        "INSERT INTO products (product_id, name, price, category_id)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::from(product.id.to_string()),
          Value::from(product.name.clone()),
          Value::from(encode_price(product.price)),
          Value::from(product.category_id.as_ref().map(ToString::to_string)),
        ],
      )
      .await?;
    Ok(product)
  }

  async fn update(&self, id: &ProductId, product: Product) -> shelf_core::Result<Product> {
    let product = product.with_id(id.clone());
    let changed = self
      .execute(
        "UPDATE products SET name = ?2, price = ?3, category_id = ?4
         WHERE product_id = ?1",
        vec![
          Value::from(id.to_string()),
          Value::from(product.name.clone()),
          Value::from(encode_price(product.price)),
          Value::from(product.category_id.as_ref().map(ToString::to_string)),
        ],
      )
      .await?;
    Self::require_changed(changed, EntityKind::Product, id)?;
    Ok(product)
  }

  async fn delete(&self, id: &ProductId) -> shelf_core::Result<()> {
    let changed = self
      .execute(
        "DELETE FROM products WHERE product_id = ?1",
        vec![Value::from(id.to_string())],
      )
      .await?;
    Self::require_changed(changed, EntityKind::Product, id)
  }
}

impl ProductStore for SqliteStore {
  async fn find_by_category(
    &self,
    category_id: &CategoryId,
    page: Page,
  ) -> shelf_core::Result<Vec<Product>> {
    let (sql, params) = windowed(
      &format!(
        "SELECT {} FROM products WHERE category_id = ?1 ORDER BY rowid",
        RawProduct::COLUMNS
      ),
      page,
      vec![Value::from(category_id.to_string())],
    );
    let raws = self.fetch(sql, params, RawProduct::from_row).await?;
    Ok(raws.into_iter().map(RawProduct::into_product).collect::<Result<_>>()?)
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  async fn save_activity(&self, activity: UserActivity) -> shelf_core::Result<UserActivity> {
    self
      .execute(
        "INSERT INTO user_activity (user_id, product_id, action, recorded_at)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::from(activity.user_id.to_string()),
          Value::from(activity.product_id.to_string()),
          Value::from(activity.action.as_str().to_owned()),
          Value::from(encode_dt(Utc::now())),
        ],
      )
      .await?;
    Ok(activity)
  }

  async fn find_by_user(
    &self,
    user_id: &UserId,
    page: Page,
  ) -> shelf_core::Result<Vec<UserActivity>> {
    let (sql, params) = windowed(
      &format!(
        "SELECT {} FROM user_activity WHERE user_id = ?1 ORDER BY activity_seq",
        RawActivity::COLUMNS
      ),
      page,
      vec![Value::from(user_id.to_string())],
    );
    let raws = self.fetch(sql, params, RawActivity::from_row).await?;
    Ok(raws.into_iter().map(RawActivity::into_activity).collect::<Result<_>>()?)
  }

  async fn find_all_activities(&self, page: Page) -> shelf_core::Result<Vec<UserActivity>> {
    let (sql, params) = windowed(
      &format!(
        "SELECT {} FROM user_activity ORDER BY activity_seq",
        RawActivity::COLUMNS
      ),
      page,
      vec![],
    );
    let raws = self.fetch(sql, params, RawActivity::from_row).await?;
    Ok(raws.into_iter().map(RawActivity::into_activity).collect::<Result<_>>()?)
  }
}
