//! Encoding and decoding helpers between Shelf domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Prices are stored as decimal strings, actions by their canonical name, and
//! timestamps as RFC 3339 strings.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelf_core::{
  activity::{Action, UserActivity},
  catalog::{Category, Price, Product},
  id::{CategoryId, ProductId, UserId},
  user::{PasswordHash, User},
};

use crate::Result;

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_price(price: Price) -> String { price.amount().to_string() }

pub fn decode_price(s: &str) -> Result<Price> {
  Ok(Price::new(Decimal::from_str(s)?)?)
}

/// Translate a [`Page`](shelf_core::store::Page) into `LIMIT` / `OFFSET`
/// values. SQLite treats a negative limit as "no limit".
pub fn encode_window(page: shelf_core::store::Page) -> (i64, i64) {
  let limit = page.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
  let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);
  (limit, offset)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, name, email, password_hash";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User::new(
      UserId::new(self.user_id),
      self.name,
      self.email,
      PasswordHash::from_phc(self.password_hash)?,
    ))
  }
}

/// Raw strings read directly from a `categories` row.
pub struct RawCategory {
  pub category_id: String,
  pub name:        String,
  pub description: String,
}

impl RawCategory {
  pub const COLUMNS: &'static str = "category_id, name, description";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      category_id: row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
    })
  }

  pub fn into_category(self) -> Category {
    Category {
      id:          CategoryId::new(self.category_id),
      name:        self.name,
      description: self.description,
    }
  }
}

/// Raw strings read directly from a `products` row.
pub struct RawProduct {
  pub product_id:  String,
  pub name:        String,
  pub price:       String,
  pub category_id: Option<String>,
}

impl RawProduct {
  pub const COLUMNS: &'static str = "product_id, name, price, category_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      product_id:  row.get(0)?,
      name:        row.get(1)?,
      price:       row.get(2)?,
      category_id: row.get(3)?,
    })
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      id:          ProductId::new(self.product_id),
      name:        self.name,
      price:       decode_price(&self.price)?,
      category_id: self.category_id.map(CategoryId::new),
    })
  }
}

/// Raw strings read directly from a `user_activity` row.
pub struct RawActivity {
  pub user_id:    String,
  pub product_id: String,
  pub action:     String,
}

impl RawActivity {
  pub const COLUMNS: &'static str = "user_id, product_id, action";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      product_id: row.get(1)?,
      action:     row.get(2)?,
    })
  }

  pub fn into_activity(self) -> Result<UserActivity> {
    Ok(UserActivity::new(
      UserId::new(self.user_id),
      ProductId::new(self.product_id),
      self.action.parse::<Action>()?,
    ))
  }
}
