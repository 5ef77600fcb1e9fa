//! Document shapes stored in each index, and their mapping to domain values.
//!
//! Products embed their category as a `{"category": {"id": ...}}`
//! sub-document; only the id is ever stored there.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelf_core::{
  activity::{Action, UserActivity},
  catalog::{Category, Price, Product},
  id::{CategoryId, ProductId, UserId},
  user::{PasswordHash, User},
};

use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDoc {
  pub id:            String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

impl UserDoc {
  pub fn from_user(user: &User) -> Self {
    Self {
      id:            user.id.to_string(),
      name:          user.name.clone(),
      email:         user.email.clone(),
      password_hash: user.password_hash().as_phc().to_owned(),
    }
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User::new(
      UserId::new(self.id),
      self.name,
      self.email,
      PasswordHash::from_phc(self.password_hash)?,
    ))
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryDoc {
  pub id:          String,
  pub name:        String,
  pub description: String,
}

impl CategoryDoc {
  pub fn from_category(category: &Category) -> Self {
    Self {
      id:          category.id.to_string(),
      name:        category.name.clone(),
      description: category.description.clone(),
    }
  }

  pub fn into_category(self) -> Category {
    Category {
      id:          CategoryId::new(self.id),
      name:        self.name,
      description: self.description,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryRef {
  pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDoc {
  pub id:       String,
  pub name:     String,
  #[serde(with = "rust_decimal::serde::str")]
  pub price:    Decimal,
  pub category: Option<CategoryRef>,
}

impl ProductDoc {
  pub fn from_product(product: &Product) -> Self {
    Self {
      id:       product.id.to_string(),
      name:     product.name.clone(),
      price:    product.price.amount(),
      category: product
        .category_id
        .as_ref()
        .map(|id| CategoryRef { id: id.to_string() }),
    }
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      id:          ProductId::new(self.id),
      name:        self.name,
      price:       Price::new(self.price)?,
      category_id: self.category.map(|c| CategoryId::new(c.id)),
    })
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityDoc {
  pub user_id:    String,
  pub product_id: String,
  pub action:     String,
}

impl ActivityDoc {
  /// Activities have no id of their own; the pair they describe is the key.
  /// The user id is length-prefixed so that no two pairs share a key.
  pub fn key(activity: &UserActivity) -> String {
    let user_id = activity.user_id.as_str();
    format!("{}:{}_{}", user_id.len(), user_id, activity.product_id)
  }

  pub fn from_activity(activity: &UserActivity) -> Self {
    Self {
      user_id:    activity.user_id.to_string(),
      product_id: activity.product_id.to_string(),
      action:     activity.action.as_str().to_owned(),
    }
  }

  pub fn into_activity(self) -> Result<UserActivity> {
    Ok(UserActivity::new(
      UserId::new(self.user_id),
      ProductId::new(self.product_id),
      self.action.parse::<Action>()?,
    ))
  }
}
