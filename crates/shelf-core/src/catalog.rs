//! Categories and products.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::{CategoryId, ProductId},
};

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          CategoryId,
  pub name:        String,
  pub description: String,
}

// ─── Price ───────────────────────────────────────────────────────────────────

/// A strictly positive decimal amount.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
  pub fn new(amount: Decimal) -> Result<Self> {
    if amount <= Decimal::ZERO {
      return Err(Error::InvalidInput(format!(
        "price must be greater than zero, got {amount}"
      )));
    }
    Ok(Self(amount))
  }

  pub fn amount(&self) -> Decimal { self.0 }
}

impl TryFrom<Decimal> for Price {
  type Error = Error;

  fn try_from(amount: Decimal) -> Result<Self> { Self::new(amount) }
}

impl From<Price> for Decimal {
  fn from(price: Price) -> Self { price.0 }
}

impl fmt::Display for Price {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Product ─────────────────────────────────────────────────────────────────

/// A product for sale. The category is held as a reference by id, never as
/// an embedded copy of the category's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id:          ProductId,
  pub name:        String,
  pub price:       Price,
  pub category_id: Option<CategoryId>,
}
