//! User activity events and the closed set of actions they record.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  id::{ProductId, UserId},
};

// ─── Action ──────────────────────────────────────────────────────────────────

/// The kind of interaction a user had with a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Action {
  View,
  AddToCart,
  Purchase,
  RemoveFromCart,
  Wishlist,
  Search,
  Rate,
  Review,
  Click,
  Share,
}

impl Action {
  pub const ALL: [Action; 10] = [
    Self::View,
    Self::AddToCart,
    Self::Purchase,
    Self::RemoveFromCart,
    Self::Wishlist,
    Self::Search,
    Self::Rate,
    Self::Review,
    Self::Click,
    Self::Share,
  ];

  /// The canonical spelling, used on the wire and in storage.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::View => "View",
      Self::AddToCart => "AddToCart",
      Self::Purchase => "Purchase",
      Self::RemoveFromCart => "RemoveFromCart",
      Self::Wishlist => "Wishlist",
      Self::Search => "Search",
      Self::Rate => "Rate",
      Self::Review => "Review",
      Self::Click => "Click",
      Self::Share => "Share",
    }
  }
}

/// Case-insensitive. Unknown text is an error; there is no fallback action.
impl FromStr for Action {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::ALL
      .into_iter()
      .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| Error::InvalidInput(format!("unknown action: {s:?}")))
  }
}

impl TryFrom<String> for Action {
  type Error = Error;

  fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Action> for &'static str {
  fn from(action: Action) -> Self { action.as_str() }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── UserActivity ────────────────────────────────────────────────────────────

/// One recorded interaction. Has no identifier of its own; it is created once
/// and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
  pub user_id:    UserId,
  pub product_id: ProductId,
  pub action:     Action,
}

impl UserActivity {
  pub fn new(user_id: UserId, product_id: ProductId, action: Action) -> Self {
    Self { user_id, product_id, action }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_case_insensitively() {
    assert_eq!("view".parse::<Action>().unwrap(), Action::View);
    assert_eq!("ADDTOCART".parse::<Action>().unwrap(), Action::AddToCart);
    assert_eq!(" RemoveFromCart ".parse::<Action>().unwrap(), Action::RemoveFromCart);
  }

  #[test]
  fn every_canonical_name_round_trips() {
    for action in Action::ALL {
      assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
    }
  }

  #[test]
  fn unknown_text_is_rejected() {
    assert!(matches!("teleport".parse::<Action>(), Err(Error::InvalidInput(_))));
    assert!("".parse::<Action>().is_err());
  }

  #[test]
  fn activity_json_shape() {
    let activity = UserActivity::new(UserId::new("u1"), ProductId::new("p1"), Action::View);
    let json = serde_json::to_value(&activity).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "user_id": "u1", "product_id": "p1", "action": "View" })
    );
  }
}
