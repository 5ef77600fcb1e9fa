//! Opaque identifiers for the stored entities.
//!
//! Ids are plain strings on the wire and in storage. Services mint them as
//! random v4 UUIDs, but nothing below the request boundary depends on that
//! format.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! opaque_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

      /// Mint a fresh, globally unique identifier.
      pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

      pub fn as_str(&self) -> &str { &self.0 }

      pub fn into_inner(self) -> String { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<String> for $name {
      fn from(id: String) -> Self { Self(id) }
    }

    impl From<&str> for $name {
      fn from(id: &str) -> Self { Self(id.to_owned()) }
    }

    impl AsRef<str> for $name {
      fn as_ref(&self) -> &str { &self.0 }
    }
  };
}

opaque_id!(
  /// Identifies a [`User`](crate::user::User).
  UserId
);

opaque_id!(
  /// Identifies a [`Category`](crate::catalog::Category).
  CategoryId
);

opaque_id!(
  /// Identifies a [`Product`](crate::catalog::Product).
  ProductId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_ids_are_uuids_and_distinct() {
    let a = UserId::generate();
    let b = UserId::generate();
    assert_ne!(a, b);
    assert!(Uuid::parse_str(a.as_str()).is_ok());
  }

  #[test]
  fn serialises_as_bare_string() {
    let id = ProductId::new("p1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
  }
}
