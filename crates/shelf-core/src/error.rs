//! Error types for `shelf-core`.
//!
//! Every layer above the storage backends reports failures through this one
//! enum, so callers can tell bad input apart from an unavailable backend.

use std::fmt::Display;

use thiserror::Error;

use crate::store::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed identifier, unknown action, or a field that failed validation.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The entity addressed directly by a lookup, update, or delete is absent.
  #[error("{entity} not found: {id}")]
  NotFound { entity: EntityKind, id: String },

  /// An entity referenced by another one is absent at write time.
  #[error("referenced {entity} does not exist: {id}")]
  ReferenceNotFound { entity: EntityKind, id: String },

  /// The write would break a storage-level constraint (duplicate id, a
  /// category still referenced by products).
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("credential error: {0}")]
  Credential(String),
}

impl Error {
  pub fn not_found(entity: EntityKind, id: impl Display) -> Self {
    Self::NotFound { entity, id: id.to_string() }
  }

  pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StorageUnavailable(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }

  /// Reclassify a direct-lookup miss as a dangling reference. Any other error
  /// passes through untouched.
  pub fn into_reference(self) -> Self {
    match self {
      Self::NotFound { entity, id } => Self::ReferenceNotFound { entity, id },
      other => other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
