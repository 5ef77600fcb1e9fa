//! Error type for `shelf-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] shelf_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// The SQLite message for a constraint violation (duplicate primary key,
  /// foreign key), if that is what this error is.
  pub(crate) fn constraint_violation(&self) -> Option<String> {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(failure, message),
    )) = self
    else {
      return None;
    };
    (failure.code == rusqlite::ErrorCode::ConstraintViolation)
      .then(|| message.clone().unwrap_or_else(|| failure.to_string()))
  }
}

/// Constraint violations become [`shelf_core::Error::Conflict`]; every other
/// driver or decoding failure is a storage failure.
impl From<Error> for shelf_core::Error {
  fn from(err: Error) -> Self {
    match err.constraint_violation() {
      Some(message) => shelf_core::Error::Conflict(message),
      None => shelf_core::Error::storage(err),
    }
  }
}
