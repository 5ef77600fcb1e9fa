//! Error type for `shelf-store-document`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] shelf_core::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("index error: {0}")]
  Tantivy(#[from] tantivy::TantivyError),

  #[error("cannot open index directory: {0}")]
  Directory(#[from] tantivy::directory::error::OpenDirectoryError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("index task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("no such index: {0}")]
  IndexMissing(String),

  #[error("field {field} is not filterable in index {index}")]
  NotFilterable { index: String, field: String },

  #[error("document in index {index} has no {field}")]
  MalformedDocument { index: String, field: &'static str },

  #[error("document {id} not found in index {index}")]
  DocumentMissing { index: String, id: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that reaches the store traits as a raw index error is a
/// storage failure; misses are translated to `NotFound` by the store itself.
impl From<Error> for shelf_core::Error {
  fn from(err: Error) -> Self { shelf_core::Error::storage(err) }
}
