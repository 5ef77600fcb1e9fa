//! Document/search backend for the Shelf catalog.
//!
//! Entities are stored as JSON documents in named tantivy indices, on disk or
//! in memory, and read back with term or match-all searches. The store
//! mints document ids itself, and activities are keyed by their
//! (user, product) pair so that a repeat activity replaces the earlier one.

mod document;
mod index;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use index::{Hit, Indices, Query};
pub use store::{ACTIVITY_INDEX, CATEGORY_INDEX, DocumentStore, PRODUCT_INDEX, USER_INDEX};
