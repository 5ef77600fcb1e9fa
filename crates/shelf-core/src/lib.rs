//! Core types and trait definitions for the Shelf catalog backend.
//!
//! Ids, entity values, the activity [`Action`](activity::Action) set, and the
//! store traits every backend implements. No HTTP or database code lives here.

pub mod activity;
pub mod catalog;
pub mod error;
pub mod id;
pub mod store;
pub mod user;

pub use error::{Error, Result};
