//! Lookup services and the activity recording workflow.
//!
//! Services sit between the HTTP layer and a storage backend. They mint ids,
//! hash passwords, and check that referenced entities exist before anything
//! is written. Each service holds its collaborators explicitly; there is no
//! global state.
//!
//! ```rust,ignore
//! let store = Arc::new(SqliteStore::open("shelf.db").await?);
//! let categories = CategoryService::new(store.clone());
//! let products = ProductService::new(store.clone(), categories.clone());
//! let users = UserService::new(store.clone());
//! let activities = ActivityService::new(users.clone(), products.clone(), store);
//! ```

mod activity;
mod catalog;
mod user;

pub use activity::ActivityService;
pub use catalog::{CategoryInput, CategoryService, ProductInput, ProductService};
pub use user::{UserInput, UserService};
