//! Main docsource crate: typed document data sources that return failures as values.
//!
//! This crate is the primary entry point. It re-exports the core types, the
//! available storage backends and the todo entity.
//!
//! # Features
//!
//! - **No escaping backend errors** - Every data source operation returns a
//!   [`DataResult`](error::DataResult); a backend fault becomes a
//!   [`DatabaseFailure`](error::DatabaseFailure) tagged with the operation's intent
//! - **Original fault preserved** - The driver's error stays reachable for logging
//!   and downcasting
//! - **Swappable backends** - Data sources depend on the
//!   [`StoreBackend`](backend::StoreBackend) trait only
//!
//! # Quick Start
//!
//! ```ignore
//! use docsource::{prelude::*, memory::InMemoryStore, todo::{TodoItem, TodoItemDataSource}};
//!
//! #[tokio::main]
//! async fn main() {
//!     let items = TodoItemDataSource::new(InMemoryStore::new());
//!
//!     items.create(vec![TodoItem::new("Write the report")]).await.unwrap();
//!
//!     match items.get_all().await {
//!         Ok(items) => println!("Loaded {} items", items.len()),
//!         Err(DatabaseFailure::Retrieve { fault, .. }) => eprintln!("Retrieve failed: {fault:?}"),
//!         Err(other) => eprintln!("{other}"),
//!     }
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB storage (requires `mongodb` feature)

pub mod prelude;
pub mod todo;

pub use docsource_core::{backend, error, normalize, record, source};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docsource_memory::{InMemoryStore, InMemoryStoreBuilder, InMemoryStoreError};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docsource_mongodb::{MongoDbConfig, MongoDbStore, MongoDbStoreBuilder, MongoDbStoreError};
}
