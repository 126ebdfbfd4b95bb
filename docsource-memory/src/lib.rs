//! In-memory storage backend for docsource.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for
//! development, tests and demos.
//!
//! # Quick Start
//!
//! ```ignore
//! use docsource::{memory::InMemoryStore, todo::{TodoItem, TodoItemDataSource}, prelude::*};
//!
//! #[tokio::main]
//! async fn main() {
//!     let items = TodoItemDataSource::new(InMemoryStore::new());
//!
//!     items.create(vec![TodoItem::new("Buy milk")]).await.unwrap();
//!     assert_eq!(items.get_all().await.unwrap().len(), 1);
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docsource_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder, InMemoryStoreError};
