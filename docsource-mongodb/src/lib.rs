//! MongoDB backend implementation for docsource.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! To use it, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docsource = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The connection string and client options come from [`MongoDbConfig`], which
//! layers built-in defaults under `DOCSOURCE_MONGODB_*` environment variables.
//! Callers that already own a `mongodb::Client` can pass it to [`MongoDbStore::new`].
//!
//! # Example
//!
//! ```ignore
//! use docsource::{backend::StoreBackendBuilder, mongodb::{MongoDbConfig, MongoDbStore}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder(MongoDbConfig::load()?)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docsource_mongodb;

pub mod config;
pub mod error;
pub mod store;

pub use config::MongoDbConfig;
pub use error::MongoDbStoreError;
pub use store::{MongoDbStore, MongoDbStoreBuilder};
