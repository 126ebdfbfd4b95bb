//! Typed document data sources that report failures as values.
//!
//! This crate is the core of the docsource project and provides:
//!
//! - **Records** ([`record`]) - The trait every stored entity implements, plus BSON conversion
//! - **Store backend abstraction** ([`backend`]) - The capability a data source depends on
//! - **Failure taxonomy** ([`error`]) - [`DatabaseFailure`](error::DatabaseFailure) and [`DataResult`](error::DataResult)
//! - **Failure normalization** ([`normalize`]) - Turning any backend fault into a typed failure
//! - **Data sources** ([`source`]) - Per-entity access that never lets a backend error escape
//!
//! # Example
//!
//! ```ignore
//! use docsource_core::{record::Record, source::{CollectionDataSource, DataSource}};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! pub struct Note {
//!     pub id: Uuid,
//!     pub body: String,
//! }
//!
//! impl Record for Note {
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn entity_name() -> &'static str {
//!         "note"
//!     }
//! }
//!
//! let notes = CollectionDataSource::<_, Note>::new(backend, "journal", "notes");
//! let all = notes.get_all().await;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docsource_core;

pub mod backend;
pub mod error;
pub mod normalize;
pub mod record;
pub mod source;
