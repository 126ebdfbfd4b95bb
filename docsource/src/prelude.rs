//! Convenient re-exports of commonly used types from docsource.
//!
//! ```ignore
//! use docsource::prelude::*;
//! ```

pub use docsource_core::{
    backend::{Namespace, StoreBackend, StoreBackendBuilder},
    error::{BackendError, BackendResult, DataResult, DatabaseFailure, FailureContext, FailureKind, Fault},
    normalize::{IntoFailure, normalize},
    record::{Record, RecordExt},
    source::{CollectionDataSource, DataSource},
};
