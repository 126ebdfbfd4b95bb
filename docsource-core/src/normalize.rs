//! Conversion of backend faults into [`DatabaseFailure`] values.
//!
//! The call site always declares which [`FailureKind`] applies; the fault itself is
//! never inspected to pick one. Two entry points are provided:
//!
//! - [`IntoFailure::or_failure`] for a `Result` already in hand
//! - [`normalize`] for a future that resolves to a `Result`
//!
//! # Example
//!
//! ```ignore
//! use docsource_core::normalize::IntoFailure;
//!
//! let context = FailureContext::new("get_all", "todo item");
//! let documents = backend
//!     .find_documents(&namespace)
//!     .await
//!     .or_failure(FailureKind::Retrieve, context)?;
//! ```

use std::future::Future;

use crate::error::{BackendError, DataResult, DatabaseFailure, FailureContext, FailureKind, Fault};

/// Extension trait turning any fallible result into a [`DataResult`].
pub trait IntoFailure<T> {
    /// Maps the error, if any, to the `kind` failure for `context`, keeping it as the fault.
    fn or_failure(self, kind: FailureKind, context: FailureContext) -> DataResult<T>;
}

impl<T, E> IntoFailure<T> for Result<T, E>
where
    E: Into<BackendError>,
{
    fn or_failure(self, kind: FailureKind, context: FailureContext) -> DataResult<T> {
        self.map_err(|error| {
            let fault = Fault::from(error.into());

            tracing::warn!(
                kind = %kind,
                operation = context.operation(),
                entity = context.entity(),
                error = %fault,
                "data source operation failed",
            );

            DatabaseFailure::new(kind, context, Some(fault))
        })
    }
}

/// Awaits `operation` and normalizes its error into the `kind` failure for `context`.
pub async fn normalize<T, E, F>(kind: FailureKind, context: FailureContext, operation: F) -> DataResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BackendError>,
{
    operation
        .await
        .or_failure(kind, context)
}
