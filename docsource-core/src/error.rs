//! Failure taxonomy for data source operations.
//!
//! Failures are classified by what the caller was trying to do ([`FailureKind`]),
//! never by what went wrong underneath. Whatever the backend raised travels along
//! inside the failure as an opaque [`Fault`] so it can still be logged or downcast.
//!
//! Use [`DataResult<T>`] as the return type of every data source operation.

use std::{error::Error as StdError, fmt, sync::Arc};

/// The error type backends hand back to data sources.
///
/// Backends return their native error boxed, so drivers can use `?` freely and the
/// original value survives until it is normalized.
pub type BackendError = Box<dyn StdError + Send + Sync + 'static>;

/// A specialized `Result` type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// The original fault captured when a failure was normalized.
///
/// Shared rather than boxed so a [`DatabaseFailure`] stays cheap to clone.
pub type Fault = Arc<dyn StdError + Send + Sync + 'static>;

/// The operation intent a failure is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Reading records failed.
    Retrieve,
    /// Inserting records failed.
    Create,
    /// Replacing records failed.
    Update,
    /// Removing records failed.
    Delete,
}

impl FailureKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Retrieve => "retrieve",
            FailureKind::Create => "create",
            FailureKind::Update => "update",
            FailureKind::Delete => "delete",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies which operation on which entity type failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FailureContext {
    operation: &'static str,
    entity: &'static str,
}

impl FailureContext {
    /// Creates a context for `operation` (e.g. `"get_all"`) on `entity` (e.g. `"todo item"`).
    pub const fn new(operation: &'static str, entity: &'static str) -> Self {
        Self { operation, entity }
    }

    /// The name of the data source operation.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The entity type the operation was working on.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

impl fmt::Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.operation, self.entity)
    }
}

/// A failed data source operation.
///
/// The variant names the operation intent. Each carries the [`FailureContext`] and,
/// when the failure was caught rather than synthesized, the original [`Fault`],
/// which is also exposed through [`std::error::Error::source`].
///
/// # Example
///
/// ```ignore
/// match source.get_all().await {
///     Ok(items) => render(items),
///     Err(DatabaseFailure::Retrieve { context, fault }) => {
///         tracing::error!(%context, error = ?fault, "could not load items");
///     }
///     Err(other) => return Err(other.into()),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DatabaseFailure {
    /// Reading records failed.
    Retrieve {
        context: FailureContext,
        fault: Option<Fault>,
    },
    /// Inserting records failed.
    Create {
        context: FailureContext,
        fault: Option<Fault>,
    },
    /// Replacing records failed.
    Update {
        context: FailureContext,
        fault: Option<Fault>,
    },
    /// Removing records failed.
    Delete {
        context: FailureContext,
        fault: Option<Fault>,
    },
}

impl fmt::Display for DatabaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind() {
            FailureKind::Retrieve => "Retrieve",
            FailureKind::Create => "Create",
            FailureKind::Update => "Update",
            FailureKind::Delete => "Delete",
        };

        write!(f, "{verb} failed during {}", self.context())
    }
}

// `source()` yields the fault itself, not the `Arc` around it.
impl StdError for DatabaseFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.fault()
            .map(|fault| &**fault as &(dyn StdError + 'static))
    }
}

impl DatabaseFailure {
    /// Builds the failure variant matching `kind`.
    pub fn new(kind: FailureKind, context: FailureContext, fault: Option<Fault>) -> Self {
        match kind {
            FailureKind::Retrieve => DatabaseFailure::Retrieve { context, fault },
            FailureKind::Create => DatabaseFailure::Create { context, fault },
            FailureKind::Update => DatabaseFailure::Update { context, fault },
            FailureKind::Delete => DatabaseFailure::Delete { context, fault },
        }
    }

    /// Wraps a caught fault, keeping it as the failure's source.
    pub fn caught<E>(kind: FailureKind, context: FailureContext, fault: E) -> Self
    where
        E: Into<BackendError>,
    {
        Self::new(kind, context, Some(Fault::from(fault.into())))
    }

    /// Builds a failure that was not caused by any underlying fault.
    pub fn synthesized(kind: FailureKind, context: FailureContext) -> Self {
        Self::new(kind, context, None)
    }

    /// The operation intent this failure is filed under.
    pub fn kind(&self) -> FailureKind {
        match self {
            DatabaseFailure::Retrieve { .. } => FailureKind::Retrieve,
            DatabaseFailure::Create { .. } => FailureKind::Create,
            DatabaseFailure::Update { .. } => FailureKind::Update,
            DatabaseFailure::Delete { .. } => FailureKind::Delete,
        }
    }

    /// Which operation on which entity type failed.
    pub fn context(&self) -> &FailureContext {
        match self {
            DatabaseFailure::Retrieve { context, .. }
            | DatabaseFailure::Create { context, .. }
            | DatabaseFailure::Update { context, .. }
            | DatabaseFailure::Delete { context, .. } => context,
        }
    }

    /// Returns the original fault, if this failure was caught rather than synthesized.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            DatabaseFailure::Retrieve { fault, .. }
            | DatabaseFailure::Create { fault, .. }
            | DatabaseFailure::Update { fault, .. }
            | DatabaseFailure::Delete { fault, .. } => fault.as_ref(),
        }
    }

    /// Attempts to view the original fault as a concrete error type.
    pub fn fault_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.fault()
            .and_then(|fault| fault.downcast_ref::<E>())
    }
}

/// Two failures are equal when they share kind and context and their faults are
/// either both absent or render the same message.
impl PartialEq for DatabaseFailure {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.context() == other.context()
            && match (self.fault(), other.fault()) {
                (None, None) => true,
                (Some(left), Some(right)) => {
                    Arc::ptr_eq(left, right) || left.to_string() == right.to_string()
                }
                _ => false,
            }
    }
}

/// A specialized `Result` type for data source operations.
pub type DataResult<T> = Result<T, DatabaseFailure>;
