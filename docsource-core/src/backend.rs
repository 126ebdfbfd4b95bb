//! Storage backend abstraction used by data sources.
//!
//! A backend is the capability a data source depends on: address a named collection
//! inside a named logical database and run an operation against it. Data sources
//! never see a concrete driver type, so any implementation of [`StoreBackend`]
//! (MongoDB, in-memory, or a test double) can stand behind them.
//!
//! Backends report faults as [`BackendError`](crate::error::BackendError) and leave
//! classification to the data source.
//!
//! # Example
//!
//! ```ignore
//! use docsource::backend::{Namespace, StoreBackend};
//! use bson::{Uuid, Bson, doc};
//!
//! let namespace = Namespace::new("todo", "items");
//! let id = Uuid::new();
//! backend
//!     .insert_documents(&namespace, vec![(id, Bson::Document(doc! { "title": "Write docs" }))])
//!     .await?;
//! let documents = backend.find_documents(&namespace).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::{fmt, fmt::Debug, sync::Arc};

use crate::error::BackendResult;

/// A logical database name paired with a collection name inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Pairs `collection` with the logical `database` that holds it.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// The logical database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The collection name within the database.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; data sources share one backend across
/// concurrent calls without additional locking.
///
/// # Errors
///
/// Every method returns the backend's native error boxed as a
/// [`BackendError`](crate::error::BackendError). Implementations should not wrap or
/// stringify driver errors, since data sources keep them as the failure's fault.
///
/// Batch checks happen before the first write. Backends without transactions
/// (MongoDB) can still interleave with a concurrent writer between the check and
/// the write.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Returns every document in the collection, in the order the store yields them.
    ///
    /// A collection that does not exist yet reads as empty.
    async fn find_documents(&self, namespace: &Namespace) -> BackendResult<Vec<Bson>>;

    /// Inserts new documents keyed by their ids.
    ///
    /// Fails without writing anything if any id is already stored or repeated
    /// within the batch.
    async fn insert_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()>;

    /// Replaces existing documents with the same ids.
    ///
    /// Every id must already be stored. The batch is checked before any document
    /// is replaced, so a missing id fails the call without writing anything.
    async fn update_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()>;

    /// Removes the documents with the given ids.
    ///
    /// Every id must already be stored. As with updates, a missing id fails the
    /// call before anything is removed.
    async fn delete_documents(&self, namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()>;

    /// Releases connections and other resources held by the backend.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> BackendResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn find_documents(&self, namespace: &Namespace) -> BackendResult<Vec<Bson>> {
        (*self).find_documents(namespace).await
    }

    async fn insert_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()> {
        (*self)
            .insert_documents(namespace, documents)
            .await
    }

    async fn update_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()> {
        (*self)
            .update_documents(namespace, documents)
            .await
    }

    async fn delete_documents(&self, namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()> {
        (*self)
            .delete_documents(namespace, ids)
            .await
    }
}

#[async_trait]
impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend,
{
    async fn find_documents(&self, namespace: &Namespace) -> BackendResult<Vec<Bson>> {
        (**self).find_documents(namespace).await
    }

    async fn insert_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()> {
        (**self)
            .insert_documents(namespace, documents)
            .await
    }

    async fn update_documents(
        &self,
        namespace: &Namespace,
        documents: Vec<(Uuid, Bson)>,
    ) -> BackendResult<()> {
        (**self)
            .update_documents(namespace, documents)
            .await
    }

    async fn delete_documents(&self, namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()> {
        (**self)
            .delete_documents(namespace, ids)
            .await
    }
}

/// Factory trait for backends that need asynchronous setup.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn build(self) -> Result<Self::Backend, Self::Error>;
}
