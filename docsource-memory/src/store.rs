//! In-memory storage implementation for data sources.
//!
//! Documents are kept as BSON values in insertion order, grouped by
//! [`Namespace`], behind an async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Uuid, Bson};
use thiserror::Error;

use docsource_core::{
    backend::{Namespace, StoreBackend, StoreBackendBuilder},
    error::BackendResult,
};

type CollectionEntries = Vec<(Uuid, Bson)>;
type StoreMap = HashMap<Namespace, CollectionEntries>;


/// Errors raised by [`InMemoryStore`].
///
/// These reach callers as the fault inside a
/// [`DatabaseFailure`](docsource_core::error::DatabaseFailure).
#[derive(Debug, Error, PartialEq)]
pub enum InMemoryStoreError {
    /// A document with this id is already stored in the collection.
    #[error("Document {id} already exists in {namespace}")]
    DocumentAlreadyExists { id: Uuid, namespace: Namespace },
    /// No document with this id is stored in the collection.
    #[error("Document {id} not found in {namespace}")]
    DocumentNotFound { id: Uuid, namespace: Namespace },
    /// Nothing has ever been written to the collection.
    #[error("Collection not found: {0}")]
    CollectionNotFound(Namespace),
}

/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones
/// share the same data and can be handed to several data sources at once.
///
/// # Ordering
///
/// Each collection preserves insertion order; updates replace a document in place.
///
/// # Example
///
/// ```ignore
/// use docsource_memory::InMemoryStore;
/// use docsource::backend::{Namespace, StoreBackend};
/// use bson::{Uuid, Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let store = InMemoryStore::new();
///     let namespace = Namespace::new("todo", "items");
///
///     store
///         .insert_documents(&namespace, vec![(Uuid::new(), Bson::Document(doc! { "title": "Milk" }))])
///         .await?;
///
///     assert_eq!(store.find_documents(&namespace).await?.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// namespace -> ordered (id, document) pairs
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Lists every namespace that currently holds a collection.
    pub async fn namespaces(&self) -> Vec<Namespace> {
        self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn find_documents(&self, namespace: &Namespace) -> BackendResult<Vec<Bson>> {
        Ok(
            self.store
                .read()
                .await
                .get(namespace)
                .map(|entries| entries.iter().map(|(_, doc)| doc.clone()).collect())
                .unwrap_or_default()
        )
    }

    async fn insert_documents(&self, namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
        let mut store = self.store.write().await;
        let existing = store.get(namespace);

        // Reject the whole batch before the collection is created or touched
        for (index, (id, _)) in documents.iter().enumerate() {
            let duplicate = existing.is_some_and(|entries| entries.iter().any(|(stored, _)| stored == id))
                || documents[..index].iter().any(|(earlier, _)| earlier == id);

            if duplicate {
                return Err(Box::new(InMemoryStoreError::DocumentAlreadyExists {
                    id: *id,
                    namespace: namespace.clone(),
                }));
            }
        }

        tracing::trace!(%namespace, count = documents.len(), "inserting documents in memory");
        store
            .entry(namespace.clone())
            .or_default()
            .extend(documents);

        Ok(())
    }

    async fn update_documents(&self, namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
        let mut store = self.store.write().await;
        let entries = match store.get_mut(namespace) {
            Some(entries) => entries,
            None => return Err(Box::new(InMemoryStoreError::CollectionNotFound(namespace.clone()))),
        };

        let positions = documents
            .iter()
            .map(|(id, _)| {
                entries
                    .iter()
                    .position(|(existing, _)| existing == id)
                    .ok_or_else(|| InMemoryStoreError::DocumentNotFound {
                        id: *id,
                        namespace: namespace.clone(),
                    })
            })
            .collect::<Result<Vec<usize>, _>>()?;

        for (position, (_, doc)) in positions.into_iter().zip(documents) {
            entries[position].1 = doc;
        }

        Ok(())
    }

    async fn delete_documents(&self, namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()> {
        let mut store = self.store.write().await;
        let entries = match store.get_mut(namespace) {
            Some(entries) => entries,
            None => return Err(Box::new(InMemoryStoreError::CollectionNotFound(namespace.clone()))),
        };

        if let Some(missing) = ids.iter().find(|id| !entries.iter().any(|(existing, _)| existing == *id)) {
            return Err(Box::new(InMemoryStoreError::DocumentNotFound {
                id: *missing,
                namespace: namespace.clone(),
            }));
        }

        entries.retain(|(existing, _)| !ids.contains(existing));

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;
    type Error = std::convert::Infallible;

    /// Always succeeds with a freshly initialized store.
    async fn build(self) -> Result<Self::Backend, Self::Error> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    fn todo() -> Namespace {
        Namespace::new("todo", "items")
    }

    fn document(title: &str) -> Bson {
        Bson::Document(doc! { "title": title })
    }

    fn store_error(error: docsource_core::error::BackendError) -> InMemoryStoreError {
        *error.downcast::<InMemoryStoreError>().unwrap()
    }

    #[tokio::test]
    async fn missing_collection_reads_empty() {
        let store = InMemoryStore::new();

        assert_eq!(store.find_documents(&todo()).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn find_returns_insertion_order() {
        let store = InMemoryStore::new();
        let docs = vec![
            (Uuid::new(), document("first")),
            (Uuid::new(), document("second")),
            (Uuid::new(), document("third")),
        ];

        store.insert_documents(&todo(), docs[..1].to_vec()).await.unwrap();
        store.insert_documents(&todo(), docs[1..].to_vec()).await.unwrap();

        let found = store.find_documents(&todo()).await.unwrap();
        assert_eq!(found, docs.into_iter().map(|(_, doc)| doc).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = InMemoryStore::new();
        let other = Namespace::new("todo", "archive");

        store.insert_documents(&todo(), vec![(Uuid::new(), document("a"))]).await.unwrap();

        assert!(store.find_documents(&other).await.unwrap().is_empty());
        assert_eq!(store.namespaces().await, vec![todo()]);
    }

    #[tokio::test]
    async fn duplicate_insert_rejects_whole_batch() {
        let store = InMemoryStore::new();
        let id = Uuid::new();
        store.insert_documents(&todo(), vec![(id, document("a"))]).await.unwrap();

        let error = store
            .insert_documents(&todo(), vec![(Uuid::new(), document("b")), (id, document("c"))])
            .await
            .unwrap_err();

        assert_eq!(store_error(error), InMemoryStoreError::DocumentAlreadyExists { id, namespace: todo() });
        assert_eq!(store.find_documents(&todo()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_first_insert_creates_no_collection() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        let error = store
            .insert_documents(&todo(), vec![(id, document("a")), (id, document("b"))])
            .await
            .unwrap_err();

        assert_eq!(store_error(error), InMemoryStoreError::DocumentAlreadyExists { id, namespace: todo() });
        assert_eq!(store.namespaces().await, vec![]);

        let error = store.update_documents(&todo(), vec![(id, document("c"))]).await.unwrap_err();
        assert_eq!(store_error(error), InMemoryStoreError::CollectionNotFound(todo()));
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let store = InMemoryStore::new();
        let (first, second) = (Uuid::new(), Uuid::new());
        store
            .insert_documents(&todo(), vec![(first, document("a")), (second, document("b"))])
            .await
            .unwrap();

        store.update_documents(&todo(), vec![(first, document("a2"))]).await.unwrap();

        assert_eq!(
            store.find_documents(&todo()).await.unwrap(),
            vec![document("a2"), document("b")],
        );
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_targets() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        let error = store.update_documents(&todo(), vec![(id, document("x"))]).await.unwrap_err();
        assert_eq!(store_error(error), InMemoryStoreError::CollectionNotFound(todo()));

        store.insert_documents(&todo(), vec![(Uuid::new(), document("y"))]).await.unwrap();

        let error = store.delete_documents(&todo(), vec![id]).await.unwrap_err();
        assert_eq!(store_error(error), InMemoryStoreError::DocumentNotFound { id, namespace: todo() });
    }

    #[tokio::test]
    async fn delete_removes_only_named_ids() {
        let store = InMemoryStore::new();
        let (keep, drop) = (Uuid::new(), Uuid::new());
        store
            .insert_documents(&todo(), vec![(keep, document("keep")), (drop, document("drop"))])
            .await
            .unwrap();

        store.delete_documents(&todo(), vec![drop]).await.unwrap();

        assert_eq!(store.find_documents(&todo()).await.unwrap(), vec![document("keep")]);
    }

    #[tokio::test]
    async fn partially_unknown_batches_change_nothing() {
        let store = InMemoryStore::new();
        let (known, unknown) = (Uuid::new(), Uuid::new());
        store.insert_documents(&todo(), vec![(known, document("a"))]).await.unwrap();

        let error = store
            .update_documents(&todo(), vec![(known, document("a2")), (unknown, document("b"))])
            .await
            .unwrap_err();
        assert_eq!(store_error(error), InMemoryStoreError::DocumentNotFound { id: unknown, namespace: todo() });

        let error = store.delete_documents(&todo(), vec![known, unknown]).await.unwrap_err();
        assert_eq!(store_error(error), InMemoryStoreError::DocumentNotFound { id: unknown, namespace: todo() });

        assert_eq!(store.find_documents(&todo()).await.unwrap(), vec![document("a")]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::builder().build().await.unwrap();
        let clone = store.clone();

        clone.insert_documents(&todo(), vec![(Uuid::new(), document("shared"))]).await.unwrap();

        assert_eq!(store.find_documents(&todo()).await.unwrap().len(), 1);
    }
}
