use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, Uuid, doc};
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};
use docsource_core::{
    backend::{Namespace, StoreBackend, StoreBackendBuilder},
    error::BackendResult,
};

use crate::{config::MongoDbConfig, error::MongoDbStoreError};


/// [`StoreBackend`] over the official MongoDB driver.
///
/// Each record is stored with `_id` set to its id. Driver errors are handed back
/// unchanged so data sources can keep them as the failure's fault.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
}

impl MongoDbStore {
    /// Wraps a client whose connection lifecycle the caller already manages.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn builder(config: MongoDbConfig) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(config)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn get_collection(&self, namespace: &Namespace) -> MongoCollection<Document> {
        self.client
            .database(namespace.database())
            .collection(namespace.collection())
    }

    /// Returns the `_id` of every document in `collection` whose id is in `ids`.
    async fn stored_ids(
        collection: &MongoCollection<Document>,
        ids: &[Uuid],
    ) -> Result<Vec<Bson>, mongodb::error::Error> {
        Ok(
            collection
                .find(doc! { "_id": { "$in": ids.to_vec() } })
                .projection(doc! { "_id": 1 })
                .await?
                .try_collect::<Vec<Document>>()
                .await?
                .into_iter()
                .filter_map(|mut document| document.remove("_id"))
                .collect()
        )
    }

    async fn shutdown(self) -> BackendResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// First id in `ids` that is already stored or repeats an earlier entry.
pub(crate) fn first_conflict(ids: &[Uuid], stored: &[Bson]) -> Option<Uuid> {
    ids.iter()
        .enumerate()
        .find(|(index, id)| stored.contains(&Bson::from(**id)) || ids[..*index].contains(*id))
        .map(|(_, id)| *id)
}

/// First id in `ids` with no stored counterpart.
pub(crate) fn first_missing(ids: &[Uuid], stored: &[Bson]) -> Option<Uuid> {
    ids.iter()
        .find(|id| !stored.contains(&Bson::from(**id)))
        .copied()
}

pub(crate) fn prepare_document(id: &Uuid, document: &Bson) -> Result<Document, MongoDbStoreError> {
    Ok(Document::from_iter(
        document
            .as_document()
            .cloned()
            .ok_or(MongoDbStoreError::InvalidDocument(*id))?
            .into_iter()
            .filter(|(k, _)| k != "_id")
            .chain(std::iter::once(("_id".to_string(), Bson::from(*id)))),
    ))
}

pub(crate) fn restore_document(document: Document) -> Bson {
    Bson::Document(
        document
            .into_iter()
            .filter(|(k, _)| k != "_id")
            .collect()
    )
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn find_documents(&self, namespace: &Namespace) -> BackendResult<Vec<Bson>> {
        Ok(
            self.get_collection(namespace)
                .find(doc! {})
                .await?
                .try_collect::<Vec<Document>>()
                .await?
                .into_iter()
                .map(restore_document)
                .collect()
        )
    }

    async fn insert_documents(&self, namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
        let collection = self.get_collection(namespace);
        let ids = documents.iter().map(|(id, _)| *id).collect::<Vec<_>>();

        if let Some(id) = first_conflict(&ids, &Self::stored_ids(&collection, &ids).await?) {
            return Err(Box::new(MongoDbStoreError::DocumentAlreadyExists {
                id,
                namespace: namespace.clone(),
            }));
        }

        collection
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| prepare_document(id, doc))
                    .collect::<Result<Vec<Document>, _>>()?,
            )
            .await?;

        Ok(())
    }

    async fn update_documents(&self, namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
        let collection = self.get_collection(namespace);
        let ids = documents.iter().map(|(id, _)| *id).collect::<Vec<_>>();

        if let Some(id) = first_missing(&ids, &Self::stored_ids(&collection, &ids).await?) {
            return Err(Box::new(MongoDbStoreError::DocumentNotFound {
                id,
                namespace: namespace.clone(),
            }));
        }

        let replacements = documents
            .iter()
            .map(|(id, doc)| prepare_document(id, doc).map(|document| (*id, document)))
            .collect::<Result<Vec<_>, _>>()?;

        for (id, document) in replacements {
            collection
                .replace_one(doc! { "_id": id }, document)
                .await?;
        }

        Ok(())
    }

    async fn delete_documents(&self, namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()> {
        let collection = self.get_collection(namespace);

        if let Some(id) = first_missing(&ids, &Self::stored_ids(&collection, &ids).await?) {
            return Err(Box::new(MongoDbStoreError::DocumentNotFound {
                id,
                namespace: namespace.clone(),
            }));
        }

        let result = collection
            .delete_many(doc! { "_id": { "$in": ids } })
            .await?;

        tracing::trace!(%namespace, deleted = result.deleted_count, "deleted documents from mongodb");

        Ok(())
    }

    async fn shutdown(self) -> BackendResult<()> {
        self.shutdown().await
    }
}

/// Builds a [`MongoDbStore`] from a [`MongoDbConfig`].
///
/// # Example
///
/// ```ignore
/// use docsource::{backend::StoreBackendBuilder, mongodb::{MongoDbConfig, MongoDbStore}};
///
/// let store = MongoDbStore::builder(MongoDbConfig::load()?)
///     .build()
///     .await?;
/// ```
pub struct MongoDbStoreBuilder {
    config: MongoDbConfig,
}

impl MongoDbStoreBuilder {
    pub fn new(config: MongoDbConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;
    type Error = MongoDbStoreError;

    async fn build(self) -> Result<Self::Backend, Self::Error> {
        let mut options = ClientOptions::parse(&self.config.uri).await?;

        options.app_name = Some(self.config.app_name.clone());
        options.connect_timeout = Some(self.config.connect_timeout());
        options.server_selection_timeout = Some(self.config.server_selection_timeout());

        tracing::debug!(app_name = %self.config.app_name, "creating mongodb client");

        Ok(MongoDbStore::new(Client::with_options(options)?))
    }
}
