//! Errors raised by the MongoDB backend and its setup.

use bson::Uuid;
use thiserror::Error;

use docsource_core::backend::Namespace;

#[derive(Debug, Error)]
pub enum MongoDbStoreError {
    /// Configuration could not be extracted from its sources.
    #[error("Configuration error: {0}")]
    Config(#[source] Box<figment::Error>),

    /// Connection options could not be parsed or the client could not be created.
    #[error("Initialization error: {0}")]
    Initialization(#[from] mongodb::error::Error),

    /// A record serialized to something other than a BSON document.
    #[error("Document {0} is not a BSON document")]
    InvalidDocument(Uuid),

    /// An insert named an id that is already stored or repeated in the batch.
    #[error("Document {id} already exists in {namespace}")]
    DocumentAlreadyExists { id: Uuid, namespace: Namespace },

    /// An update or delete named an id that is not stored.
    #[error("Document {id} not found in {namespace}")]
    DocumentNotFound { id: Uuid, namespace: Namespace },
}

impl From<figment::Error> for MongoDbStoreError {
    fn from(err: figment::Error) -> Self {
        MongoDbStoreError::Config(Box::new(err))
    }
}
