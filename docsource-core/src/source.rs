//! Data sources: typed, failure-normalizing access to one entity's collection.
//!
//! A data source is bound at construction to a backend handle and a [`Namespace`].
//! Each operation runs against the backend and returns a [`DataResult`]; any fault
//! raised by the backend, or while converting documents, comes back as the
//! [`DatabaseFailure`](crate::error::DatabaseFailure) kind that operation declares.
//!
//! | operation | failure kind |
//! |---|---|
//! | [`DataSource::get_all`] | `Retrieve` |
//! | [`DataSource::create`] | `Create` |
//! | [`DataSource::update`] | `Update` |
//! | [`DataSource::delete`] | `Delete` |

use async_trait::async_trait;
use bson::Uuid;
use std::marker::PhantomData;

use crate::{
    backend::{Namespace, StoreBackend},
    error::{DataResult, FailureContext, FailureKind},
    normalize::IntoFailure,
    record::{Record, RecordExt},
};

/// Operations every entity data source exposes.
///
/// No method lets a backend error escape; callers branch on the returned `Result`.
#[async_trait]
pub trait DataSource<R: Record>: Send + Sync {
    /// Returns every record in the collection, in the order the backend produced them.
    async fn get_all(&self) -> DataResult<Vec<R>>;

    /// Inserts new records. An empty batch succeeds without touching the backend.
    async fn create(&self, records: Vec<R>) -> DataResult<()>;

    /// Replaces existing records, matched by id. An empty batch is a no-op.
    async fn update(&self, records: Vec<R>) -> DataResult<()>;

    /// Removes records by id. An empty batch is a no-op.
    async fn delete(&self, ids: Vec<Uuid>) -> DataResult<()>;
}

/// A [`DataSource`] for records of type `R` stored in a single collection.
///
/// The backend is supplied by the caller, who also owns its connection lifecycle.
/// The namespace is fixed for the lifetime of the instance. Holding no per-call
/// state, one instance can serve concurrent callers.
///
/// # Example
///
/// ```ignore
/// let notes = CollectionDataSource::<_, Note>::new(backend, "journal", "notes");
///
/// match notes.get_all().await {
///     Ok(records) => println!("{} notes", records.len()),
///     Err(failure) => eprintln!("{failure}"),
/// }
/// ```
#[derive(Debug)]
pub struct CollectionDataSource<B: StoreBackend, R: Record> {
    backend: B,
    namespace: Namespace,
    _record: PhantomData<fn() -> R>,
}

impl<B: StoreBackend, R: Record> CollectionDataSource<B, R> {
    /// Binds a data source to `backend` and the `database`/`collection` pair.
    pub fn new(backend: B, database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: Namespace::new(database, collection),
            _record: PhantomData,
        }
    }

    /// The database and collection this source is bound to.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The backend handle supplied at construction.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gives the backend back, e.g. to shut it down.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn context(operation: &'static str) -> FailureContext {
        FailureContext::new(operation, R::entity_name())
    }

    fn encode(records: &[R]) -> Result<Vec<(Uuid, bson::Bson)>, bson::error::Error> {
        records
            .iter()
            .map(|record| record.to_bson().map(|bson| (*record.id(), bson)))
            .collect()
    }
}

#[async_trait]
impl<B: StoreBackend, R: Record> DataSource<R> for CollectionDataSource<B, R> {
    async fn get_all(&self) -> DataResult<Vec<R>> {
        let context = Self::context("get_all");

        let documents = self
            .backend
            .find_documents(&self.namespace)
            .await
            .or_failure(FailureKind::Retrieve, context)?;

        let records = documents
            .into_iter()
            .map(R::from_bson)
            .collect::<Result<Vec<R>, _>>()
            .or_failure(FailureKind::Retrieve, context)?;

        tracing::debug!(
            database = self.namespace.database(),
            collection = self.namespace.collection(),
            count = records.len(),
            "retrieved records",
        );

        Ok(records)
    }

    async fn create(&self, records: Vec<R>) -> DataResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let context = Self::context("create");
        let documents = Self::encode(&records).or_failure(FailureKind::Create, context)?;
        let count = documents.len();

        self.backend
            .insert_documents(&self.namespace, documents)
            .await
            .or_failure(FailureKind::Create, context)?;

        tracing::debug!(namespace = %self.namespace, count, "created records");

        Ok(())
    }

    async fn update(&self, records: Vec<R>) -> DataResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let context = Self::context("update");
        let documents = Self::encode(&records).or_failure(FailureKind::Update, context)?;
        let count = documents.len();

        self.backend
            .update_documents(&self.namespace, documents)
            .await
            .or_failure(FailureKind::Update, context)?;

        tracing::debug!(namespace = %self.namespace, count, "updated records");

        Ok(())
    }

    async fn delete(&self, ids: Vec<Uuid>) -> DataResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let count = ids.len();

        self.backend
            .delete_documents(&self.namespace, ids)
            .await
            .or_failure(FailureKind::Delete, Self::context("delete"))?;

        tracing::debug!(namespace = %self.namespace, count, "deleted records");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendResult, DatabaseFailure};
    use bson::{Bson, doc};
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> &Uuid {
            &self.id
        }

        fn entity_name() -> &'static str {
            "note"
        }
    }

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct Unavailable(&'static str);

    /// Serves fixed documents and records every write it receives.
    #[derive(Debug, Default)]
    struct FixedBackend {
        documents: Vec<Bson>,
        fail_with: Option<&'static str>,
        writes: Mutex<Vec<(&'static str, usize)>>,
    }

    impl FixedBackend {
        fn serving(documents: Vec<Bson>) -> Self {
            Self { documents, ..Default::default() }
        }

        fn failing(message: &'static str) -> Self {
            Self { fail_with: Some(message), ..Default::default() }
        }

        fn outcome(&self, op: &'static str, count: usize) -> BackendResult<()> {
            if let Some(message) = self.fail_with {
                return Err(Box::new(Unavailable(message)));
            }
            self.writes.lock().unwrap().push((op, count));
            Ok(())
        }
    }

    #[async_trait]
    impl StoreBackend for FixedBackend {
        async fn find_documents(&self, _namespace: &Namespace) -> BackendResult<Vec<Bson>> {
            match self.fail_with {
                Some(message) => Err(Box::new(Unavailable(message))),
                None => Ok(self.documents.clone()),
            }
        }

        async fn insert_documents(&self, _namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
            self.outcome("insert", documents.len())
        }

        async fn update_documents(&self, _namespace: &Namespace, documents: Vec<(Uuid, Bson)>) -> BackendResult<()> {
            self.outcome("update", documents.len())
        }

        async fn delete_documents(&self, _namespace: &Namespace, ids: Vec<Uuid>) -> BackendResult<()> {
            self.outcome("delete", ids.len())
        }
    }

    fn note(body: &str) -> Note {
        Note { id: Uuid::new(), body: body.into() }
    }

    fn source(backend: FixedBackend) -> CollectionDataSource<FixedBackend, Note> {
        CollectionDataSource::new(backend, "journal", "notes")
    }

    #[tokio::test]
    async fn get_all_preserves_backend_order() {
        let notes = vec![note("c"), note("a"), note("b")];
        let documents = notes.iter().map(|n| n.to_bson().unwrap()).collect();

        let records = source(FixedBackend::serving(documents)).get_all().await.unwrap();

        assert_eq!(records, notes);
    }

    #[tokio::test]
    async fn get_all_normalizes_backend_fault() {
        let failure = source(FixedBackend::failing("socket closed"))
            .get_all()
            .await
            .unwrap_err();

        assert!(matches!(failure, DatabaseFailure::Retrieve { .. }));
        assert_eq!(failure.context(), &FailureContext::new("get_all", "note"));
        assert_eq!(failure.fault_as::<Unavailable>().map(|u| u.0), Some("socket closed"));
    }

    #[tokio::test]
    async fn get_all_normalizes_undecodable_document() {
        let backend = FixedBackend::serving(vec![Bson::Document(doc! { "body": true })]);

        let failure = source(backend).get_all().await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Retrieve);
        assert!(failure.fault_as::<bson::error::Error>().is_some());
    }

    #[tokio::test]
    async fn writes_declare_their_own_kind() {
        let notes = source(FixedBackend::failing("read only"));

        let create = notes.create(vec![note("x")]).await.unwrap_err();
        let update = notes.update(vec![note("y")]).await.unwrap_err();
        let delete = notes.delete(vec![Uuid::new()]).await.unwrap_err();

        assert_eq!(create.kind(), FailureKind::Create);
        assert_eq!(update.kind(), FailureKind::Update);
        assert_eq!(delete.kind(), FailureKind::Delete);
        assert_eq!(delete.context().operation(), "delete");
    }

    #[tokio::test]
    async fn empty_batches_skip_the_backend() {
        let notes = source(FixedBackend::failing("should not be called"));

        assert_eq!(notes.create(vec![]).await, Ok(()));
        assert_eq!(notes.update(vec![]).await, Ok(()));
        assert_eq!(notes.delete(vec![]).await, Ok(()));
    }

    #[tokio::test]
    async fn writes_forward_every_record() {
        let notes = source(FixedBackend::default());

        notes.create(vec![note("a"), note("b")]).await.unwrap();
        notes.update(vec![note("c")]).await.unwrap();
        notes.delete(vec![Uuid::new(), Uuid::new(), Uuid::new()]).await.unwrap();

        assert_eq!(
            *notes.backend().writes.lock().unwrap(),
            vec![("insert", 2), ("update", 1), ("delete", 3)],
        );
    }
}
