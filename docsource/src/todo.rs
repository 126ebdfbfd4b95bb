//! Todo items and their data source.
//!
//! Items live in the `items` collection of the `todo` database.

use async_trait::async_trait;
use bson::Uuid;
use serde::{Deserialize, Serialize};

use docsource_core::{
    backend::{Namespace, StoreBackend},
    error::DataResult,
    record::Record,
    source::{CollectionDataSource, DataSource},
};

/// A single entry on a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub done: bool,
    pub title: String,
}

impl TodoItem {
    /// Creates an open item with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new(),
            done: false,
            title: title.into(),
        }
    }
}

impl Record for TodoItem {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn entity_name() -> &'static str {
        "todo item"
    }
}

/// Data source for [`TodoItem`] records.
///
/// # Example
///
/// ```ignore
/// use docsource::{memory::InMemoryStore, prelude::*, todo::TodoItemDataSource};
///
/// let items = TodoItemDataSource::new(InMemoryStore::new());
///
/// match items.get_all().await {
///     Ok(items) => println!("{} items", items.len()),
///     Err(failure) => eprintln!("could not load items: {failure}"),
/// }
/// ```
#[derive(Debug)]
pub struct TodoItemDataSource<B: StoreBackend> {
    inner: CollectionDataSource<B, TodoItem>,
}

impl<B: StoreBackend> TodoItemDataSource<B> {
    pub const DATABASE: &'static str = "todo";
    pub const COLLECTION: &'static str = "items";

    pub fn new(backend: B) -> Self {
        Self {
            inner: CollectionDataSource::new(backend, Self::DATABASE, Self::COLLECTION),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        self.inner.namespace()
    }

    pub fn backend(&self) -> &B {
        self.inner.backend()
    }
}

#[async_trait]
impl<B: StoreBackend> DataSource<TodoItem> for TodoItemDataSource<B> {
    async fn get_all(&self) -> DataResult<Vec<TodoItem>> {
        self.inner.get_all().await
    }

    async fn create(&self, records: Vec<TodoItem>) -> DataResult<()> {
        self.inner.create(records).await
    }

    async fn update(&self, records: Vec<TodoItem>) -> DataResult<()> {
        self.inner.update(records).await
    }

    async fn delete(&self, ids: Vec<Uuid>) -> DataResult<()> {
        self.inner.delete(ids).await
    }
}
