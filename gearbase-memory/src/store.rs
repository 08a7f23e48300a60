//! In-memory storage implementation for document stores.
//!
//! Documents live in per-collection ordered maps keyed by [`DocumentId`],
//! behind an async-aware read-write lock. ObjectIds grow with creation time,
//! so listing returns documents in insertion order.

use async_trait::async_trait;
use bson::{Bson, Document};
use mea::rwlock::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use gearbase_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    document::{DocumentId, ID_FIELD},
    error::{StoreError, StoreResult},
    query::Expr,
};

use crate::evaluator::DocumentEvaluator;

type CollectionMap = BTreeMap<DocumentId, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same data. Queries scan the whole collection.
///
/// # Example
///
/// ```ignore
/// use gearbase_memory::InMemoryStore;
/// use gearbase_core::{backend::StoreBackend, document::DocumentId};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = DocumentId::new();
/// store.insert_document("equipments", id, doc! { "name": "Ball" }).await?;
/// assert!(store.find_document("equipments", id).await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document without `_id`)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn with_id(id: &DocumentId, document: &Document) -> Document {
        let mut stored = Document::new();
        stored.insert(ID_FIELD, Bson::from(*id));
        for (key, value) in document {
            stored.insert(key.clone(), value.clone());
        }
        stored
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(
        &self,
        collection: &str,
        id: DocumentId,
        document: Document,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store.entry(collection.to_string()).or_default();

        if collection_map.contains_key(&id) {
            return Err(StoreError::DocumentAlreadyExists(id.to_hex(), collection.to_string()));
        }

        collection_map.insert(id, document);

        Ok(())
    }

    async fn find_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
    ) -> StoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        Ok(collection_map
            .iter()
            .filter(|(_, doc)| match &filter {
                Some(expr) => DocumentEvaluator::matches(doc, expr),
                None => true,
            })
            .map(|(id, doc)| Self::with_id(id, doc))
            .collect())
    }

    async fn find_document(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|col| col.get(&id))
            .map(|doc| Self::with_id(&id, doc)))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        let mut store = self.store.write().await;
        let document = match store
            .get_mut(collection)
            .and_then(|col| col.get_mut(&id))
        {
            Some(doc) => doc,
            None => return Ok(UpdateOutcome::default()),
        };

        // A document only counts as modified if some value actually changed
        let mut modified = false;
        for (key, value) in fields {
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: modified as u64,
        })
    }

    async fn delete_document(&self, collection: &str, id: DocumentId) -> StoreResult<u64> {
        let mut store = self.store.write().await;

        let removed = store
            .get_mut(collection)
            .and_then(|col| col.remove(&id));

        Ok(removed.map_or(0, |_| 1))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use gearbase_memory::InMemoryStore;
/// use gearbase_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await.unwrap();
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
