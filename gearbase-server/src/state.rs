//! Shared handler state.

use gearbase::{
    collection::Collection,
    error::StoreResult,
    memory::InMemoryStore,
    mongodb::MongoDbStore,
    store::DocumentStore,
};

use crate::config::{COLLECTION_NAME, DATABASE_NAME, StoreSettings};

/// State handed to every axum handler.
///
/// Cloning is cheap: the store and collection handles share one backend.
#[derive(Debug, Clone)]
pub struct AppState {
    store: DocumentStore,
    equipments: Collection,
}

impl AppState {
    /// Wraps an open store, addressing the equipment collection by `collection`.
    pub fn new(store: DocumentStore, collection: &str) -> Self {
        Self {
            equipments: store.collection(collection),
            store,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn equipments(&self) -> &Collection {
        &self.equipments
    }
}

impl From<DocumentStore> for AppState {
    fn from(store: DocumentStore) -> Self {
        Self::new(store, COLLECTION_NAME)
    }
}

/// Creates the configured backend. MongoDB clients connect lazily, so this
/// does not prove the server is reachable; follow it with a ping.
pub async fn open_store(settings: &StoreSettings) -> StoreResult<DocumentStore> {
    match settings {
        StoreSettings::MongoDb(credentials) => {
            DocumentStore::connect(MongoDbStore::builder(
                &credentials.connection_string(),
                DATABASE_NAME,
            ))
            .await
        }
        StoreSettings::Memory => DocumentStore::connect(InMemoryStore::builder()).await,
    }
}
