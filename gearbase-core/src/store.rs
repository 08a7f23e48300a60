//! Main document store handle.
//!
//! [`DocumentStore`] owns the backend connection for the lifetime of the
//! process. It is cheap to clone (an `Arc` internally), so one instance is
//! created at startup and shared with every request handler.
//!
//! # Example
//!
//! ```ignore
//! use gearbase_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(my_backend);
//! let equipments = store.collection("equipments");
//! let id = equipments.insert(fields).await?;
//! store.shutdown().await?;
//! ```

use std::sync::Arc;

use crate::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    error::StoreResult,
};

#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Arc<dyn StoreBackend>,
}

impl DocumentStore {
    /// Creates a new document store with the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Builds the backend and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns whatever error the builder reports, typically
    /// [`StoreError::Initialization`](crate::error::StoreError::Initialization).
    pub async fn connect<B>(builder: B) -> StoreResult<Self>
    where
        B: StoreBackendBuilder,
        B::Backend: 'static,
    {
        Ok(Self::new(builder.build().await?))
    }

    /// Gets a handle to the collection with the given name.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(name.to_string(), Arc::clone(&self.backend))
    }

    /// Checks that the backend is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// Collections obtained from this store must not be used afterwards.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown().await
    }
}
