//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait provides a unified async interface for the
//! single-document operations the service needs: insert, find, update,
//! delete, plus a connectivity check and shutdown. Implementations must be
//! thread-safe; one instance is shared by every in-flight request.
//!
//! # Examples
//!
//! ```ignore
//! use gearbase_core::{backend::StoreBackend, document::DocumentId};
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! let id = DocumentId::new();
//! backend.insert_document("equipments", id, doc! { "name": "Ball" }).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::fmt::Debug;

use crate::{document::DocumentId, error::StoreResult, query::Expr};

/// Result of an update: how many documents matched the identity and how many
/// actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Abstract interface for document storage backends.
///
/// Documents are passed as BSON [`Document`]s without the `_id` field; the
/// identity always travels separately as a [`DocumentId`]. Every method is a
/// single round trip to the underlying store.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentAlreadyExists`](crate::error::StoreError::DocumentAlreadyExists)
    /// if the identity is taken, or a backend error if the write fails.
    async fn insert_document(
        &self,
        collection: &str,
        id: DocumentId,
        document: Document,
    ) -> StoreResult<()>;

    /// Returns every document matching `filter` (all documents when `None`),
    /// in the backend's natural order. Returned documents include `_id`.
    async fn find_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
    ) -> StoreResult<Vec<Document>>;

    /// Returns the document with the given identity, including `_id`.
    async fn find_document(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<Document>>;

    /// Overwrites the named fields of one document, leaving other fields untouched.
    async fn update_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> StoreResult<UpdateOutcome>;

    /// Removes one document and returns the number of documents deleted.
    async fn delete_document(&self, collection: &str, id: DocumentId) -> StoreResult<u64>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases backend resources. Called once, after the last request.
    async fn shutdown(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
///
/// Builders carry connection settings and perform any asynchronous setup
/// (such as parsing a connection string) in [`build`](Self::build).
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
