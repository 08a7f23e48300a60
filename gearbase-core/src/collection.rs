//! Collection handle: the five record operations the HTTP layer exposes.
//!
//! A [`Collection`] turns caller input (identity strings, JSON field maps)
//! into backend calls and backend results into [`Record`]s and typed errors:
//!
//! - a malformed identity string fails with [`StoreError::InvalidIdentity`]
//!   before the backend is contacted
//! - an identity that matches nothing fails with [`StoreError::NotFound`]
//! - anything the backend reports is passed through unchanged
//!
//! # Example
//!
//! ```ignore
//! let equipments = store.collection("equipments");
//! let id = equipments.insert(fields).await?;
//! let record = equipments.get(&id.to_hex()).await?;
//! ```

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    backend::{StoreBackend, UpdateOutcome},
    document::{DocumentId, Record, fields_to_document},
    error::{StoreError, StoreResult},
    query::Expr,
};

#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    backend: Arc<dyn StoreBackend>,
}

impl Collection {
    pub(crate) fn new(name: String, backend: Arc<dyn StoreBackend>) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a new document and returns its freshly assigned identity.
    ///
    /// A caller-supplied `_id` is ignored.
    pub async fn insert(&self, fields: Map<String, Value>) -> StoreResult<DocumentId> {
        let id = DocumentId::new();

        self.backend
            .insert_document(&self.name, id, fields_to_document(fields))
            .await?;

        Ok(id)
    }

    /// Returns every document matching `filter`, or all documents when `None`.
    pub async fn find(&self, filter: Option<Expr>) -> StoreResult<Vec<Record>> {
        self.backend
            .find_documents(&self.name, filter)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    /// Returns the document with the given identity.
    pub async fn get(&self, id: &str) -> StoreResult<Record> {
        let id = DocumentId::parse(id)?;

        match self.backend.find_document(&self.name, id).await? {
            Some(document) => Record::from_document(document),
            None => Err(self.not_found(id)),
        }
    }

    /// Overwrites the given fields of one document; other fields keep their
    /// values. A `_id` entry in `fields` is ignored.
    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> StoreResult<UpdateOutcome> {
        let id = DocumentId::parse(id)?;

        let outcome = self
            .backend
            .update_document(&self.name, id, fields_to_document(fields))
            .await?;

        if outcome.matched == 0 {
            return Err(self.not_found(id));
        }

        Ok(outcome)
    }

    /// Removes the document with the given identity.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = DocumentId::parse(id)?;

        if self.backend.delete_document(&self.name, id).await? == 0 {
            return Err(self.not_found(id));
        }

        Ok(())
    }

    fn not_found(&self, id: DocumentId) -> StoreError {
        StoreError::NotFound(id.to_hex(), self.name.clone())
    }
}
