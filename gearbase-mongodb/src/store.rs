//! MongoDB implementation of [`StoreBackend`].
//!
//! Each collection name maps to a collection in one database. Documents are
//! written with their keys escaped by [`KeySanitizer`] and restored on read;
//! identities are stored as native ObjectIds in `_id`.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use gearbase_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    document::{DocumentId, ID_FIELD},
    error::{StoreError, StoreResult},
    query::{Expr, QueryVisitor},
};

use crate::{query::MongoQueryTranslator, sanitizer::KeySanitizer};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeySanitizer::sanitize_key(collection_name))
    }

    fn by_id(id: DocumentId) -> Document {
        doc! { ID_FIELD: id }
    }
}

fn backend_error(err: MongoError) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn is_duplicate_key(kind: &ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(
        &self,
        collection: &str,
        id: DocumentId,
        document: Document,
    ) -> StoreResult<()> {
        let mut stored = Self::by_id(id);
        for (key, value) in KeySanitizer::sanitize_document(document) {
            stored.insert(key, value);
        }

        match self.get_collection(collection).insert_one(stored).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err.kind) => Err(StoreError::DocumentAlreadyExists(
                id.to_hex(),
                collection.to_string(),
            )),
            Err(err) => Err(backend_error(err)),
        }
    }

    async fn find_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
    ) -> StoreResult<Vec<Document>> {
        let filter = match &filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
            None => doc! {},
        };

        let documents: Vec<Document> = self
            .get_collection(collection)
            .find(filter)
            .await
            .map_err(backend_error)?
            .try_collect()
            .await
            .map_err(backend_error)?;

        Ok(documents
            .into_iter()
            .map(KeySanitizer::restore_document)
            .collect())
    }

    async fn find_document(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        let document = self
            .get_collection(collection)
            .find_one(Self::by_id(id))
            .await
            .map_err(backend_error)?;

        Ok(document.map(KeySanitizer::restore_document))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        // An empty $set is rejected by older servers; nothing to write, so only
        // report whether the document exists.
        if fields.is_empty() {
            let exists = self.find_document(collection, id).await?.is_some();

            return Ok(UpdateOutcome {
                matched: exists as u64,
                modified: 0,
            });
        }

        let result = self
            .get_collection(collection)
            .update_one(
                Self::by_id(id),
                doc! { "$set": KeySanitizer::sanitize_document(fields) },
            )
            .await
            .map_err(backend_error)?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_document(&self, collection: &str, id: DocumentId) -> StoreResult<u64> {
        let result = self
            .get_collection(collection)
            .delete_one(Self::by_id(id))
            .await
            .map_err(backend_error)?;

        Ok(result.deleted_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(&self) -> StoreResult<()> {
        tracing::debug!(database = %self.database, "closing MongoDB client");
        self.client.clone().shutdown().await;

        Ok(())
    }
}

/// Connection settings for [`MongoDbStore`].
///
/// The client is configured for the Stable API v1 in strict mode with
/// deprecation errors enabled.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| StoreError::Initialization(e.to_string()))?;

        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        tracing::debug!(database = %self.database, "creating MongoDB client");

        let client =
            Client::with_options(options).map_err(|e| StoreError::Initialization(e.to_string()))?;

        Ok(MongoDbStore::new(client, self.database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::error::WriteError;

    fn write_error(code: i32) -> ErrorKind {
        let error: WriteError = serde_json::from_value(serde_json::json!({
            "code": code,
            "errmsg": "E11000 duplicate key error collection: sportsEquipmentDB.equipments",
        }))
        .unwrap();

        ErrorKind::Write(WriteFailure::WriteError(error))
    }

    #[tokio::test]
    async fn malformed_connection_string_fails_initialization() {
        let result = MongoDbStore::builder("http://localhost:27017", "sportsEquipmentDB")
            .build()
            .await;

        assert!(matches!(result, Err(StoreError::Initialization(_))));
    }

    #[tokio::test]
    async fn builder_does_not_connect_eagerly() {
        let result = MongoDbStore::builder("mongodb://127.0.0.1:27017", "sportsEquipmentDB")
            .build()
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn identity_filter_targets_object_id() {
        let id = DocumentId::new();
        assert_eq!(
            MongoDbStore::by_id(id).get_object_id("_id").unwrap(),
            id.object_id()
        );
    }

    #[test]
    fn duplicate_key_write_is_recognized() {
        assert!(is_duplicate_key(&write_error(DUPLICATE_KEY)));
        assert!(!is_duplicate_key(&write_error(121)));
    }
}
