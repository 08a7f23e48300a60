//! Records with awkward keys read back unchanged, both from a store that keeps
//! keys raw and from one that stores them the way [`MongoDbStore`] does.
//!
//! [`MongoDbStore`]: crate::MongoDbStore

use async_trait::async_trait;
use bson::Document;
use gearbase_core::{
    backend::{StoreBackend, UpdateOutcome},
    document::DocumentId,
    error::StoreResult,
    query::{Expr, Filter},
    store::DocumentStore,
};
use gearbase_memory::InMemoryStore;
use serde_json::{Map, Value, json};

use crate::sanitizer::KeySanitizer;

/// In-memory backend holding documents with escaped keys, applying the same
/// write, read and filter translation as the MongoDB backend.
#[derive(Debug, Default)]
struct EscapedKeys {
    inner: InMemoryStore,
}

#[async_trait]
impl StoreBackend for EscapedKeys {
    async fn insert_document(
        &self,
        collection: &str,
        id: DocumentId,
        document: Document,
    ) -> StoreResult<()> {
        self.inner
            .insert_document(collection, id, KeySanitizer::sanitize_document(document))
            .await
    }

    async fn find_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
    ) -> StoreResult<Vec<Document>> {
        let filter = filter.map(|expr| match expr {
            Expr::Eq { field, value } => Filter::eq(KeySanitizer::sanitize_key(&field), value),
        });

        let documents = self.inner.find_documents(collection, filter).await?;
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
        let document = self.inner.find_document(collection, id).await?;
        Ok(document.map(KeySanitizer::restore_document))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.inner
            .update_document(collection, id, KeySanitizer::sanitize_document(fields))
            .await
    }

    async fn delete_document(&self, collection: &str, id: DocumentId) -> StoreResult<u64> {
        self.inner.delete_document(collection, id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

async fn assert_awkward_keys_round_trip(store: DocumentStore) {
    let equipments = store.collection("equipments");
    let body = json!({
        "a.b": 1,
        "a__dot__b": 2,
        "a%2Eb": 3,
        "$x": "dollar",
        "k__dot__": "marker",
        "size__dot__cm": 30,
        "discount%": 5,
        "specs": { "grip.size": 2, "$color": ["red", { "x.y": true }] },
        "owner.email": "a@x.com",
    });

    let id = equipments.insert(object(body.clone())).await.unwrap();
    let other = equipments
        .insert(object(json!({ "owner.email": "b@x.com" })))
        .await
        .unwrap();

    let mut expected = object(body);
    expected.insert("_id".to_string(), json!(id.to_hex()));
    let record = equipments.get(&id.to_hex()).await.unwrap();
    assert_eq!(record.into_json(), Value::Object(expected.clone()));

    let owned = equipments
        .find(Some(Filter::eq("owner.email", "a@x.com")))
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id(), &id);

    let outcome = equipments
        .update(&id.to_hex(), object(json!({ "a.b": 10, "$new": "field" })))
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

    expected.insert("a.b".to_string(), json!(10));
    expected.insert("$new".to_string(), json!("field"));
    let record = equipments.get(&id.to_hex()).await.unwrap();
    assert_eq!(record.into_json(), Value::Object(expected));

    let untouched = equipments.get(&other.to_hex()).await.unwrap();
    assert_eq!(untouched.get("owner.email"), Some(&json!("b@x.com")));
}

#[tokio::test]
async fn raw_keys_round_trip() {
    assert_awkward_keys_round_trip(DocumentStore::new(InMemoryStore::new())).await;
}

#[tokio::test]
async fn escaped_keys_round_trip() {
    assert_awkward_keys_round_trip(DocumentStore::new(EscapedKeys::default())).await;
}

#[tokio::test]
async fn escaped_keys_are_what_gets_stored() {
    let backend = EscapedKeys::default();
    let id = DocumentId::new();

    backend
        .insert_document("equipments", id, bson::doc! { "a.b": 1, "$x": 2 })
        .await
        .unwrap();

    let stored = backend.inner.find_document("equipments", id).await.unwrap().unwrap();
    assert_eq!(stored, bson::doc! { "_id": id.object_id(), "a%2Eb": 1, "%24x": 2 });
}
