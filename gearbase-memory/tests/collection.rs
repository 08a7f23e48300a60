//! Record operations through `DocumentStore` backed by the in-memory store.

use gearbase_core::{
    backend::StoreBackendBuilder,
    collection::Collection,
    error::StoreError,
    query::Filter,
    store::DocumentStore,
};
use gearbase_memory::InMemoryStore;
use serde_json::{Map, Value, json};

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("test fields must be a JSON object")
}

async fn equipments() -> Collection {
    let store = DocumentStore::connect(InMemoryStore::builder())
        .await
        .expect("in-memory store always builds");
    store.collection("equipments")
}

#[tokio::test]
async fn created_record_reads_back_with_identity() {
    let equipments = equipments().await;
    let body = json!({
        "name": "Tennis Racket",
        "userEmail": "a@x.com",
        "price": 89.5,
        "tags": ["outdoor", "racket"],
        "specs": { "weight": 300 },
    });

    let id = equipments.insert(fields(body.clone())).await.unwrap();
    let record = equipments.get(&id.to_hex()).await.unwrap();

    let mut expected = fields(body);
    expected.insert("_id".to_string(), json!(id.to_hex()));
    assert_eq!(record.into_json(), Value::Object(expected));
}

#[tokio::test]
async fn caller_supplied_identity_is_replaced() {
    let equipments = equipments().await;

    let id = equipments
        .insert(fields(json!({ "_id": "65a1f0c2e4b0a1b2c3d4e5f6", "name": "Ball" })))
        .await
        .unwrap();

    assert_ne!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
    assert_eq!(equipments.get(&id.to_hex()).await.unwrap().get("name"), Some(&json!("Ball")));
}

#[tokio::test]
async fn owner_filter_returns_exact_subset() {
    let equipments = equipments().await;
    for (name, owner) in [("Bat", "a@x.com"), ("Ball", "b@x.com"), ("Glove", "a@x.com")] {
        equipments
            .insert(fields(json!({ "name": name, "userEmail": owner })))
            .await
            .unwrap();
    }
    equipments.insert(fields(json!({ "name": "Orphan" }))).await.unwrap();

    let owned = equipments
        .find(Some(Filter::eq("userEmail", "a@x.com")))
        .await
        .unwrap();
    let names: Vec<_> = owned.iter().map(|r| r.get("name").cloned().unwrap()).collect();
    assert_eq!(names, [json!("Bat"), json!("Glove")]);

    assert_eq!(equipments.find(None).await.unwrap().len(), 4);
    assert!(
        equipments
            .find(Some(Filter::eq("userEmail", "nobody@x.com")))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn update_only_touches_named_fields() {
    let equipments = equipments().await;
    let id = equipments
        .insert(fields(json!({ "name": "Tennis Racket", "userEmail": "a@x.com", "price": 50 })))
        .await
        .unwrap();

    let outcome = equipments
        .update(&id.to_hex(), fields(json!({ "name": "Pro Racket", "_id": "ignored" })))
        .await
        .unwrap();
    assert_eq!(outcome.modified, 1);

    let record = equipments.get(&id.to_hex()).await.unwrap();
    assert_eq!(record.id(), &id);
    assert_eq!(record.get("name"), Some(&json!("Pro Racket")));
    assert_eq!(record.get("userEmail"), Some(&json!("a@x.com")));
    assert_eq!(record.get("price"), Some(&json!(50)));
}

#[tokio::test]
async fn update_with_same_values_modifies_nothing() {
    let equipments = equipments().await;
    let id = equipments.insert(fields(json!({ "name": "Ball" }))).await.unwrap();

    let outcome = equipments
        .update(&id.to_hex(), fields(json!({ "name": "Ball" })))
        .await
        .unwrap();

    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.modified, 0);
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let equipments = equipments().await;
    let id = equipments.insert(fields(json!({ "name": "Ball" }))).await.unwrap();

    equipments.delete(&id.to_hex()).await.unwrap();

    assert!(matches!(equipments.delete(&id.to_hex()).await, Err(StoreError::NotFound(..))));
    assert!(matches!(equipments.get(&id.to_hex()).await, Err(StoreError::NotFound(..))));
}

#[tokio::test]
async fn collections_are_isolated() {
    let store = DocumentStore::new(InMemoryStore::new());
    let id = store
        .collection("equipments")
        .insert(fields(json!({ "name": "Ball" })))
        .await
        .unwrap();

    assert!(matches!(
        store.collection("other").get(&id.to_hex()).await,
        Err(StoreError::NotFound(..))
    ));
    store.ping().await.unwrap();
    store.shutdown().await.unwrap();
}
