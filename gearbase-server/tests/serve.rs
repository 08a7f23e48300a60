//! Server lifecycle tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use gearbase::{
    backend::{StoreBackend, UpdateOutcome},
    bson::Document,
    document::DocumentId,
    error::StoreResult,
    memory::InMemoryStore,
    query::Expr,
    store::DocumentStore,
};
use gearbase_server::serve;
use tokio::net::TcpListener;

/// In-memory backend that records whether it was shut down.
#[derive(Debug)]
struct Tracked {
    inner: InMemoryStore,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl StoreBackend for Tracked {
    async fn insert_document(&self, c: &str, id: DocumentId, doc: Document) -> StoreResult<()> {
        self.inner.insert_document(c, id, doc).await
    }

    async fn find_documents(&self, c: &str, filter: Option<Expr>) -> StoreResult<Vec<Document>> {
        self.inner.find_documents(c, filter).await
    }

    async fn find_document(&self, c: &str, id: DocumentId) -> StoreResult<Option<Document>> {
        self.inner.find_document(c, id).await
    }

    async fn update_document(
        &self,
        c: &str,
        id: DocumentId,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.inner.update_document(c, id, fields).await
    }

    async fn delete_document(&self, c: &str, id: DocumentId) -> StoreResult<u64> {
        self.inner.delete_document(c, id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn shutdown(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn store_is_closed_when_serving_stops() {
    let closed = Arc::new(AtomicBool::new(false));
    let store = DocumentStore::new(Tracked {
        inner: InMemoryStore::new(),
        closed: Arc::clone(&closed),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    serve(listener, store, std::future::ready(())).await.unwrap();

    assert!(closed.load(Ordering::SeqCst));
}
