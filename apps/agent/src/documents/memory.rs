//! In-memory `DocumentStore` used by tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Chunk, DocumentStore, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Chunk>>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores chunks exactly in the given order (which need not be index order).
    pub async fn insert_chunks(&self, collection: &str, chunks: Vec<Chunk>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), chunks);
    }

    /// Stores `text` as one chunk per blank-line separated paragraph.
    pub async fn insert_text(&self, collection: &str, text: &str) {
        let chunks = text
            .split("\n\n")
            .enumerate()
            .map(|(i, part)| Chunk {
                chunk_index: i as i64,
                text: part.to_string(),
            })
            .collect();
        self.insert_chunks(collection, chunks).await;
    }

    /// Makes every call fail as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.collections.read().await.keys().cloned().collect())
    }

    async fn chunks(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Chunk>, StoreError> {
        self.check()?;
        let collections = self.collections.read().await;
        let chunks = collections.get(collection).cloned().unwrap_or_default();
        Ok(match limit {
            Some(limit) => chunks.into_iter().take(limit).collect(),
            None => chunks,
        })
    }
}
