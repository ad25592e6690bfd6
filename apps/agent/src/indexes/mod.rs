//! Index Store: memoised per-document query handles.
//!
//! One `QueryHandle` per collection (the resume, or one job), built on first
//! use and reused by every tool and request afterwards. Construction is
//! synchronised per key so concurrent first uses build once. Re-uploading a
//! document must be followed by `invalidate` for that key.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::documents::{job_collection, Chunk, DocumentStore, StoreError, RESUME_COLLECTION};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{LanguageModel, LlmError};

/// Terms shorter than this are ignored when ranking chunks.
const MIN_TERM_CHARS: usize = 3;

const QUERY_PROMPT_TEMPLATE: &str = "Context information from one document is below.
---------------------
{context}
---------------------
{grounding_instruction}
Answer the question using the context only.
Question: {question}
Answer:";

/// A ready-to-query handle over one document's chunks.
pub struct QueryHandle {
    collection: String,
    chunks: Vec<Chunk>,
    llm: Arc<dyn LanguageModel>,
}

impl QueryHandle {
    fn new(collection: String, mut chunks: Vec<Chunk>, llm: Arc<dyn LanguageModel>) -> Self {
        chunks.retain(|c| !c.text.trim().is_empty());
        chunks.sort_by_key(|c| c.chunk_index);
        Self {
            collection,
            chunks,
            llm,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Retrieves the `top_k` most relevant chunks and asks the LLM to answer from them.
    pub async fn query(&self, question: &str, top_k: usize) -> Result<String, LlmError> {
        let context = self
            .retrieve(question, top_k)
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = QUERY_PROMPT_TEMPLATE
            .replace("{context}", &context)
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{question}", question);
        let answer = self.llm.complete(&prompt).await?;
        Ok(answer.trim().to_string())
    }

    /// Ranks chunks by how many distinct question terms they contain.
    /// Ties keep document order; with no overlap at all the leading chunks are used.
    pub fn retrieve(&self, question: &str, top_k: usize) -> Vec<&Chunk> {
        let terms = terms(question);
        let mut scored: Vec<(usize, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let chunk_terms = self::terms(&chunk.text);
                (terms.intersection(&chunk_terms).count(), chunk)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        let mut selected: Vec<&Chunk> = scored.into_iter().take(top_k).map(|(_, c)| c).collect();
        selected.sort_by_key(|c| c.chunk_index);
        selected
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_lowercase)
        .collect()
}

enum BuildMiss {
    Absent,
    Store(StoreError),
}

/// Cache of lazily built query handles, keyed by collection name.
pub struct IndexStore {
    store: Arc<dyn DocumentStore>,
    llm: Arc<dyn LanguageModel>,
    cache: DashMap<String, Arc<OnceCell<Arc<QueryHandle>>>>,
}

impl IndexStore {
    pub fn new(store: Arc<dyn DocumentStore>, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            store,
            llm,
            cache: DashMap::new(),
        }
    }

    pub async fn resume(&self) -> Option<Arc<QueryHandle>> {
        self.handle(RESUME_COLLECTION).await
    }

    pub async fn job(&self, job_id: &str) -> Option<Arc<QueryHandle>> {
        self.handle(&job_collection(job_id)).await
    }

    /// Returns the memoised handle, building it on first use.
    /// `None` when the collection does not exist or cannot be read; nothing is
    /// kept for it, so a later upload is seen.
    pub async fn handle(&self, collection: &str) -> Option<Arc<QueryHandle>> {
        let cell = self.cache.entry(collection.to_string()).or_default().clone();
        let miss = match cell.get_or_try_init(|| self.build(collection)).await {
            Ok(handle) => return Some(handle.clone()),
            Err(miss) => miss,
        };
        self.cache.remove_if(collection, |_, cell| !cell.initialized());
        match miss {
            BuildMiss::Absent => warn!("Collection {collection} not found, no index built"),
            BuildMiss::Store(e) => warn!("Could not build index for {collection}: {e}"),
        }
        None
    }

    /// Evicts a built handle, e.g. after the document was re-uploaded.
    pub fn invalidate(&self, collection: &str) -> bool {
        let evicted = self
            .cache
            .remove(collection)
            .is_some_and(|(_, cell)| cell.initialized());
        info!("Index cache invalidated for {collection} (evicted: {evicted})");
        evicted
    }

    #[cfg(test)]
    pub fn is_cached(&self, collection: &str) -> bool {
        self.cache
            .get(collection)
            .is_some_and(|cell| cell.initialized())
    }

    async fn build(&self, collection: &str) -> Result<Arc<QueryHandle>, BuildMiss> {
        if !self
            .store
            .collection_exists(collection)
            .await
            .map_err(BuildMiss::Store)?
        {
            return Err(BuildMiss::Absent);
        }
        let chunks = self
            .store
            .chunks(collection, None)
            .await
            .map_err(BuildMiss::Store)?;
        info!("Loaded index for collection {collection} ({} chunks)", chunks.len());
        Ok(Arc::new(QueryHandle::new(
            collection.to_string(),
            chunks,
            self.llm.clone(),
        )))
    }
}
