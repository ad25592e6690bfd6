//! Document store boundary: text reconstruction over chunked collections.
//!
//! Backends only list collections and return raw chunks. Ordering, joining and
//! title selection live in the provided methods of `DocumentStore` so every
//! backend reconstructs text the same way. Retrieval order from a backend is
//! never trusted; chunks are always sorted by `chunk_index`.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
pub mod memory;
pub mod qdrant;

pub use qdrant::QdrantStore;

/// Collection holding the (single, active) resume.
pub const RESUME_COLLECTION: &str = "resume_chunks";
/// Job collections are named `job_<id>`.
pub const JOB_COLLECTION_PREFIX: &str = "job_";
/// Separator between reconstructed chunks.
const PARAGRAPH_SEPARATOR: &str = "\n\n";
/// How many points `get_first_line` inspects when looking for chunk 0.
const TITLE_SCAN_LIMIT: usize = 20;
const TITLE_MIN_CHARS: usize = 5;
const TITLE_MAX_CHARS: usize = 120;

pub fn job_collection(job_id: &str) -> String {
    format!("{JOB_COLLECTION_PREFIX}{job_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One stored text chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub chunk_index: i64,
    pub text: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of all collections, in no particular order.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Chunks of one collection in backend order. `limit` caps how many are read.
    /// Absent collections yield an empty list.
    async fn chunks(&self, collection: &str, limit: Option<usize>)
        -> Result<Vec<Chunk>, StoreError>;

    async fn collection_exists(&self, collection: &str) -> Result<bool, StoreError> {
        Ok(self
            .collection_names()
            .await?
            .iter()
            .any(|name| name == collection))
    }

    /// Job ids derived from `job_<id>` collection names, in ascending order.
    /// This order is the "discovery order" used for stable ranking.
    async fn list_job_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .collection_names()
            .await?
            .into_iter()
            .filter_map(|name| name.strip_prefix(JOB_COLLECTION_PREFIX).map(String::from))
            .filter(|id| !id.is_empty())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Full document text, chunks joined in `chunk_index` order.
    /// `None` when the collection is missing or holds no text.
    async fn get_full_text(&self, collection: &str) -> Result<Option<String>, StoreError> {
        if !self.collection_exists(collection).await? {
            tracing::warn!("Collection {collection} does not exist");
            return Ok(None);
        }
        let chunks = self.chunks(collection, None).await?;
        let text = reconstruct_text(chunks);
        if let Some(text) = &text {
            tracing::debug!("Reconstructed {collection} ({} chars)", text.len());
        }
        Ok(text)
    }

    /// Short title from the lowest-index chunk; empty when nothing qualifies.
    async fn get_first_line(&self, collection: &str) -> Result<String, StoreError> {
        if !self.collection_exists(collection).await? {
            return Ok(String::new());
        }
        let chunks = self.chunks(collection, Some(TITLE_SCAN_LIMIT)).await?;
        Ok(first_line(&chunks))
    }
}

/// Sorts by `chunk_index` (stable), drops empty chunks and joins with paragraph breaks.
pub fn reconstruct_text(mut chunks: Vec<Chunk>) -> Option<String> {
    chunks.retain(|c| !c.text.is_empty());
    if chunks.is_empty() {
        return None;
    }
    chunks.sort_by_key(|c| c.chunk_index);
    Some(
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR),
    )
}

/// First sentence-like fragment (> 5 chars) of the lowest-index chunk, capped at 120 chars.
pub fn first_line(chunks: &[Chunk]) -> String {
    let Some(first) = chunks.iter().min_by_key(|c| c.chunk_index) else {
        return String::new();
    };
    let collapsed = collapse_whitespace(&first.text);
    collapsed
        .split('.')
        .map(str::trim)
        .find(|fragment| fragment.chars().count() > TITLE_MIN_CHARS)
        .map(|fragment| fragment.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_default()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
