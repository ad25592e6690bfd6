//! Qdrant REST backend for `DocumentStore`.
//!
//! Reads the collections the ingestion service writes: one per document, each
//! point carrying `text` and `chunk_index` in its payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Chunk, DocumentStore, StoreError};

const SCROLL_BATCH: usize = 100;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Serialize)]
struct ScrollRequest<'a> {
    limit: usize,
    with_payload: bool,
    with_vector: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct ScrollPage {
    points: Vec<Point>,
    #[serde(default)]
    next_page_offset: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Point {
    #[serde(default)]
    payload: Option<ChunkPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    text: String,
    #[serde(default)]
    chunk_index: i64,
}

#[derive(Clone)]
pub struct QdrantStore {
    client: Client,
    base_url: String,
}

impl QdrantStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn scroll_page(
        &self,
        collection: &str,
        limit: usize,
        offset: Option<&Value>,
    ) -> Result<Option<ScrollPage>, StoreError> {
        let url = format!("{}/collections/{}/points/scroll", self.base_url, collection);
        let response = self
            .client
            .post(&url)
            .json(&ScrollRequest {
                limit,
                with_payload: true,
                with_vector: false,
                offset,
            })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        let page: Envelope<ScrollPage> = response.json().await?;
        Ok(Some(page.result))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DocumentStore for QdrantStore {
    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let response = self
            .client
            .get(format!("{}/collections", self.base_url))
            .send()
            .await?;
        let list: Envelope<CollectionList> = ensure_success(response).await?.json().await?;
        Ok(list.result.collections.into_iter().map(|c| c.name).collect())
    }

    async fn chunks(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Chunk>, StoreError> {
        let mut chunks = Vec::new();
        let mut offset: Option<Value> = None;

        loop {
            let batch = match limit {
                Some(limit) => SCROLL_BATCH.min(limit - chunks.len()),
                None => SCROLL_BATCH,
            };
            let Some(page) = self.scroll_page(collection, batch, offset.as_ref()).await? else {
                return Ok(Vec::new());
            };

            chunks.extend(page.points.into_iter().map(|point| {
                let payload = point.payload.unwrap_or_default();
                Chunk {
                    chunk_index: payload.chunk_index,
                    text: payload.text,
                }
            }));

            let limit_reached = limit.is_some_and(|limit| chunks.len() >= limit);
            match page.next_page_offset {
                Some(next) if !next.is_null() && !limit_reached => offset = Some(next),
                _ => break,
            }
        }

        debug!("Scrolled {} chunks from {}", chunks.len(), collection);
        Ok(chunks)
    }
}
