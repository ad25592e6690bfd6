/// LLM Client: the single point of entry for all model calls in the career agent.
///
/// ARCHITECTURAL RULE: No other module may talk to the model server directly.
/// Routing, tools and the reasoning loop all go through `LanguageModel`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Context window requested from Ollama. The model default (128K) does not fit in memory.
const NUM_CTX: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {retries} retries")]
    RetriesExhausted { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The completion capability consumed by the router, the tools and the reasoning loop.
///
/// Carried as `Arc<dyn LanguageModel>` so tests can swap in a scripted model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-prompt completion. Returns the raw generated text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// One chat turn over the given message history.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, LlmError>;
}

#[derive(Debug, Serialize)]
struct ModelOptions {
    num_ctx: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ModelOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Ollama-backed model client. Cheap to clone; the HTTP pool is shared.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POSTs a JSON body to the model server.
    /// Retries on 429 and 5xx (and transport errors) with exponential backoff.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM server returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OllamaError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(LlmError::RetriesExhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: ModelOptions { num_ctx: NUM_CTX },
        };
        let response: GenerateResponse = self.post("/api/generate", &request).await?;

        debug!(
            "LLM completion succeeded: input_tokens={:?}, output_tokens={:?}",
            response.prompt_eval_count, response.eval_count
        );

        if response.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.response)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ModelOptions { num_ctx: NUM_CTX },
        };
        let response: ChatResponse = self.post("/api/chat", &request).await?;

        debug!(
            "LLM chat succeeded: input_tokens={:?}, output_tokens={:?}",
            response.prompt_eval_count, response.eval_count
        );

        if response.message.content.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.message)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tolerant output parsing
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the span between the first `{` and the last `}`, if any.
/// Models often wrap their JSON in a sentence of preamble.
pub fn json_object_span(text: &str) -> Option<&str> {
    delimited_span(text, '{', '}')
}

/// Returns the span between the first `[` and the last `]`, if any.
pub fn json_array_span(text: &str) -> Option<&str> {
    delimited_span(text, '[', ']')
}

fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
