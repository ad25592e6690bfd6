//! Router / Dispatcher: the four-stage request pipeline.
//!
//!   1. classify the query (failure → no classification)
//!   2. metadata fast path (no LLM)
//!   3. conversational fast path (one direct chat turn)
//!   4. reasoning loop with tool hint, under the session lock and the
//!      persistent execution context
//!
//! Stages 1–3 never fail: they resolve or fall through. Only stage 4 can
//! return an error to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::agent::prompts::SYSTEM_PROMPT;
use crate::agent::react::{SELECTED_JOB_MARKER, USE_TOOL_MARKER};
use crate::agent::{AgentError, ExecutionContext, Session, SessionStore, StopPolicy};
use crate::documents::DocumentStore;
use crate::llm_client::{ChatMessage, LanguageModel};

pub mod intent;
pub mod metadata;
pub mod prompts;

pub use intent::{classify_intent, Intent, IntentClassification};

/// Upper bound on the classifier call; past it the query routes unclassified.
const CLASSIFICATION_TIMEOUT: Duration = Duration::from_secs(60);

const UNKNOWN_INTENT: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutedVia {
    Metadata,
    DirectLlm,
    Agent,
}

impl RoutedVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutedVia::Metadata => "metadata",
            RoutedVia::DirectLlm => "direct_llm",
            RoutedVia::Agent => "agent",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedAnswer {
    pub answer: String,
    pub intent: String,
    pub routed_via: RoutedVia,
}

pub struct RouteRequest<'a> {
    pub query: &'a str,
    pub session_id: &'a str,
    pub job_id: Option<&'a str>,
    pub classification: Option<&'a IntentClassification>,
}

pub enum Routing {
    Resolved(RoutedAnswer),
    Continue,
}

/// One fast-path stage. Internal failures are logged and become `Continue`.
#[async_trait]
pub trait RoutingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn route(&self, request: &RouteRequest<'_>) -> Routing;
}

pub struct MetadataFastPath {
    store: Arc<dyn DocumentStore>,
}

impl MetadataFastPath {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoutingStrategy for MetadataFastPath {
    fn name(&self) -> &'static str {
        "metadata"
    }

    async fn route(&self, request: &RouteRequest<'_>) -> Routing {
        let Some(classification) = request.classification.filter(|c| c.requires_metadata) else {
            return Routing::Continue;
        };
        match metadata::answer_metadata_query(request.query, self.store.as_ref()).await {
            Ok(answer) => Routing::Resolved(RoutedAnswer {
                answer,
                intent: classification.intent.to_string(),
                routed_via: RoutedVia::Metadata,
            }),
            Err(e) => {
                warn!("Metadata handler failed ({e}), falling through");
                Routing::Continue
            }
        }
    }
}

pub struct ConversationalFastPath {
    llm: Arc<dyn LanguageModel>,
}

impl ConversationalFastPath {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RoutingStrategy for ConversationalFastPath {
    fn name(&self) -> &'static str {
        "conversational"
    }

    /// One chat turn with the persona prompt. No tools, no memory.
    async fn route(&self, request: &RouteRequest<'_>) -> Routing {
        let eligible = request
            .classification
            .is_some_and(|c| c.intent == Intent::Conversational && !c.requires_tool);
        if !eligible {
            return Routing::Continue;
        }
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(request.query),
        ];
        match self.llm.chat(&messages).await {
            Ok(reply) => {
                info!("Conversational response via direct LLM");
                Routing::Resolved(RoutedAnswer {
                    answer: reply.content,
                    intent: Intent::Conversational.to_string(),
                    routed_via: RoutedVia::DirectLlm,
                })
            }
            Err(e) => {
                warn!("Direct LLM call failed ({e}), falling through to agent");
                Routing::Continue
            }
        }
    }
}

/// Prefixes the optional job marker, then the forced-tool marker in front of it.
pub fn build_effective_query(
    query: &str,
    job_id: Option<&str>,
    classification: Option<&IntentClassification>,
) -> String {
    let mut effective = query.to_string();
    if let Some(job_id) = job_id.filter(|id| !id.trim().is_empty()) {
        effective = format!("{SELECTED_JOB_MARKER} {}] {effective}", job_id.trim());
    }
    let tool = classification
        .filter(|c| c.requires_tool)
        .and_then(|c| c.tool_name.as_deref());
    if let Some(tool) = tool {
        info!("Tool hint injected: {tool}");
        effective = format!("{USE_TOOL_MARKER} {tool}] {effective}");
    }
    effective
}

pub struct Dispatcher {
    llm: Arc<dyn LanguageModel>,
    strategies: Vec<Box<dyn RoutingStrategy>>,
    sessions: Arc<SessionStore>,
    exec: ExecutionContext,
    max_iterations: usize,
    stop_policy: StopPolicy,
}

impl Dispatcher {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn DocumentStore>,
        sessions: Arc<SessionStore>,
        exec: ExecutionContext,
        max_iterations: usize,
        stop_policy: StopPolicy,
    ) -> Self {
        let strategies: Vec<Box<dyn RoutingStrategy>> = vec![
            Box::new(MetadataFastPath::new(store)),
            Box::new(ConversationalFastPath::new(llm.clone())),
        ];
        Self {
            llm,
            strategies,
            sessions,
            exec,
            max_iterations,
            stop_policy,
        }
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn dispatch(
        &self,
        query: &str,
        session_id: &str,
        job_id: Option<&str>,
    ) -> Result<RoutedAnswer, AgentError> {
        let span = info_span!("dispatch", request_id = %Uuid::new_v4(), session = session_id);
        self.route_query(query, session_id, job_id).instrument(span).await
    }

    async fn route_query(
        &self,
        query: &str,
        session_id: &str,
        job_id: Option<&str>,
    ) -> Result<RoutedAnswer, AgentError> {
        let classification =
            match tokio::time::timeout(CLASSIFICATION_TIMEOUT, classify_intent(query, self.llm.as_ref()))
                .await
            {
                Ok(classification) => Some(classification),
                Err(_) => {
                    warn!("Classification timed out, routing to agent");
                    None
                }
            };

        let request = RouteRequest {
            query,
            session_id,
            job_id,
            classification: classification.as_ref(),
        };
        for strategy in &self.strategies {
            if let Routing::Resolved(answer) = strategy.route(&request).await {
                return Ok(answer);
            }
            info!("Stage {} did not resolve, continuing", strategy.name());
        }

        self.run_agent(&request).await
    }

    async fn run_agent(&self, request: &RouteRequest<'_>) -> Result<RoutedAnswer, AgentError> {
        let effective = build_effective_query(request.query, request.job_id, request.classification);
        let session = self.sessions.get_or_create(request.session_id);
        let mut guard = session.lock_owned().await;
        let max_iterations = self.max_iterations;
        let stop_policy = self.stop_policy;

        let run = self
            .exec
            .run(async move {
                let Session { agent, memory } = &mut *guard;
                agent
                    .run(&effective, memory, max_iterations, stop_policy)
                    .await
            })
            .await?;
        info!(
            "Agent answered session {} in {} iterations ({} tool calls)",
            request.session_id,
            run.iterations,
            run.steps.len()
        );

        Ok(RoutedAnswer {
            answer: run.answer,
            intent: request
                .classification
                .map_or(UNKNOWN_INTENT.to_string(), |c| c.intent.to_string()),
            routed_via: RoutedVia::Agent,
        })
    }
}
