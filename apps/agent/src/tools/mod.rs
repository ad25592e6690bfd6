//! Tool Registry: the named analysis operations exposed to the reasoning loop.
//!
//! Every tool shares one contract: arguments arrive as JSON, results leave as
//! JSON. A missing resume or job is not an error, it is a value
//! (`ToolOutcome::Missing`) the loop can observe and explain to the user.
//! `Err(ToolError)` is reserved for bad arguments and an unreachable store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::documents::{job_collection, DocumentStore, StoreError, RESUME_COLLECTION};
use crate::indexes::{IndexStore, QueryHandle};
use crate::llm_client::LanguageModel;

pub mod analyze_fit;
pub mod fit_score;
pub mod interview_plan;
pub mod job_ranking;
pub mod list_jobs;
pub mod prompts;
pub mod resume_summary;
pub mod schemas;
pub mod skill_gap;

/// Raw-text context used when a retrieval handle is unavailable or fails.
const RAW_CONTEXT_CHARS: usize = 1500;

pub const RESUME_MISSING: &str = "Resume not uploaded yet.";
pub const NO_JOBS: &str = "No job descriptions uploaded yet.";

pub fn job_missing(job_id: &str) -> String {
    format!("Job {job_id} not found or not uploaded yet.")
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to serialise tool output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Either a populated result or a "precondition missing" payload.
/// Serialises as the result itself, or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome<T> {
    Ready(T),
    Missing { error: String },
}

impl<T> ToolOutcome<T> {
    pub fn missing(error: impl Into<String>) -> Self {
        ToolOutcome::Missing {
            error: error.into(),
        }
    }

    #[cfg(test)]
    pub fn ready(self) -> Option<T> {
        match self {
            ToolOutcome::Ready(value) => Some(value),
            ToolOutcome::Missing { .. } => None,
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Capability description shown to the reasoning loop.
    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;

    fn takes_job_id(&self) -> bool {
        self.parameters_schema()["required"]
            .as_array()
            .is_some_and(|required| required.iter().any(|r| r == "job_id"))
    }
}

/// Shared collaborators handed to every tool at construction.
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<dyn DocumentStore>,
    pub indexes: Arc<IndexStore>,
    pub llm: Arc<dyn LanguageModel>,
}

/// Ordered set of tools. Registration order is the order shown to the model.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(i) => self.tools[i] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// One line per tool: name, arguments and description.
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                let args = if t.takes_job_id() { "job_id" } else { "" };
                format!("- {}({}): {}", t.name(), args, t.description())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn execute(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!("Executing tool {name} with {arguments}");
        tool.execute(arguments).await
    }
}

/// The full tool set, deterministic tools first.
pub fn build_all_tools(ctx: ToolContext) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(list_jobs::ListJobsTool::new(ctx.clone())));
    registry.register(Arc::new(fit_score::FitScoreTool::new(ctx.clone())));
    registry.register(Arc::new(skill_gap::SkillGapTool::new(ctx.clone())));
    registry.register(Arc::new(analyze_fit::AnalyzeFitTool::new(ctx.clone())));
    registry.register(Arc::new(job_ranking::JobRankingTool::new(ctx.clone())));
    registry.register(Arc::new(interview_plan::InterviewPlanTool::new(ctx.clone())));
    registry.register(Arc::new(resume_summary::ResumeSummaryTool::new(ctx)));
    registry
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

/// Accepts `"abc"`, `{"job_id": "abc"}` or `{"job_id": 12}`.
pub fn job_id_arg(tool: &str, arguments: &Value) -> Result<String, ToolError> {
    let raw = match arguments {
        Value::Object(map) => map.get("job_id").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    let job_id = match raw {
        Value::String(s) => s.trim().trim_matches('"').to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    if job_id.is_empty() {
        return Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: "a non-empty job_id is required".to_string(),
        });
    }
    Ok(job_id)
}

pub fn job_id_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "job_id": {
                "type": "string",
                "description": "Identifier of an uploaded job description"
            }
        },
        "required": ["job_id"]
    })
}

pub fn no_arguments_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub fn to_json<T: Serialize>(outcome: &ToolOutcome<T>) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(outcome)?)
}

pub struct DocumentPair {
    pub resume_text: String,
    pub job_text: String,
}

/// Loads the resume and one job, reporting whichever is absent first.
pub async fn load_resume_and_job(
    store: &dyn DocumentStore,
    job_id: &str,
) -> Result<ToolOutcome<DocumentPair>, ToolError> {
    let Some(resume_text) = store.get_full_text(RESUME_COLLECTION).await? else {
        return Ok(ToolOutcome::missing(RESUME_MISSING));
    };
    let Some(job_text) = store.get_full_text(&job_collection(job_id)).await? else {
        return Ok(ToolOutcome::missing(job_missing(job_id)));
    };
    Ok(ToolOutcome::Ready(DocumentPair {
        resume_text,
        job_text,
    }))
}

/// Asks a retrieval handle; falls back to the leading raw text on any failure.
pub async fn retrieved_context(
    handle: Option<Arc<QueryHandle>>,
    question: &str,
    top_k: usize,
    raw_text: &str,
) -> String {
    if let Some(handle) = handle {
        match handle.query(question, top_k).await {
            Ok(answer) if !answer.is_empty() => return answer,
            Ok(_) => warn!("Empty retrieval answer from {}", handle.collection()),
            Err(e) => warn!(
                "Retrieval on {} failed: {e}, using raw text fallback",
                handle.collection()
            ),
        }
    }
    truncate_chars(raw_text, RAW_CONTEXT_CHARS)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Non-empty lines with list bullets stripped, at most `limit` of them.
pub fn bullet_lines(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_matches(|c| matches!(c, '-' | '•' | '*' | ' ')))
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::fixture;
    use super::*;
    use crate::test_support::ScriptedLlm;
    use serde_json::json;

    #[test]
    fn test_job_id_arg_accepts_common_shapes() {
        assert_eq!(job_id_arg("t", &json!("job1")).unwrap(), "job1");
        assert_eq!(job_id_arg("t", &json!({"job_id": " job1 "})).unwrap(), "job1");
        assert_eq!(job_id_arg("t", &json!({"job_id": 7})).unwrap(), "7");
        assert!(matches!(
            job_id_arg("t", &json!({})),
            Err(ToolError::InvalidArguments { .. })
        ));
        assert!(job_id_arg("t", &json!("")).is_err());
    }

    #[test]
    fn test_missing_outcome_serialises_as_error_payload() {
        let outcome: ToolOutcome<u32> = ToolOutcome::missing(RESUME_MISSING);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Resume not uploaded yet."})
        );
        assert_eq!(serde_json::to_value(ToolOutcome::Ready(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_registry_order_and_lookup() {
        let registry = build_all_tools(fixture(ScriptedLlm::new()).ctx);
        assert_eq!(
            registry.names(),
            vec![
                "list_jobs",
                "fit_score",
                "skill_gap_analysis",
                "analyze_fit",
                "job_ranking_based_on_fit",
                "interview_preparation_strategy",
                "resume_summary",
            ]
        );
        assert!(registry.get("fit_score").unwrap().takes_job_id());
        assert!(!registry.get("list_jobs").unwrap().takes_job_id());
        assert!(registry.describe().contains("- fit_score(job_id): "));
    }

    #[tokio::test]
    async fn test_registry_unknown_tool() {
        let registry = build_all_tools(fixture(ScriptedLlm::new()).ctx);
        let err = registry.execute("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_payload() {
        let fx = fixture(ScriptedLlm::new());
        fx.store.set_unavailable(true);
        let registry = build_all_tools(fx.ctx);
        let err = registry.execute("fit_score", json!("job1")).await.unwrap_err();
        assert!(matches!(err, ToolError::Store(_)));
    }

    #[tokio::test]
    async fn test_retrieved_context_falls_back_to_raw_text() {
        let raw = "r".repeat(2000);
        assert_eq!(retrieved_context(None, "q", 3, &raw).await.len(), 1500);
    }

    #[test]
    fn test_bullet_lines() {
        let text = "- Led team\n\n* Built infra\n• Shipped\n";
        assert_eq!(bullet_lines(text, 2), vec!["Led team", "Built infra"]);
    }
}
