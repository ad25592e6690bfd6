//! Intent Classifier: one LLM call, one JSON object, one safe fallback.
//!
//! `classify_intent` never fails: anything other than a well-formed
//! classification yields `IntentClassification::fallback()`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::prompts::CLASSIFICATION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{json_object_span, LanguageModel};

/// Tool names the classifier may hint. Anything else is cleared.
pub const KNOWN_TOOLS: &[&str] = &[
    "list_jobs",
    "fit_score",
    "skill_gap_analysis",
    "analyze_fit",
    "job_ranking_based_on_fit",
    "interview_preparation_strategy",
    "resume_summary",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Metadata,
    Tool,
    Retrieval,
    Conversational,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Metadata => "metadata",
            Intent::Tool => "tool",
            Intent::Retrieval => "retrieval",
            Intent::Conversational => "conversational",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    pub requires_retrieval: bool,
    pub requires_metadata: bool,
    pub requires_tool: bool,
    #[serde(default)]
    pub tool_name: Option<String>,
}

impl IntentClassification {
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Conversational,
            requires_retrieval: true,
            requires_metadata: false,
            requires_tool: false,
            tool_name: None,
        }
    }

    /// `tool_name` survives only when a tool is required and the name is known.
    fn normalised(mut self) -> Self {
        let keep = self.requires_tool
            && self
                .tool_name
                .as_deref()
                .is_some_and(|name| KNOWN_TOOLS.contains(&name));
        if !keep {
            if let Some(name) = self.tool_name.take() {
                warn!("Clearing tool_name '{name}' from classifier output");
            }
        }
        self
    }
}

pub async fn classify_intent(query: &str, llm: &dyn LanguageModel) -> IntentClassification {
    let prompt = CLASSIFICATION_PROMPT_TEMPLATE
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{query}", &query.replace('"', "'"));

    let raw = match llm.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Intent classification call failed ({e}), falling back to conversational");
            return IntentClassification::fallback();
        }
    };

    match parse_classification(&raw) {
        Some(classification) => {
            info!(
                "Intent classified: intent={} tool={:?} requires_retrieval={} requires_metadata={} requires_tool={}",
                classification.intent,
                classification.tool_name,
                classification.requires_retrieval,
                classification.requires_metadata,
                classification.requires_tool
            );
            classification
        }
        None => {
            let preview: String = raw.chars().take(200).collect();
            warn!("Intent classifier returned no usable JSON, falling back. Raw: {preview}");
            IntentClassification::fallback()
        }
    }
}

/// Reads the span between the first `{` and the last `}`.
pub fn parse_classification(raw: &str) -> Option<IntentClassification> {
    let span = json_object_span(raw)?;
    serde_json::from_str::<IntentClassification>(span)
        .ok()
        .map(IntentClassification::normalised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedLlm;

    #[test]
    fn test_parse_valid_with_preamble() {
        let raw = r#"Sure: {"intent": "tool", "requires_retrieval": false, "requires_metadata": false, "requires_tool": true, "tool_name": "fit_score"} done"#;
        let c = parse_classification(raw).unwrap();
        assert_eq!(c.intent, Intent::Tool);
        assert_eq!(c.tool_name.as_deref(), Some("fit_score"));
    }

    #[test]
    fn test_unknown_tool_name_is_cleared() {
        let raw = r#"{"intent": "tool", "requires_retrieval": false, "requires_metadata": false, "requires_tool": true, "tool_name": "delete_everything"}"#;
        assert_eq!(parse_classification(raw).unwrap().tool_name, None);
    }

    #[test]
    fn test_tool_name_cleared_when_tool_not_required() {
        let raw = r#"{"intent": "metadata", "requires_retrieval": false, "requires_metadata": true, "requires_tool": false, "tool_name": "list_jobs"}"#;
        assert_eq!(parse_classification(raw).unwrap().tool_name, None);
    }

    #[test]
    fn test_schema_violations_are_rejected() {
        for raw in [
            "no json at all",
            r#"{"intent": "metadata|retrieval", "requires_retrieval": true, "requires_metadata": true, "requires_tool": false}"#,
            r#"{"intent": "tool"}"#,
            r#"{"intent": "tool", "requires_retrieval": "yes", "requires_metadata": false, "requires_tool": true}"#,
            "{ broken",
        ] {
            assert_eq!(parse_classification(raw), None, "accepted: {raw}");
        }
    }

    #[tokio::test]
    async fn test_malformed_output_yields_exact_fallback() {
        for output in ["garbage", "{\"intent\": 3}", "[]", ""] {
            let llm = ScriptedLlm::new().complete_with(output);
            let c = classify_intent("anything", &llm).await;
            assert_eq!(
                c,
                IntentClassification {
                    intent: Intent::Conversational,
                    requires_retrieval: true,
                    requires_metadata: false,
                    requires_tool: false,
                    tool_name: None,
                }
            );
        }
    }

    #[tokio::test]
    async fn test_llm_failure_yields_fallback() {
        let llm = ScriptedLlm::new().complete_fails();
        assert_eq!(
            classify_intent("hi", &llm).await,
            IntentClassification::fallback()
        );
    }

    #[tokio::test]
    async fn test_query_quotes_are_escaped() {
        let llm = ScriptedLlm::new();
        classify_intent(r#"what is "fit""#, &llm).await;
        assert!(llm.prompts()[0].contains(r#"User query: "what is 'fit'""#));
    }
}
