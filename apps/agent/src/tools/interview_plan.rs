//! interview_preparation_strategy: focus areas from the skill gap, question
//! lists from the LLM grounded in retrieved job and resume context.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::prompts::{
    BEHAVIORAL_QUESTIONS_PROMPT, JOB_TECHNICAL_QUESTION, PREP_TIPS, RESUME_ACHIEVEMENTS_QUESTION,
    STORYTELLING_PROMPT, TECHNICAL_QUESTIONS_PROMPT,
};
use super::schemas::InterviewPlan;
use super::{
    job_id_arg, job_id_schema, load_resume_and_job, retrieved_context, to_json, truncate_chars,
    Tool, ToolContext, ToolError, ToolOutcome,
};
use crate::llm_client::json_array_span;
use crate::matching::extract_skills;
use crate::matching::fit_scoring::skill_gap;

const FOCUS_AREA_LIMIT: usize = 8;
const PROMPT_GAP_LIMIT: usize = 12;
const TECHNICAL_COUNT: usize = 5;
const BEHAVIORAL_COUNT: usize = 5;
const STORYTELLING_COUNT: usize = 3;
const JOB_TOP_K: usize = 4;
const RESUME_TOP_K: usize = 3;
const FALLBACK_ITEM_CHARS: usize = 200;

pub struct InterviewPlanTool {
    ctx: ToolContext,
}

impl InterviewPlanTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, job_id: &str) -> Result<ToolOutcome<InterviewPlan>, ToolError> {
        let docs = match load_resume_and_job(self.ctx.store.as_ref(), job_id).await? {
            ToolOutcome::Ready(docs) => docs,
            ToolOutcome::Missing { error } => return Ok(ToolOutcome::Missing { error }),
        };

        let missing = skill_gap(
            &extract_skills(&docs.resume_text),
            &extract_skills(&docs.job_text),
        )
        .missing;

        let job_ctx = retrieved_context(
            self.ctx.indexes.job(job_id).await,
            JOB_TECHNICAL_QUESTION,
            JOB_TOP_K,
            &docs.job_text,
        )
        .await;
        let resume_ctx = retrieved_context(
            self.ctx.indexes.resume().await,
            RESUME_ACHIEVEMENTS_QUESTION,
            RESUME_TOP_K,
            &docs.resume_text,
        )
        .await;

        let gaps = if missing.is_empty() {
            "none identified".to_string()
        } else {
            missing
                .iter()
                .take(PROMPT_GAP_LIMIT)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        let job_excerpt = truncate_chars(&job_ctx, 800);

        let technical_questions = self
            .generate_list(
                "technical questions",
                &TECHNICAL_QUESTIONS_PROMPT
                    .replace("{job_ctx}", &job_excerpt)
                    .replace("{gaps}", &gaps),
                TECHNICAL_COUNT,
            )
            .await;
        let behavioral_questions = self
            .generate_list(
                "behavioral questions",
                &BEHAVIORAL_QUESTIONS_PROMPT.replace("{job_ctx}", &job_excerpt),
                BEHAVIORAL_COUNT,
            )
            .await;
        let storytelling_suggestions = self
            .generate_list(
                "storytelling suggestions",
                &STORYTELLING_PROMPT
                    .replace("{resume_ctx}", &truncate_chars(&resume_ctx, 800))
                    .replace("{job_ctx}", &truncate_chars(&job_ctx, 600)),
                STORYTELLING_COUNT,
            )
            .await;

        info!(
            "Interview plan for job {job_id}: {} focus areas, {}/{}/{} items",
            missing.len().min(FOCUS_AREA_LIMIT),
            technical_questions.len(),
            behavioral_questions.len(),
            storytelling_suggestions.len()
        );
        Ok(ToolOutcome::Ready(InterviewPlan {
            job_id: job_id.to_string(),
            focus_areas: missing.into_iter().take(FOCUS_AREA_LIMIT).collect(),
            technical_questions,
            behavioral_questions,
            storytelling_suggestions,
            prep_tips: PREP_TIPS.to_string(),
        }))
    }

    /// An LLM failure yields an empty list; the rest of the plan still stands.
    async fn generate_list(&self, what: &str, prompt: &str, count: usize) -> Vec<String> {
        match self.ctx.llm.complete(prompt).await {
            Ok(raw) => parse_list(&raw, count),
            Err(e) => {
                warn!("Generating {what} failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Reads a JSON array of strings out of model output.
/// Falls back to one item per non-empty line, at most `fallback_count`.
pub fn parse_list(text: &str, fallback_count: usize) -> Vec<String> {
    if let Some(span) = json_array_span(text) {
        if let Ok(items) = serde_json::from_str::<Vec<Value>>(span) {
            return items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
        }
    }

    let lines: Vec<String> = text
        .lines()
        .map(|l| l.trim().trim_matches(|c| matches!(c, ' ' | '-' | '•' | '*' | '"' | '\'')))
        .filter(|l| !l.is_empty())
        .take(fallback_count)
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        vec![truncate_chars(text.trim(), FALLBACK_ITEM_CHARS)]
    } else {
        lines
    }
}

#[async_trait]
impl Tool for InterviewPlanTool {
    fn name(&self) -> &'static str {
        "interview_preparation_strategy"
    }

    fn description(&self) -> &'static str {
        "Generate a structured interview preparation strategy for a specific job. Includes \
         focus areas (skill gaps), technical interview questions, behavioral questions, and \
         storytelling suggestions. Use this when the user asks about interview prep."
    }

    fn parameters_schema(&self) -> Value {
        job_id_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let job_id = job_id_arg(self.name(), &arguments)?;
        to_json(&self.run(&job_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RESUME_COLLECTION;
    use crate::test_support::ScriptedLlm;
    use crate::tools::test_fixtures::fixture;

    #[test]
    fn test_parse_list_from_json_with_preamble() {
        let raw = "Here you go:\n```json\n[\"Explain RAII?\", \"What is Send?\"]\n```";
        assert_eq!(parse_list(raw, 5), vec!["Explain RAII?", "What is Send?"]);
    }

    #[test]
    fn test_parse_list_line_fallback() {
        let raw = "1 question\n- \"Second one\"\n\n* Third\n• Fourth";
        assert_eq!(
            parse_list(raw, 3),
            vec!["1 question", "Second one", "Third"]
        );
    }

    #[test]
    fn test_parse_list_broken_json_uses_lines() {
        let raw = "[\"unterminated, \"x\"]";
        assert_eq!(parse_list(raw, 5).len(), 1);
    }

    #[tokio::test]
    async fn test_plan_focus_areas_and_questions() {
        // job retrieval, resume retrieval, then the three lists
        let llm = ScriptedLlm::new()
            .complete_with("Needs Kafka and Spark.")
            .complete_with("Built Python pipelines.")
            .complete_with("[\"t1\",\"t2\",\"t3\",\"t4\",\"t5\"]")
            .complete_with("[\"b1\",\"b2\",\"b3\",\"b4\",\"b5\"]")
            .complete_with("- s1\n- s2\n- s3\n- s4");
        let fx = fixture(llm);
        fx.store.insert_text(RESUME_COLLECTION, "Python").await;
        fx.store.insert_text("job_4", "Python, Kafka and Spark").await;

        let plan = InterviewPlanTool::new(fx.ctx).run("4").await.unwrap().ready().unwrap();
        assert_eq!(plan.focus_areas, vec!["kafka", "spark"]);
        assert_eq!(plan.technical_questions.len(), 5);
        assert_eq!(plan.behavioral_questions[0], "b1");
        assert_eq!(plan.storytelling_suggestions, vec!["s1", "s2", "s3"]);
        assert_eq!(plan.prep_tips, PREP_TIPS);
        assert!(fx.llm.prompts()[2].contains("Skill gaps: kafka, spark"));
    }

    #[tokio::test]
    async fn test_plan_survives_llm_outage() {
        let fx = fixture(ScriptedLlm::new());
        fx.store.insert_text(RESUME_COLLECTION, "Python").await;
        fx.store.insert_text("job_4", "Python and Go").await;

        let plan = InterviewPlanTool::new(fx.ctx).run("4").await.unwrap().ready().unwrap();
        assert_eq!(plan.focus_areas, vec!["go"]);
        assert!(plan.technical_questions.is_empty());
        assert!(plan.storytelling_suggestions.is_empty());
    }
}
