//! analyze_fit: score and gap computed deterministically, then a grounded
//! LLM narrative that explains (never re-derives) the score.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::prompts::{FIT_NARRATIVE_PROMPT, JOB_REQUIREMENTS_QUESTION, RESUME_SKILLS_QUESTION};
use super::schemas::FitAnalysis;
use super::{
    job_id_arg, job_id_schema, load_resume_and_job, retrieved_context, to_json, truncate_chars,
    Tool, ToolContext, ToolError, ToolOutcome,
};
use crate::matching::{assess, extract_skills};

const TOP_K: usize = 4;
const PROMPT_CONTEXT_CHARS: usize = 1200;
const PROMPT_SKILL_LIMIT: usize = 15;
const HIGHLIGHT_CHARS: usize = 400;
const NARRATIVE_UNAVAILABLE: &str = "Narrative unavailable.";

pub struct AnalyzeFitTool {
    ctx: ToolContext,
}

impl AnalyzeFitTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, job_id: &str) -> Result<ToolOutcome<FitAnalysis>, ToolError> {
        let docs = match load_resume_and_job(self.ctx.store.as_ref(), job_id).await? {
            ToolOutcome::Ready(docs) => docs,
            ToolOutcome::Missing { error } => return Ok(ToolOutcome::Missing { error }),
        };

        let assessment = assess(
            &extract_skills(&docs.resume_text),
            &extract_skills(&docs.job_text),
        );

        let resume_ctx = retrieved_context(
            self.ctx.indexes.resume().await,
            RESUME_SKILLS_QUESTION,
            TOP_K,
            &docs.resume_text,
        )
        .await;
        let job_ctx = retrieved_context(
            self.ctx.indexes.job(job_id).await,
            JOB_REQUIREMENTS_QUESTION,
            TOP_K,
            &docs.job_text,
        )
        .await;

        let prompt = FIT_NARRATIVE_PROMPT
            .replace("{resume_ctx}", &truncate_chars(&resume_ctx, PROMPT_CONTEXT_CHARS))
            .replace("{job_ctx}", &truncate_chars(&job_ctx, PROMPT_CONTEXT_CHARS))
            .replace("{matched}", &skill_list(&assessment.gap.matched))
            .replace("{missing}", &skill_list(&assessment.gap.missing))
            .replace(
                "{score_percent}",
                &format!("{:.0}", assessment.score * 100.0),
            );
        let narrative = match self.ctx.llm.complete(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Fit narrative generation failed for job {job_id}: {e}");
                NARRATIVE_UNAVAILABLE.to_string()
            }
        };

        info!("Analysed fit for job {job_id}: {:.3}", assessment.score);
        Ok(ToolOutcome::Ready(FitAnalysis {
            job_id: job_id.to_string(),
            fit_score: assessment.score,
            matched_skills: assessment.gap.matched,
            missing_skills: assessment.gap.missing,
            resume_highlights: truncate_chars(&resume_ctx, HIGHLIGHT_CHARS),
            job_requirements_summary: truncate_chars(&job_ctx, HIGHLIGHT_CHARS),
            narrative,
        }))
    }
}

fn skill_list(skills: &[String]) -> String {
    if skills.is_empty() {
        return "none detected".to_string();
    }
    skills
        .iter()
        .take(PROMPT_SKILL_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl Tool for AnalyzeFitTool {
    fn name(&self) -> &'static str {
        "analyze_fit"
    }

    fn description(&self) -> &'static str {
        "Perform a comprehensive fit analysis between the resume and a specific job. \
         Returns matched skills, missing skills, fit score, and a grounded narrative. \
         Use this when the user asks how well they fit a job or wants a full analysis."
    }

    fn parameters_schema(&self) -> Value {
        job_id_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let job_id = job_id_arg(self.name(), &arguments)?;
        to_json(&self.run(&job_id).await?)
    }
}
