//! fit_score: deterministic skill coverage of one job by the resume. No LLM.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::schemas::FitScore;
use super::{
    job_id_arg, job_id_schema, load_resume_and_job, to_json, Tool, ToolContext, ToolError,
    ToolOutcome,
};
use crate::matching::{assess, extract_skills};

pub struct FitScoreTool {
    ctx: ToolContext,
}

impl FitScoreTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, job_id: &str) -> Result<ToolOutcome<FitScore>, ToolError> {
        let docs = match load_resume_and_job(self.ctx.store.as_ref(), job_id).await? {
            ToolOutcome::Ready(docs) => docs,
            ToolOutcome::Missing { error } => return Ok(ToolOutcome::Missing { error }),
        };

        let assessment = assess(
            &extract_skills(&docs.resume_text),
            &extract_skills(&docs.job_text),
        );
        let matched = assessment.gap.matched;

        info!(
            "Fit score for job {job_id}: {:.3} ({}/{} skills)",
            assessment.score,
            matched.len(),
            assessment.job_skill_count
        );
        Ok(ToolOutcome::Ready(FitScore {
            job_id: job_id.to_string(),
            score: assessment.score,
            matched_count: matched.len(),
            matched_skills: matched,
            total_job_skills: assessment.job_skill_count,
        }))
    }
}

#[async_trait]
impl Tool for FitScoreTool {
    fn name(&self) -> &'static str {
        "fit_score"
    }

    fn description(&self) -> &'static str {
        "Compute a deterministic skill-coverage fit score (0.0-1.0) between the candidate's \
         resume and a specific job. Higher means better fit. Use this when the user asks for \
         a score, rating, or percentage match."
    }

    fn parameters_schema(&self) -> Value {
        job_id_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let job_id = job_id_arg(self.name(), &arguments)?;
        to_json(&self.run(&job_id).await?)
    }
}
