//! skill_gap_analysis: missing, matching and bonus skills for one job. No LLM.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::schemas::SkillGapReport;
use super::{
    job_id_arg, job_id_schema, load_resume_and_job, to_json, Tool, ToolContext, ToolError,
    ToolOutcome,
};
use crate::matching::extract_skills;
use crate::matching::fit_scoring::skill_gap;

pub struct SkillGapTool {
    ctx: ToolContext,
}

impl SkillGapTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, job_id: &str) -> Result<ToolOutcome<SkillGapReport>, ToolError> {
        let docs = match load_resume_and_job(self.ctx.store.as_ref(), job_id).await? {
            ToolOutcome::Ready(docs) => docs,
            ToolOutcome::Missing { error } => return Ok(ToolOutcome::Missing { error }),
        };

        let gap = skill_gap(
            &extract_skills(&docs.resume_text),
            &extract_skills(&docs.job_text),
        );
        info!(
            "Skill gap for job {job_id}: {} missing, {} matching, {} bonus",
            gap.missing.len(),
            gap.matched.len(),
            gap.bonus.len()
        );
        Ok(ToolOutcome::Ready(SkillGapReport {
            job_id: job_id.to_string(),
            missing_skills: gap.missing,
            matching_skills: gap.matched,
            bonus_skills: gap.bonus,
        }))
    }
}

#[async_trait]
impl Tool for SkillGapTool {
    fn name(&self) -> &'static str {
        "skill_gap_analysis"
    }

    fn description(&self) -> &'static str {
        "List the skill gaps between the candidate's resume and a specific job. Returns \
         missing skills (gaps to address), matching skills (strengths), and bonus skills \
         (extras not required). Use this when the user asks what skills they are missing."
    }

    fn parameters_schema(&self) -> Value {
        job_id_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let job_id = job_id_arg(self.name(), &arguments)?;
        to_json(&self.run(&job_id).await?)
    }
}
