//! resume_summary: detected skills split into skills vs technologies, plus
//! retrieved experience/education bullets and a grounded narrative.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::prompts::{
    RESUME_EDUCATION_QUESTION, RESUME_EXPERIENCE_QUESTION, RESUME_NARRATIVE_PROMPT,
};
use super::schemas::ResumeSummary;
use super::{
    bullet_lines, no_arguments_schema, to_json, truncate_chars, Tool, ToolContext, ToolError,
    ToolOutcome, RESUME_MISSING,
};
use crate::documents::RESUME_COLLECTION;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::matching::extract_skills;
use crate::matching::vocabulary::TECHNOLOGY_KEYWORDS;

const TOP_K: usize = 5;
const EXPERIENCE_LIMIT: usize = 8;
const EDUCATION_LIMIT: usize = 5;
const PROMPT_SKILL_LIMIT: usize = 25;
const RAW_CONTEXT_CHARS: usize = 2000;
const PROMPT_CONTEXT_CHARS: usize = 1200;

pub struct ResumeSummaryTool {
    ctx: ToolContext,
}

impl ResumeSummaryTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self) -> Result<ToolOutcome<ResumeSummary>, ToolError> {
        let Some(resume_text) = self.ctx.store.get_full_text(RESUME_COLLECTION).await? else {
            return Ok(ToolOutcome::missing(RESUME_MISSING));
        };
        let detected = extract_skills(&resume_text);

        let mut resume_ctx = truncate_chars(&resume_text, RAW_CONTEXT_CHARS);
        let mut experience_highlights = Vec::new();
        let mut education = Vec::new();

        if let Some(handle) = self.ctx.indexes.resume().await {
            match handle.query(RESUME_EXPERIENCE_QUESTION, TOP_K).await {
                Ok(answer) => {
                    experience_highlights = bullet_lines(&answer, EXPERIENCE_LIMIT);
                    resume_ctx = truncate_chars(&answer, 1500);
                }
                Err(e) => warn!("Resume experience retrieval failed: {e}"),
            }
            match handle.query(RESUME_EDUCATION_QUESTION, TOP_K).await {
                Ok(answer) => education = bullet_lines(&answer, EDUCATION_LIMIT),
                Err(e) => warn!("Resume education retrieval failed: {e}"),
            }
        }

        let skill_list = detected
            .iter()
            .take(PROMPT_SKILL_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = RESUME_NARRATIVE_PROMPT
            .replace("{resume_ctx}", &truncate_chars(&resume_ctx, PROMPT_CONTEXT_CHARS))
            .replace("{skills}", &skill_list)
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION);
        let narrative = match self.ctx.llm.complete(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Resume narrative generation failed: {e}");
                String::new()
            }
        };

        let (technologies, skills): (Vec<String>, Vec<String>) = detected
            .into_iter()
            .partition(|s| TECHNOLOGY_KEYWORDS.contains(&s.as_str()));

        info!(
            "Summarised resume: {} skills, {} technologies, {} experience lines",
            skills.len(),
            technologies.len(),
            experience_highlights.len()
        );
        Ok(ToolOutcome::Ready(ResumeSummary {
            skills,
            technologies,
            experience_highlights,
            education,
            narrative,
        }))
    }
}

#[async_trait]
impl Tool for ResumeSummaryTool {
    fn name(&self) -> &'static str {
        "resume_summary"
    }

    fn description(&self) -> &'static str {
        "Provide a structured summary of the uploaded resume including skills, technologies, \
         experience highlights, education, and a narrative overview. Use this when the user \
         asks about their resume, background, or profile."
    }

    fn parameters_schema(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _arguments: Value) -> Result<Value, ToolError> {
        to_json(&self.run().await?)
    }
}
