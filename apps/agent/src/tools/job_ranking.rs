//! job_ranking_based_on_fit: every job scored against the resume, best first.
//!
//! Scores are deterministic; the only LLM call writes a one-sentence
//! recommendation, which is dropped silently if generation fails.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::prompts::RANKING_SUMMARY_PROMPT;
use super::schemas::{JobComparison, RankedJob};
use super::{
    no_arguments_schema, to_json, Tool, ToolContext, ToolError, ToolOutcome, NO_JOBS,
    RESUME_MISSING,
};
use crate::documents::{job_collection, RESUME_COLLECTION};
use crate::matching::{assess, extract_skills};

const SKILL_LIST_LIMIT: usize = 10;
const SUMMARY_JOB_LIMIT: usize = 5;
const SUMMARY_TITLE_CHARS: usize = 60;

pub struct JobRankingTool {
    ctx: ToolContext,
}

impl JobRankingTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self) -> Result<ToolOutcome<JobComparison>, ToolError> {
        let store = self.ctx.store.as_ref();
        let Some(resume_text) = store.get_full_text(RESUME_COLLECTION).await? else {
            return Ok(ToolOutcome::missing(RESUME_MISSING));
        };
        let job_ids = store.list_job_ids().await?;
        if job_ids.is_empty() {
            return Ok(ToolOutcome::missing(NO_JOBS));
        }

        let resume_skills = extract_skills(&resume_text);
        let mut ranked = Vec::with_capacity(job_ids.len());
        for job_id in job_ids {
            let collection = job_collection(&job_id);
            let Some(job_text) = store.get_full_text(&collection).await? else {
                continue;
            };
            let assessment = assess(&resume_skills, &extract_skills(&job_text));
            let title = store.get_first_line(&collection).await?;
            ranked.push(RankedJob {
                title: if title.is_empty() {
                    format!("Job {job_id}")
                } else {
                    title
                },
                job_id,
                fit_score: assessment.score,
                matched_skills: truncated(assessment.gap.matched),
                missing_skills: truncated(assessment.gap.missing),
            });
        }

        rank(&mut ranked);
        let best_fit_job_id = ranked.first().map(|j| j.job_id.clone());
        let summary = self.summarise(&ranked).await;

        info!(
            "Ranked {} jobs, best fit: {:?} ({:.3})",
            ranked.len(),
            best_fit_job_id,
            ranked.first().map_or(0.0, |j| j.fit_score)
        );
        Ok(ToolOutcome::Ready(JobComparison {
            ranked_jobs: ranked,
            best_fit_job_id,
            summary,
        }))
    }

    async fn summarise(&self, ranked: &[RankedJob]) -> Option<String> {
        if ranked.is_empty() {
            return None;
        }
        let ranking = ranked
            .iter()
            .take(SUMMARY_JOB_LIMIT)
            .enumerate()
            .map(|(i, job)| {
                let title: String = job.title.chars().take(SUMMARY_TITLE_CHARS).collect();
                format!("  {}. {} (score {:.0}%)", i + 1, title, job.fit_score * 100.0)
            })
            .collect::<Vec<_>>()
            .join("\n");
        match self
            .ctx
            .llm
            .complete(&RANKING_SUMMARY_PROMPT.replace("{ranking}", &ranking))
            .await
        {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!("Ranking summary generation failed: {e}");
                None
            }
        }
    }
}

/// Descending by score. `sort_by` is stable, so ties keep discovery order.
pub fn rank(jobs: &mut [RankedJob]) {
    jobs.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));
}

fn truncated(mut skills: Vec<String>) -> Vec<String> {
    skills.truncate(SKILL_LIST_LIMIT);
    skills
}

#[async_trait]
impl Tool for JobRankingTool {
    fn name(&self) -> &'static str {
        "job_ranking_based_on_fit"
    }

    fn description(&self) -> &'static str {
        "Compare ALL uploaded job descriptions against the resume and rank them by fit \
         score (0.0-1.0, higher is better). Use this when the user asks which job fits \
         best, wants a ranking, or asks to compare all jobs."
    }

    fn parameters_schema(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _arguments: Value) -> Result<Value, ToolError> {
        to_json(&self.run().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedLlm;
    use crate::tools::test_fixtures::fixture;

    fn job(id: &str, score: f64) -> RankedJob {
        RankedJob {
            job_id: id.into(),
            title: String::new(),
            fit_score: score,
            matched_skills: vec![],
            missing_skills: vec![],
        }
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut jobs = vec![job("a", 0.5), job("b", 0.9), job("c", 0.5), job("d", 0.9)];
        rank(&mut jobs);
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn test_ranks_all_jobs_with_summary() {
        let fx = fixture(ScriptedLlm::new().complete_with("Prioritise the Python role."));
        fx.store.insert_text(RESUME_COLLECTION, "Python and Docker").await;
        fx.store.insert_text("job_1", "Scala engineer. Kafka").await;
        fx.store.insert_text("job_2", "Python engineer. Docker").await;
        fx.store.insert_text("job_3", "Java engineer. Spark").await;

        let comparison = JobRankingTool::new(fx.ctx).run().await.unwrap().ready().unwrap();
        let ids: Vec<&str> = comparison
            .ranked_jobs
            .iter()
            .map(|j| j.job_id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(comparison.best_fit_job_id.as_deref(), Some("2"));
        assert_eq!(comparison.ranked_jobs[0].title, "Python engineer");
        assert_eq!(comparison.summary.as_deref(), Some("Prioritise the Python role."));
        assert!(fx.llm.prompts()[0].contains("1. Python engineer (score 100%)"));
    }

    #[tokio::test]
    async fn test_summary_omitted_when_llm_fails() {
        let fx = fixture(ScriptedLlm::new().complete_fails());
        fx.store.insert_text(RESUME_COLLECTION, "Python").await;
        fx.store.insert_text("job_1", "Python engineer").await;

        let value = JobRankingTool::new(fx.ctx).execute(Value::Null).await.unwrap();
        assert!(value.get("summary").is_none());
        assert_eq!(value["best_fit_job_id"], "1");
    }

    #[tokio::test]
    async fn test_preconditions() {
        let fx = fixture(ScriptedLlm::new());
        let tool = JobRankingTool::new(fx.ctx.clone());
        assert_eq!(tool.run().await.unwrap(), ToolOutcome::missing(RESUME_MISSING));

        fx.store.insert_text(RESUME_COLLECTION, "Python").await;
        assert_eq!(tool.run().await.unwrap(), ToolOutcome::missing(NO_JOBS));
    }
}
