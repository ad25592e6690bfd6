//! list_jobs: every uploaded job with a short title. Needs no resume.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::schemas::{JobEntry, JobListing};
use super::{no_arguments_schema, to_json, Tool, ToolContext, ToolError, ToolOutcome, NO_JOBS};
use crate::documents::job_collection;

pub struct ListJobsTool {
    ctx: ToolContext,
}

impl ListJobsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self) -> Result<ToolOutcome<JobListing>, ToolError> {
        let job_ids = self.ctx.store.list_job_ids().await?;
        if job_ids.is_empty() {
            return Ok(ToolOutcome::Ready(JobListing {
                count: 0,
                jobs: Vec::new(),
                message: Some(NO_JOBS.to_string()),
            }));
        }

        let mut jobs = Vec::with_capacity(job_ids.len());
        for job_id in job_ids {
            let title = self.ctx.store.get_first_line(&job_collection(&job_id)).await?;
            let title = if title.is_empty() {
                format!("Job {job_id}")
            } else {
                title
            };
            jobs.push(JobEntry { job_id, title });
        }

        info!("Listed {} jobs", jobs.len());
        Ok(ToolOutcome::Ready(JobListing {
            count: jobs.len(),
            jobs,
            message: None,
        }))
    }
}

#[async_trait]
impl Tool for ListJobsTool {
    fn name(&self) -> &'static str {
        "list_jobs"
    }

    fn description(&self) -> &'static str {
        "List all uploaded job descriptions with their IDs and titles. Use this when the \
         user asks how many jobs are uploaded, wants to see the list of jobs, or asks \
         'what jobs do I have?'. Does not require a resume."
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
    use crate::tools::test_fixtures::fixture;
    use crate::test_support::ScriptedLlm;

    #[tokio::test]
    async fn test_lists_jobs_with_titles() {
        let fx = fixture(ScriptedLlm::new());
        fx.store
            .insert_text("job_b", "Staff Data Engineer. Remote.\n\nRequirements: Spark")
            .await;
        fx.store.insert_text("job_a", "ML Engineer at Acme. Hybrid.").await;

        let listing = ListJobsTool::new(fx.ctx).run().await.unwrap().ready().unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(
            listing.jobs,
            vec![
                JobEntry {
                    job_id: "a".into(),
                    title: "ML Engineer at Acme".into()
                },
                JobEntry {
                    job_id: "b".into(),
                    title: "Staff Data Engineer".into()
                },
            ]
        );
        assert_eq!(listing.message, None);
    }

    #[tokio::test]
    async fn test_untitled_job_gets_placeholder() {
        let fx = fixture(ScriptedLlm::new());
        fx.store.insert_text("job_7", "Hi.").await;
        let listing = ListJobsTool::new(fx.ctx).run().await.unwrap().ready().unwrap();
        assert_eq!(listing.jobs[0].title, "Job 7");
    }

    #[tokio::test]
    async fn test_no_jobs_message() {
        let fx = fixture(ScriptedLlm::new());
        let value = ListJobsTool::new(fx.ctx).execute(Value::Null).await.unwrap();
        assert_eq!(
            value,
            serde_json::json!({"count": 0, "jobs": [], "message": "No job descriptions uploaded yet."})
        );
    }
}
