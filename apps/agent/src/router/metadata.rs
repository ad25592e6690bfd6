//! Metadata fast path: answers "what is uploaded" questions straight from the
//! document store with substring keyword heuristics. Zero LLM calls.

use crate::documents::{job_collection, DocumentStore, StoreError, RESUME_COLLECTION};

const LISTING_KEYWORDS: &[&str] = &["list job", "show job", "what job", "which job", "uploaded job"];
const COUNT_KEYWORDS: &[&str] = &["how many", "count", "number of"];
const RESUME_STATUS_KEYWORDS: &[&str] = &["which", "active", "current", "uploaded"];

pub async fn answer_metadata_query(
    query: &str,
    store: &dyn DocumentStore,
) -> Result<String, StoreError> {
    let job_ids = store.list_job_ids().await?;
    let resume_exists = store.collection_exists(RESUME_COLLECTION).await?;
    let query = query.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|kw| query.contains(kw));

    if mentions(LISTING_KEYWORDS) {
        if job_ids.is_empty() {
            return Ok("No job descriptions have been uploaded yet.".to_string());
        }
        let mut lines = vec![format!("**{} job description(s) uploaded:**", job_ids.len())];
        for job_id in &job_ids {
            let title = title_or_placeholder(store, job_id).await?;
            lines.push(format!("• **{title}** (id: `{job_id}`)"));
        }
        return Ok(lines.join("\n"));
    }

    if mentions(COUNT_KEYWORDS) {
        let resume_line = if resume_exists {
            "**1** resume uploaded (active)"
        } else {
            "**No** resume uploaded yet"
        };
        return Ok(format!(
            "• **{}** job description(s) uploaded\n• {resume_line}",
            job_ids.len()
        ));
    }

    if query.contains("resume") && mentions(RESUME_STATUS_KEYWORDS) {
        return Ok(if resume_exists {
            "A resume is currently uploaded and active.".to_string()
        } else {
            "No resume has been uploaded yet. Please upload a resume to begin analysis."
                .to_string()
        });
    }

    let mut lines = vec![
        "**Uploaded documents:**".to_string(),
        format!(
            "• Resume: {}",
            if resume_exists {
                "uploaded (active)"
            } else {
                "not uploaded"
            }
        ),
        format!("• Job descriptions: **{}**", job_ids.len()),
    ];
    for job_id in &job_ids {
        let title = title_or_placeholder(store, job_id).await?;
        lines.push(format!("  — {title} (id: `{job_id}`)"));
    }
    Ok(lines.join("\n"))
}

async fn title_or_placeholder(store: &dyn DocumentStore, job_id: &str) -> Result<String, StoreError> {
    let title = store.get_first_line(&job_collection(job_id)).await?;
    Ok(if title.is_empty() {
        format!("Job {job_id}")
    } else {
        title
    })
}
