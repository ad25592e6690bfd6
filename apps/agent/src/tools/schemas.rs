// Output payloads of the analysis tools.
// Immutable once produced; serialised straight into the reasoning loop's observations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub job_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub count: usize,
    pub jobs: Vec<JobEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub job_id: String,
    /// Fraction of the job's skills covered by the resume, 0.0–1.0.
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub total_job_skills: usize,
    pub matched_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub job_id: String,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub bonus_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitAnalysis {
    pub job_id: String,
    pub fit_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume_highlights: String,
    pub job_requirements_summary: String,
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    pub job_id: String,
    pub title: String,
    pub fit_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobComparison {
    pub ranked_jobs: Vec<RankedJob>,
    pub best_fit_job_id: Option<String>,
    /// One-sentence recommendation; absent when generation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewPlan {
    pub job_id: String,
    pub focus_areas: Vec<String>,
    pub technical_questions: Vec<String>,
    pub behavioral_questions: Vec<String>,
    pub storytelling_suggestions: Vec<String>,
    pub prep_tips: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub skills: Vec<String>,
    pub technologies: Vec<String>,
    pub experience_highlights: Vec<String>,
    pub education: Vec<String>,
    pub narrative: String,
}
