//! Fit Scoring: deterministic skill coverage between a resume and a job.
//!
//! coverage = |resume ∩ job| / |job|, rounded to 4 decimals.
//! No LLM call; every tool that reports a score goes through here so the
//! number is reproducible across tools and requests.

use serde::{Deserialize, Serialize};

use crate::matching::extractor::SkillSet;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Three-way split of two skill sets. All lists are sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// In both the resume and the job.
    pub matched: Vec<String>,
    /// Required by the job, absent from the resume.
    pub missing: Vec<String>,
    /// On the resume but not asked for by the job.
    pub bonus: Vec<String>,
}

/// Score plus gap, computed together by every scoring tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub score: f64,
    pub job_skill_count: usize,
    pub gap: SkillGap,
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Fraction of the job's skills covered by the resume. 0.0 when the job lists none.
pub fn coverage_score(resume_skills: &SkillSet, job_skills: &SkillSet) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let matched = job_skills.intersection(resume_skills).count();
    round4(matched as f64 / job_skills.len() as f64)
}

pub fn skill_gap(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillGap {
    SkillGap {
        matched: resume_skills.intersection(job_skills).cloned().collect(),
        missing: job_skills.difference(resume_skills).cloned().collect(),
        bonus: resume_skills.difference(job_skills).cloned().collect(),
    }
}

pub fn assess(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillAssessment {
    SkillAssessment {
        score: coverage_score(resume_skills, job_skills),
        job_skill_count: job_skills.len(),
        gap: skill_gap(resume_skills, job_skills),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::extractor::extract_skills;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn union(a: &[String], b: &[String]) -> SkillSet {
        a.iter().chain(b.iter()).cloned().collect()
    }

    #[test]
    fn test_identical_sets_score_one() {
        let s = set(&["python", "docker", "rust"]);
        assert_eq!(coverage_score(&s, &s), 1.0);
    }

    #[test]
    fn test_disjoint_sets_score_zero() {
        assert_eq!(coverage_score(&set(&["java"]), &set(&["python", "rust"])), 0.0);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        assert_eq!(coverage_score(&set(&[]), &set(&["python"])), 0.0);
    }

    #[test]
    fn test_empty_job_scores_zero_regardless_of_resume() {
        assert_eq!(coverage_score(&set(&["python", "docker"]), &set(&[])), 0.0);
        assert_eq!(coverage_score(&set(&[]), &set(&[])), 0.0);
    }

    #[test]
    fn test_score_rounded_to_four_decimals() {
        let score = coverage_score(&set(&["a"]), &set(&["a", "b", "c"]));
        assert_eq!(score, 0.3333);
    }

    #[test]
    fn test_partial_overlap_from_extracted_text() {
        let resume = extract_skills("Python, PyTorch, Docker");
        let job = extract_skills("We need Python, PyTorch, Kubernetes and Docker.");
        let assessment = assess(&resume, &job);
        assert_eq!(assessment.score, 0.75);
        assert_eq!(assessment.job_skill_count, 4);
        assert_eq!(assessment.gap.matched, vec!["docker", "python", "pytorch"]);
        assert_eq!(assessment.gap.missing, vec!["kubernetes"]);
        assert!(assessment.gap.bonus.is_empty());
    }

    #[test]
    fn test_gap_partitions_hold() {
        let cases = [
            (set(&["python", "docker", "sql"]), set(&["python", "kubernetes"])),
            (set(&[]), set(&["python"])),
            (set(&["rust"]), set(&[])),
            (set(&["a", "b"]), set(&["a", "b"])),
        ];
        for (resume, job) in cases {
            let gap = skill_gap(&resume, &job);
            assert_eq!(union(&gap.matched, &gap.missing), job);
            assert_eq!(union(&gap.matched, &gap.bonus), resume);
            let expected: BTreeSet<String> = resume.intersection(&job).cloned().collect();
            assert_eq!(gap.matched.iter().cloned().collect::<BTreeSet<_>>(), expected);
        }
    }

    #[test]
    fn test_gap_lists_sorted() {
        let gap = skill_gap(&set(&["zeta", "alpha", "mid"]), &set(&["mid", "beta", "omega"]));
        assert_eq!(gap.missing, vec!["beta", "omega"]);
        assert_eq!(gap.bonus, vec!["alpha", "zeta"]);
    }
}
