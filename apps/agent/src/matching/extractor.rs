//! Deterministic skill extraction: vocabulary lookup with word-boundary matching.
//!
//! No LLM involved. The compiled matcher is built once per process and shared
//! read-only by every request.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::matching::vocabulary::{is_phrase, SKILLS};

/// Deduplicated, lowercase skill tokens found in one document.
/// Ordered so that derived lists come out sorted.
pub type SkillSet = BTreeSet<String>;

struct SkillMatcher {
    phrases: Vec<(&'static str, Regex)>,
    terms: Vec<(&'static str, Regex)>,
}

static MATCHER: OnceLock<SkillMatcher> = OnceLock::new();

fn matcher() -> &'static SkillMatcher {
    MATCHER.get_or_init(|| {
        let (phrases, terms): (Vec<_>, Vec<_>) = SKILLS
            .iter()
            .filter_map(|skill| boundary_pattern(skill).map(|re| (*skill, re)))
            .partition(|(skill, _)| is_phrase(skill));
        SkillMatcher { phrases, terms }
    })
}

/// Case-insensitive match bounded by non-word characters or the text edges.
///
/// `\b` is not used because entries like "c++" and "c#" end in non-word
/// characters, where `\b` would demand a following letter.
fn boundary_pattern(skill: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(skill))).ok()
}

/// Returns the set of vocabulary skills present in `text`.
pub fn extract_skills(text: &str) -> SkillSet {
    // PDF extraction leaves phrases split across lines ("machine\n \nlearning").
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let matcher = matcher();

    let mut found = SkillSet::new();
    for (skill, pattern) in matcher.phrases.iter().chain(matcher.terms.iter()) {
        if pattern.is_match(&text) {
            found.insert(skill.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_vocabulary_entry_compiles() {
        let m = matcher();
        assert_eq!(m.phrases.len() + m.terms.len(), SKILLS.len());
    }

    #[test]
    fn test_case_insensitive_terms() {
        let skills = extract_skills("Python, PyTorch, Docker");
        assert_eq!(skills, set(&["docker", "python", "pytorch"]));
    }

    #[test]
    fn test_phrase_split_across_lines_is_found() {
        let skills = extract_skills("Worked on machine\n \nlearning pipelines");
        assert!(skills.contains("machine learning"));
    }

    #[test]
    fn test_word_boundaries_respected() {
        // "rust" inside "trusted" and "java" inside "javascript" must not match.
        let skills = extract_skills("A trusted javascript developer");
        assert!(!skills.contains("rust"));
        assert!(!skills.contains("java"));
        assert!(skills.contains("javascript"));
    }

    #[test]
    fn test_symbol_terminated_terms() {
        let skills = extract_skills("Modern C++ and C# services, CI/CD on GitHub Actions.");
        assert!(skills.contains("c++"));
        assert!(skills.contains("c#"));
        assert!(skills.contains("ci/cd"));
        assert!(skills.contains("github actions"));
    }

    #[test]
    fn test_phrase_and_member_terms_both_reported() {
        let skills = extract_skills("Deep learning with transformer models");
        assert!(skills.contains("deep learning"));
        assert!(skills.contains("transformer"));
    }

    #[test]
    fn test_sentence_order_does_not_change_result() {
        let a = "Built Kubernetes clusters. Trained PyTorch models. Led a team with mentoring.";
        let b = "Led a team with mentoring. Built Kubernetes clusters. Trained PyTorch models.";
        let c = "Trained PyTorch models. Led a team with mentoring. Built Kubernetes clusters.";
        assert_eq!(extract_skills(a), extract_skills(b));
        assert_eq!(extract_skills(b), extract_skills(c));
        assert_eq!(extract_skills(a), set(&["kubernetes", "mentoring", "pytorch"]));
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("   \n\t ").is_empty());
    }
}
