// Skill Matching Engine: vocabulary, extraction and coverage scoring.
// Pure functions only: no I/O, no LLM calls.

pub mod extractor;
pub mod fit_scoring;
pub mod vocabulary;

pub use extractor::extract_skills;
pub use fit_scoring::assess;
