// LLM prompt constants for the analysis tools.
// Scores and skill lists are computed before any of these are sent; the model
// only writes prose or question lists around them.

/// Replace `{resume_ctx}`, `{job_ctx}`, `{matched}`, `{missing}`, `{score_percent}`.
pub const FIT_NARRATIVE_PROMPT: &str = "You are a career analyst. Based only on the context below, write a concise 3-4 sentence
narrative explaining how well the candidate fits this job.
Be specific: cite actual skills and experience. Do not invent anything.
The fit score is already computed; do not recalculate or contradict it.

Resume context:
{resume_ctx}

Job context:
{job_ctx}

Matched skills: {matched}
Missing skills: {missing}
Fit score: {score_percent}%

Write the narrative now:";

/// Replace `{ranking}`.
pub const RANKING_SUMMARY_PROMPT: &str = "Based on these fit scores (higher is better), write one sentence \
recommending which job the candidate should prioritise and why:
{ranking}";

/// Replace `{job_ctx}`, `{gaps}`.
pub const TECHNICAL_QUESTIONS_PROMPT: &str = "You are a senior technical interviewer. Based on the job description context and the
candidate's skill gaps listed below, generate exactly 5 likely technical interview
questions. Focus on the gaps, the areas the candidate may be weak in.

Job context: {job_ctx}
Skill gaps: {gaps}

Return ONLY a JSON array of 5 question strings. Example:
[\"Question 1?\", \"Question 2?\", ...]";

/// Replace `{job_ctx}`.
pub const BEHAVIORAL_QUESTIONS_PROMPT: &str = "You are a senior HR interviewer. Based on the job context below, generate exactly
5 likely behavioral interview questions (STAR format) relevant to this role.

Job context: {job_ctx}

Return ONLY a JSON array of 5 question strings.";

/// Replace `{resume_ctx}`, `{job_ctx}`.
pub const STORYTELLING_PROMPT: &str = "You are a career coach. Based on the candidate's resume highlights below,
suggest exactly 3 storytelling angles the candidate should prepare: specific
experiences they should be ready to narrate for this job.

Resume highlights: {resume_ctx}
Job context: {job_ctx}

Return ONLY a JSON array of 3 short suggestion strings.";

/// Replace `{resume_ctx}`, `{skills}`, `{grounding_instruction}`.
pub const RESUME_NARRATIVE_PROMPT: &str = "You are a career analyst. Summarise this candidate's resume.

Resume context:
{resume_ctx}

Detected technologies/skills: {skills}

Write a 3-4 sentence professional narrative summarising their background,
strongest technical areas, and career trajectory. Be specific and factual.
{grounding_instruction}";

pub const PREP_TIPS: &str = "Review the missing skills listed in focus_areas. \
Prepare concrete STAR stories for behavioral questions. \
Brush up on any technical gaps before the interview.";

// Retrieval questions asked of the per-document handles.
pub const RESUME_SKILLS_QUESTION: &str =
    "What are the candidate's main technical skills and work experience?";
pub const JOB_REQUIREMENTS_QUESTION: &str =
    "What are the key required skills and responsibilities for this job?";
pub const JOB_TECHNICAL_QUESTION: &str =
    "What are the key technical requirements and responsibilities?";
pub const RESUME_ACHIEVEMENTS_QUESTION: &str =
    "What are the candidate's most notable technical achievements?";
pub const RESUME_EXPERIENCE_QUESTION: &str =
    "List the candidate's work experience, job titles, companies, and key achievements.";
pub const RESUME_EDUCATION_QUESTION: &str =
    "What degrees, certifications, or educational qualifications does the candidate have?";
