// LLM prompt templates for job parsing, requirement extraction, tailoring and scoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Job page parsing prompt. Replace `{url}` and `{page_text}` before sending.
pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"Extract the job posting from the following web page text.

Return a JSON object with this EXACT schema:
{
  "title": "Senior React Developer",
  "company": "Tech Corp",
  "location": "Remote (US)",
  "description": "Full job description, responsibilities and qualifications as plain text",
  "requirements": ["5+ years of professional React experience"],
  "skills": ["React", "TypeScript"]
}

Rules:
- Ignore navigation, footers, cookie banners and unrelated listings.
- Use an empty string for any field not present on the page. Do NOT guess.
- "requirements" lists qualifications verbatim or lightly condensed.
- "skills" lists concrete technologies, tools and competencies only.

PAGE URL: {url}

PAGE TEXT:
{page_text}"#;

/// Requirement extraction prompt. Replace `{title}` and `{description}`.
pub const REQUIREMENTS_PROMPT_TEMPLATE: &str = r#"Analyze this job description and extract structured requirements.

Return a JSON object with this EXACT schema:
{
  "required_skills": ["React"],
  "preferred_skills": ["GraphQL"],
  "responsibilities": ["Own the component library"],
  "keywords": ["React", "component library", "accessibility"],
  "experience_level": "5+ years"
}

REQUIRED: explicit must-haves ("required", "must have", minimum years).
PREFERRED: nice-to-haves ("preferred", "bonus", "a plus").
KEYWORDS: terms an applicant tracking system would match on, most important first.
EXPERIENCE LEVEL: a short phrase such as "5+ years", "Senior", or "Not specified".

JOB TITLE: {title}

JOB DESCRIPTION:
{description}"#;

/// Resume tailoring prompt.
/// Replace: {grounding_instruction}, {resume_json}, {job_json}, {requirements_json}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Tailor the resume below to the target job.

RESUME:
{resume_json}

TARGET JOB:
{job_json}

EXTRACTED REQUIREMENTS:
{requirements_json}

Return a JSON object with this EXACT schema:
{
  "summary": "Rewritten professional summary, 2-3 sentences",
  "experience": [
    {"index": 0, "bullets": ["Rewritten bullet", "Rewritten bullet"]}
  ],
  "skills": ["Most relevant skill first", "..."]
}

HARD RULES:
1. "index" is the zero-based position of the role in the resume's experience list
2. Keep the number of bullets per role the same or fewer
3. "skills" is a REORDERING of the resume's existing skills, most relevant first — add nothing
4. Weave in the job's keywords only where the resume supports them"#;

/// ATS scoring prompt. Replace: {resume_json}, {job_json}
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Act as an applicant tracking system. Score how well this resume matches the job.

RESUME:
{resume_json}

JOB:
{job_json}

Return a JSON object with this EXACT schema:
{
  "score": 78,
  "matched_keywords": ["React", "TypeScript"],
  "missing_keywords": ["GraphQL"],
  "suggestions": ["Mention GraphQL experience if you have it"]
}

"score" is an integer from 0 to 100. Give at most 5 suggestions."#;
