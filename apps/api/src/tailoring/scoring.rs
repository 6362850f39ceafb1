//! ATS Scoring: pluggable, trait-based scorer for a resume against a job posting.
//!
//! Default: `LlmAtsScorer` (model-judged, falls back to keyword overlap).
//! `KeywordAtsScorer` is pure-Rust, deterministic and used when LLM scoring is off.
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`, chosen at startup via config.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::json_extract::parse_model_json;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::job::{JobPosting, JobRequirements};
use crate::models::resume::ResumeDocument;
use crate::tailoring::job_parser::clean_list;
use crate::tailoring::prompts::SCORE_PROMPT_TEMPLATE;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub score: u8, // 0 – 100
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub scorer_backend: String, // "llm" | "keyword"
}

#[async_trait]
pub trait AtsScorer: Send + Sync {
    /// Never fails; every backend carries its own fallback.
    async fn score(
        &self,
        resume: &ResumeDocument,
        job: &JobPosting,
        requirements: &JobRequirements,
    ) -> AtsScore;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordAtsScorer
// ────────────────────────────────────────────────────────────────────────────

/// Keyword-overlap scorer. No network call.
///
/// Keywords are the union of the extracted keywords, required skills and the
/// posting's skills. score = matched / total × 100, rounded.
pub struct KeywordAtsScorer;

#[async_trait]
impl AtsScorer for KeywordAtsScorer {
    async fn score(
        &self,
        resume: &ResumeDocument,
        job: &JobPosting,
        requirements: &JobRequirements,
    ) -> AtsScore {
        compute_keyword_score(resume, job, requirements)
    }
}

fn compute_keyword_score(
    resume: &ResumeDocument,
    job: &JobPosting,
    requirements: &JobRequirements,
) -> AtsScore {
    let keywords = clean_list(
        requirements
            .keywords
            .iter()
            .chain(&requirements.required_skills)
            .chain(&job.skills)
            .cloned()
            .collect(),
    );

    if keywords.is_empty() {
        return AtsScore {
            score: 0,
            matched_keywords: vec![],
            missing_keywords: vec![],
            suggestions: vec![
                "No keywords found in the job posting, so this resume cannot be scored.".to_string(),
            ],
            scorer_backend: "keyword".to_string(),
        };
    }

    let corpus = resume.searchable_text();
    let (matched, missing): (Vec<String>, Vec<String>) = keywords
        .into_iter()
        .partition(|kw| contains_term(&corpus, &kw.to_lowercase()));

    let total = matched.len() + missing.len();
    let score = ((matched.len() as f64 / total as f64) * 100.0).round() as u8;
    let suggestions = build_suggestions(score, &missing);

    AtsScore {
        score,
        matched_keywords: matched,
        missing_keywords: missing,
        suggestions,
        scorer_backend: "keyword".to_string(),
    }
}

/// Substring match that refuses to match inside a longer word ("java" in "javascript").
fn contains_term(corpus: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    corpus.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before = corpus[..start].chars().next_back();
        let after = corpus[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn build_suggestions(score: u8, missing: &[String]) -> Vec<String> {
    let mut suggestions: Vec<String> = missing
        .iter()
        .take(MAX_SUGGESTIONS - 1)
        .map(|kw| format!("Highlight any experience with {kw}, if you have it."))
        .collect();

    let headline = if score >= 80 {
        "Strong match. Your resume covers the key terms of this posting.".to_string()
    } else if score >= 60 {
        format!("Moderate match ({score}/100). Work the missing keywords into your bullets.")
    } else {
        format!("Low match ({score}/100). Consider whether this role fits before applying.")
    };
    suggestions.insert(0, headline);
    suggestions
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAtsScorer
// ────────────────────────────────────────────────────────────────────────────

/// Model output. The score arrives as any JSON number and is clamped.
#[derive(Debug, Deserialize)]
struct LlmScore {
    score: f64,
    #[serde(default)]
    matched_keywords: Vec<String>,
    #[serde(default)]
    missing_keywords: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Model-judged scorer. Falls back to `KeywordAtsScorer` on any failure.
pub struct LlmAtsScorer(pub Arc<dyn TextGenerator>);

#[async_trait]
impl AtsScorer for LlmAtsScorer {
    async fn score(
        &self,
        resume: &ResumeDocument,
        job: &JobPosting,
        requirements: &JobRequirements,
    ) -> AtsScore {
        let prompt = match build_score_prompt(resume, job) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not serialize scoring input: {e}");
                return compute_keyword_score(resume, job, requirements);
            }
        };

        let text = match self.0.generate(&prompt, JSON_ONLY_SYSTEM).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Scoring call failed, using keyword overlap: {e}");
                return compute_keyword_score(resume, job, requirements);
            }
        };

        match parse_model_json::<LlmScore>(&text) {
            Some(parsed) => AtsScore {
                score: parsed.score.clamp(0.0, 100.0).round() as u8,
                matched_keywords: clean_list(parsed.matched_keywords),
                missing_keywords: clean_list(parsed.missing_keywords),
                suggestions: parsed.suggestions.into_iter().take(MAX_SUGGESTIONS).collect(),
                scorer_backend: "llm".to_string(),
            },
            None => {
                warn!("Scoring response had no usable JSON, using keyword overlap");
                compute_keyword_score(resume, job, requirements)
            }
        }
    }
}

fn build_score_prompt(resume: &ResumeDocument, job: &JobPosting) -> Result<String, serde_json::Error> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let job_json = serde_json::to_string_pretty(job)?;
    Ok(SCORE_PROMPT_TEMPLATE
        .replace("{resume_json}", &resume_json)
        .replace("{job_json}", &job_json))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
