//! Job Parser: turns captured page markup into a structured `JobPosting`.
//!
//! Never fails: when the model call errors or returns nothing usable, the
//! capture-time heuristic record (or the unknown-job placeholder) is returned.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Deserialize;
use tracing::warn;

use crate::capture::extractor::{body_text, truncate_chars};
use crate::llm_client::json_extract::parse_model_json;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::job::{BasicJobData, JobPosting, NOT_SPECIFIED};
use crate::tailoring::prompts::JOB_PARSE_PROMPT_TEMPLATE;

/// Page text budget for the parse prompt, in characters.
pub const MAX_PAGE_CHARS: usize = 15_000;

/// Raw model output. Every field is optional so partial answers still count.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParsedJob {
    title: String,
    company: String,
    location: String,
    description: String,
    requirements: Vec<String>,
    skills: Vec<String>,
}

pub async fn parse_job_posting(
    generator: &dyn TextGenerator,
    url: &str,
    html: &str,
    basic: Option<&BasicJobData>,
) -> JobPosting {
    let page_text = page_text_for_prompt(html);
    let prompt = JOB_PARSE_PROMPT_TEMPLATE
        .replace("{url}", url)
        .replace("{page_text}", &page_text);

    match generator.generate(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(text) => job_posting_from_response(&text, basic, Utc::now()),
        Err(e) => {
            warn!("Job parsing call failed, using heuristic record: {e}");
            fallback_job(basic, Utc::now())
        }
    }
}

/// Builds a `JobPosting` from model output. Blank model fields are filled from the
/// heuristic record; unparseable output yields the fallback record.
pub fn job_posting_from_response(
    text: &str,
    basic: Option<&BasicJobData>,
    extracted_at: DateTime<Utc>,
) -> JobPosting {
    let Some(parsed) = parse_model_json::<ParsedJob>(text) else {
        warn!("Job parsing response had no usable JSON, using heuristic record");
        return fallback_job(basic, extracted_at);
    };

    let fallback = fallback_job(basic, extracted_at);
    JobPosting {
        title: non_blank(parsed.title).unwrap_or(fallback.title),
        company: non_blank(parsed.company).unwrap_or(fallback.company),
        location: non_blank(parsed.location).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        description: non_blank(parsed.description).unwrap_or(fallback.description),
        requirements: clean_list(parsed.requirements),
        skills: clean_list(parsed.skills),
        extracted_at,
    }
}

fn fallback_job(basic: Option<&BasicJobData>, extracted_at: DateTime<Utc>) -> JobPosting {
    match basic {
        Some(basic) => JobPosting::from_basic(basic, extracted_at),
        None => JobPosting::unknown(extracted_at),
    }
}

fn page_text_for_prompt(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = body_text(&document).unwrap_or_default();
    truncate_chars(&text, MAX_PAGE_CHARS)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|o| o.eq_ignore_ascii_case(item)) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::models::job::{UNKNOWN_COMPANY, UNKNOWN_TITLE};

    fn heuristic() -> BasicJobData {
        BasicJobData {
            title: "Senior React Developer".to_string(),
            company: "Tech Corp".to_string(),
            description: "Build React apps".to_string(),
            url: "https://jobs.example.com/1".to_string(),
        }
    }

    #[test]
    fn test_valid_json_response_yields_that_job() {
        let text = r#"{"title": "Staff Engineer", "company": "Globex", "location": "Remote",
            "description": "Lead platform work", "requirements": ["8+ years"], "skills": ["Rust", "Go"]}"#;
        let job = job_posting_from_response(text, None, Utc::now());
        assert_eq!(job.title, "Staff Engineer");
        assert_eq!(job.company, "Globex");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_json_in_prose_is_extracted() {
        let text = "Here you go:\n{\"title\": \"Data Engineer\", \"company\": \"Initech\"}\nThanks!";
        let job = job_posting_from_response(text, None, Utc::now());
        assert_eq!(job.title, "Data Engineer");
        assert_eq!(job.company, "Initech");
    }

    #[test]
    fn test_no_json_returns_documented_default() {
        let job = job_posting_from_response("I could not find a job here.", None, Utc::now());
        assert_eq!(job.title, UNKNOWN_TITLE);
        assert_eq!(job.company, UNKNOWN_COMPANY);
        assert_eq!(job.location, NOT_SPECIFIED);
        assert!(job.requirements.is_empty());
    }

    #[test]
    fn test_blank_model_fields_are_filled_from_heuristics() {
        let basic = heuristic();
        let text = r#"{"title": "", "company": "  ", "skills": ["React", "react", " "]}"#;
        let job = job_posting_from_response(text, Some(&basic), Utc::now());
        assert_eq!(job.title, "Senior React Developer");
        assert_eq!(job.company, "Tech Corp");
        assert_eq!(job.description, "Build React apps");
        assert_eq!(job.skills, vec!["React"]);
    }

    #[tokio::test]
    async fn test_failed_call_returns_heuristic_record() {
        let generator = ScriptedGenerator::failing();
        let basic = heuristic();
        let job = parse_job_posting(&generator, &basic.url, "<h1>Senior React Developer</h1>", Some(&basic)).await;
        assert_eq!(job.title, "Senior React Developer");
        assert_eq!(job.company, "Tech Corp");
    }

    #[tokio::test]
    async fn test_prompt_carries_visible_text_not_markup() {
        let generator = ScriptedGenerator::replying(&[r#"{"title": "QA Engineer"}"#]);
        let html = "<html><body><script>var secret = 1;</script><h1>QA Engineer</h1></body></html>";
        let job = parse_job_posting(&generator, "https://x.example", html, None).await;
        assert_eq!(job.title, "QA Engineer");

        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("QA Engineer"));
        assert!(prompt.contains("https://x.example"));
        assert!(!prompt.contains("var secret"));
        assert!(!prompt.contains("<h1>"));
    }
}
