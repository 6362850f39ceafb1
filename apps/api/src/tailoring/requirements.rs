//! Requirement extraction: structured requirements from a free-text job description.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::llm_client::json_extract::parse_model_json;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::job::{JobPosting, JobRequirements, NOT_SPECIFIED};
use crate::tailoring::job_parser::clean_list;
use crate::tailoring::prompts::REQUIREMENTS_PROMPT_TEMPLATE;

const MAX_RESPONSIBILITIES: usize = 10;

/// Never fails: falls back to [`heuristic_requirements`] on any error.
pub async fn extract_requirements(
    generator: &dyn TextGenerator,
    job: &JobPosting,
) -> JobRequirements {
    let prompt = REQUIREMENTS_PROMPT_TEMPLATE
        .replace("{title}", &job.title)
        .replace("{description}", &job.description);

    let text = match generator.generate(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Requirement extraction call failed, using heuristics: {e}");
            return heuristic_requirements(job);
        }
    };

    match parse_model_json::<JobRequirements>(&text) {
        Some(parsed) => normalize(parsed, job),
        None => {
            warn!("Requirement extraction response had no usable JSON, using heuristics");
            heuristic_requirements(job)
        }
    }
}

fn normalize(parsed: JobRequirements, job: &JobPosting) -> JobRequirements {
    let mut keywords = clean_list(parsed.keywords);
    if keywords.is_empty() {
        keywords = clean_list(job.skills.clone());
    }
    JobRequirements {
        required_skills: clean_list(parsed.required_skills),
        preferred_skills: clean_list(parsed.preferred_skills),
        responsibilities: clean_list(parsed.responsibilities),
        keywords,
        experience_level: if parsed.experience_level.trim().is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            parsed.experience_level.trim().to_string()
        },
    }
}

fn bullet_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:[-*•·▪]|\d+[.)])\s+(.{4,}?)\s*$").expect("valid bullet regex")
    })
}

fn years_phrase() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:-\s*\d{1,2}\s*)?years?").expect("valid years regex")
    })
}

fn preferred_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(preferred|nice to have|bonus|a plus|desirable)\b")
            .expect("valid preference regex")
    })
}

/// Deterministic extraction used when the model is unavailable.
///
/// Skills come from the posting's own skill list; bullet lines of the description
/// become responsibilities, or preferred skills when they read as nice-to-haves.
pub fn heuristic_requirements(job: &JobPosting) -> JobRequirements {
    let mut responsibilities = Vec::new();
    let mut preferred_lines = Vec::new();

    for caps in bullet_line().captures_iter(&job.description) {
        let line = caps[1].trim().to_string();
        if preferred_marker().is_match(&line) {
            preferred_lines.push(line);
        } else if responsibilities.len() < MAX_RESPONSIBILITIES {
            responsibilities.push(line);
        }
    }

    let (preferred_skills, required_skills): (Vec<String>, Vec<String>) =
        job.skills.iter().cloned().partition(|skill| {
            preferred_lines
                .iter()
                .any(|line| line.to_lowercase().contains(&skill.to_lowercase()))
        });

    let experience_level = job
        .requirements
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(job.description.as_str()))
        .find_map(|text| years_phrase().captures(text).map(|c| format!("{}+ years", &c[1])))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    let mut keywords = job.skills.clone();
    keywords.extend(required_skills.iter().cloned());

    JobRequirements {
        required_skills: clean_list(required_skills),
        preferred_skills: clean_list(preferred_skills),
        responsibilities: clean_list(responsibilities),
        keywords: clean_list(keywords),
        experience_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use chrono::Utc;

    fn job() -> JobPosting {
        JobPosting {
            title: "Senior React Developer".to_string(),
            company: "Tech Corp".to_string(),
            location: "Remote".to_string(),
            description: "About the role\n\
                - Build and own our React component library\n\
                - Partner with design on accessibility\n\
                * GraphQL experience is a plus\n\
                Requirements: 5+ years of frontend experience."
                .to_string(),
            requirements: vec![],
            skills: vec!["React".to_string(), "TypeScript".to_string(), "GraphQL".to_string()],
            extracted_at: Utc::now(),
        }
    }

    #[test]
    fn test_heuristics_split_bullets() {
        let reqs = heuristic_requirements(&job());
        assert_eq!(
            reqs.responsibilities,
            vec![
                "Build and own our React component library",
                "Partner with design on accessibility"
            ]
        );
        assert_eq!(reqs.preferred_skills, vec!["GraphQL"]);
        assert_eq!(reqs.required_skills, vec!["React", "TypeScript"]);
        assert_eq!(reqs.experience_level, "5+ years");
        assert!(reqs.keywords.contains(&"React".to_string()));
    }

    #[test]
    fn test_heuristics_without_years_is_not_specified() {
        let mut job = job();
        job.description = "Great team.".to_string();
        let reqs = heuristic_requirements(&job);
        assert_eq!(reqs.experience_level, NOT_SPECIFIED);
        assert!(reqs.responsibilities.is_empty());
    }

    #[tokio::test]
    async fn test_model_requirements_are_used_when_valid() {
        let generator = ScriptedGenerator::replying(&[r#"Result:
            {"required_skills": ["React"], "preferred_skills": [], "responsibilities": ["Ship"],
             "keywords": ["React", "a11y"], "experience_level": "Senior"}"#]);
        let reqs = extract_requirements(&generator, &job()).await;
        assert_eq!(reqs.required_skills, vec!["React"]);
        assert_eq!(reqs.keywords, vec!["React", "a11y"]);
        assert_eq!(reqs.experience_level, "Senior");
    }

    #[tokio::test]
    async fn test_empty_model_keywords_fall_back_to_job_skills() {
        let generator = ScriptedGenerator::replying(&[r#"{"required_skills": ["React"]}"#]);
        let reqs = extract_requirements(&generator, &job()).await;
        assert_eq!(reqs.keywords, vec!["React", "TypeScript", "GraphQL"]);
        assert_eq!(reqs.experience_level, NOT_SPECIFIED);
    }

    #[tokio::test]
    async fn test_failed_call_uses_heuristics() {
        let generator = ScriptedGenerator::failing();
        let reqs = extract_requirements(&generator, &job()).await;
        assert_eq!(reqs, heuristic_requirements(&job()));
    }
}
