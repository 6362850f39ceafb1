//! Resume tailoring: summary rewrite, per-role bullet rewrites and skill reordering.
//!
//! On any failure the original resume comes back untouched, flagged as a fallback.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::json_extract::parse_model_json;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::models::job::{JobPosting, JobRequirements};
use crate::models::resume::ResumeDocument;
use crate::tailoring::prompts::TAILOR_PROMPT_TEMPLATE;

/// Model output for one tailoring call.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TailoringSuggestions {
    summary: String,
    experience: Vec<RoleRewrite>,
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RoleRewrite {
    index: usize,
    #[serde(default)]
    bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TailorOutcome {
    pub resume: ResumeDocument,
    /// True when the original resume was returned because tailoring failed.
    pub fallback: bool,
}

impl TailorOutcome {
    fn untailored(original: &ResumeDocument) -> Self {
        Self {
            resume: original.clone(),
            fallback: true,
        }
    }
}

pub async fn tailor_resume(
    generator: &dyn TextGenerator,
    original: &ResumeDocument,
    job: &JobPosting,
    requirements: &JobRequirements,
) -> TailorOutcome {
    let prompt = match build_tailor_prompt(original, job, requirements) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("Could not serialize tailoring input: {e}");
            return TailorOutcome::untailored(original);
        }
    };

    let text = match generator.generate(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Tailoring call failed, keeping original resume: {e}");
            return TailorOutcome::untailored(original);
        }
    };

    let Some(suggestions) = parse_model_json::<TailoringSuggestions>(&text) else {
        warn!("Tailoring response had no usable JSON, keeping original resume");
        return TailorOutcome::untailored(original);
    };

    let resume = apply_suggestions(original, suggestions);
    info!("Tailored resume for {} at {}", job.title, job.company);
    TailorOutcome {
        resume,
        fallback: false,
    }
}

fn build_tailor_prompt(
    resume: &ResumeDocument,
    job: &JobPosting,
    requirements: &JobRequirements,
) -> Result<String, serde_json::Error> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let job_json = serde_json::to_string_pretty(&serde_json::json!({
        "title": job.title,
        "company": job.company,
        "description": job.description,
        "requirements": job.requirements,
        "skills": job.skills,
    }))?;
    let requirements_json = serde_json::to_string_pretty(requirements)?;

    Ok(TAILOR_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{resume_json}", &resume_json)
        .replace("{job_json}", &job_json)
        .replace("{requirements_json}", &requirements_json))
}

/// Applies model suggestions to a copy of the original.
///
/// Contact, titles, companies, dates and education are never touched. Rewrites for
/// roles that do not exist and empty rewrites are ignored. Skills may only be
/// reordered: unknown skills are dropped and omitted ones keep their place at the end.
fn apply_suggestions(original: &ResumeDocument, suggestions: TailoringSuggestions) -> ResumeDocument {
    let mut resume = original.clone();

    if !suggestions.summary.trim().is_empty() {
        resume.summary = suggestions.summary.trim().to_string();
    }

    for rewrite in suggestions.experience {
        let bullets: Vec<String> = rewrite
            .bullets
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        match resume.experience.get_mut(rewrite.index) {
            Some(role) if !bullets.is_empty() => role.bullets = bullets,
            Some(_) => {}
            None => warn!("Ignoring bullet rewrite for unknown role index {}", rewrite.index),
        }
    }

    resume.skills = reorder_skills(&original.skills, &suggestions.skills);
    resume
}

fn reorder_skills(original: &[String], suggested: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(original.len());
    for skill in suggested {
        if let Some(existing) = original
            .iter()
            .find(|o| o.trim().eq_ignore_ascii_case(skill.trim()))
        {
            if !ordered.contains(existing) {
                ordered.push(existing.clone());
            }
        }
    }
    for skill in original {
        if !ordered.contains(skill) {
            ordered.push(skill.clone());
        }
    }
    ordered
}
