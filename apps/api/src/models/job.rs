use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Position";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const NOT_SPECIFIED: &str = "Not specified";

/// Structured job record produced by one page analysis. Never merged with a prior value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub extracted_at: DateTime<Utc>,
}

impl JobPosting {
    /// The record shown when neither the model nor the page heuristics produced anything.
    pub fn unknown(extracted_at: DateTime<Utc>) -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            company: UNKNOWN_COMPANY.to_string(),
            location: NOT_SPECIFIED.to_string(),
            description: String::new(),
            requirements: vec![],
            skills: vec![],
            extracted_at,
        }
    }

    /// Builds the fallback record from the capture-time heuristic extraction.
    pub fn from_basic(basic: &BasicJobData, extracted_at: DateTime<Utc>) -> Self {
        let mut job = Self::unknown(extracted_at);
        if !basic.title.trim().is_empty() {
            job.title = basic.title.clone();
        }
        if !basic.company.trim().is_empty() {
            job.company = basic.company.clone();
        }
        job.description = basic.description.clone();
        job
    }
}

/// Job record recovered from page structure at capture time, without any network call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicJobData {
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: String,
}

/// Requirements derived from a free-text job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub keywords: Vec<String>,
    pub experience_level: String,
}
