use serde::{Deserialize, Serialize};

/// The user's master resume. Stored as an opaque JSON blob; field names are camelCase
/// because the same record is read and written by every context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub contact: ContactInfo,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    /// Empty or "Present" for a current role.
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub graduation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

impl ResumeDocument {
    /// Lowercased text of every section that keyword matching should see.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.summary.as_str()];
        parts.extend(self.skills.iter().map(String::as_str));
        for role in &self.experience {
            parts.push(&role.title);
            parts.push(&role.company);
            parts.extend(role.bullets.iter().map(String::as_str));
        }
        for school in &self.education {
            parts.push(&school.degree);
        }
        parts.join("\n").to_lowercase()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_resume() -> ResumeDocument {
        ResumeDocument {
            contact: ContactInfo {
                name: "Jordan Lee".to_string(),
                email: "jordan@example.com".to_string(),
                phone: "555-0100".to_string(),
                location: "Austin, TX".to_string(),
                linkedin: Some("linkedin.com/in/jordanlee".to_string()),
                website: None,
            },
            summary: "Frontend engineer with 6 years building web applications.".to_string(),
            skills: vec![
                "JavaScript".to_string(),
                "React".to_string(),
                "TypeScript".to_string(),
                "CSS".to_string(),
            ],
            experience: vec![
                ExperienceEntry {
                    title: "Software Engineer".to_string(),
                    company: "Acme".to_string(),
                    start_date: "2021-03".to_string(),
                    end_date: "Present".to_string(),
                    bullets: vec![
                        "Built a component library used by 12 teams".to_string(),
                        "Cut bundle size by 35%".to_string(),
                    ],
                },
                ExperienceEntry {
                    title: "Web Developer".to_string(),
                    company: "Initech".to_string(),
                    start_date: "2018-06".to_string(),
                    end_date: "2021-02".to_string(),
                    bullets: vec!["Maintained customer dashboards".to_string()],
                },
            ],
            education: vec![EducationEntry {
                degree: "B.S. Computer Science".to_string(),
                institution: "State University".to_string(),
                graduation_date: "2018".to_string(),
                gpa: None,
            }],
        }
    }
}
