//! Markdown export of a resume, used by the popup download action.

use std::fmt::Write;

use crate::models::resume::ResumeDocument;

pub fn resume_markdown(resume: &ResumeDocument) -> String {
    let mut out = String::new();
    let contact = &resume.contact;

    let name = if contact.name.trim().is_empty() {
        "Resume"
    } else {
        contact.name.trim()
    };
    let _ = writeln!(out, "# {name}\n");

    let contact_line: Vec<&str> = [
        contact.email.as_str(),
        contact.phone.as_str(),
        contact.location.as_str(),
        contact.linkedin.as_deref().unwrap_or(""),
        contact.website.as_deref().unwrap_or(""),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();
    if !contact_line.is_empty() {
        let _ = writeln!(out, "{}\n", contact_line.join(" | "));
    }

    if !resume.summary.trim().is_empty() {
        let _ = writeln!(out, "## Summary\n\n{}\n", resume.summary.trim());
    }

    if !resume.experience.is_empty() {
        out.push_str("## Experience\n\n");
        for role in &resume.experience {
            let _ = writeln!(out, "### {} — {}", role.title, role.company);
            let dates = date_range(&role.start_date, &role.end_date);
            if !dates.is_empty() {
                let _ = writeln!(out, "_{dates}_");
            }
            out.push('\n');
            for bullet in &role.bullets {
                let _ = writeln!(out, "- {bullet}");
            }
            out.push('\n');
        }
    }

    if !resume.education.is_empty() {
        out.push_str("## Education\n\n");
        for school in &resume.education {
            let _ = write!(out, "- **{}**, {}", school.degree, school.institution);
            if !school.graduation_date.trim().is_empty() {
                let _ = write!(out, " ({})", school.graduation_date.trim());
            }
            if let Some(gpa) = school.gpa.as_deref().filter(|g| !g.trim().is_empty()) {
                let _ = write!(out, ", GPA {}", gpa.trim());
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !resume.skills.is_empty() {
        let _ = writeln!(out, "## Skills\n\n{}", resume.skills.join(", "));
    }

    out.trim_end().to_string() + "\n"
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => format!("{start} – Present"),
        ("", end) => end.to_string(),
        (start, end) => format!("{start} – {end}"),
    }
}

/// `<name>_<company>_resume.md`, restricted to ASCII alphanumerics and underscores.
pub fn download_filename(name: &str, company: Option<&str>) -> String {
    let mut stem = sanitize(name);
    if let Some(company) = company.map(sanitize).filter(|c| !c.is_empty()) {
        if !stem.is_empty() {
            stem.push('_');
        }
        stem.push_str(&company);
    }
    if stem.is_empty() {
        "resume.md".to_string()
    } else {
        format!("{stem}_resume.md")
    }
}

fn sanitize(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::fixtures::sample_resume;

    #[test]
    fn test_markdown_has_every_section() {
        let md = resume_markdown(&sample_resume());
        assert!(md.starts_with("# Jordan Lee\n"));
        assert!(md.contains("jordan@example.com"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("## Experience"));
        assert!(md.contains("- Built a component library used by 12 teams"));
        assert!(md.contains("## Education"));
        assert!(md.contains("## Skills\n\nJavaScript, React, TypeScript, CSS"));
    }

    #[test]
    fn test_empty_resume_renders_placeholder_heading() {
        assert_eq!(resume_markdown(&ResumeDocument::default()), "# Resume\n");
    }

    #[test]
    fn test_open_ended_role_reads_present() {
        assert_eq!(date_range("2021", ""), "2021 – Present");
        assert_eq!(date_range("", ""), "");
    }

    #[test]
    fn test_filename_is_sanitized() {
        assert_eq!(
            download_filename("Jordan Lee", Some("Tech Corp, Inc.")),
            "Jordan_Lee_Tech_Corp_Inc_resume.md"
        );
        assert_eq!(download_filename("  ", None), "resume.md");
        assert_eq!(download_filename("", Some("Globex")), "Globex_resume.md");
    }
}
