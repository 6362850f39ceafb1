//! Heuristic job extraction straight from page structure, plus visible-text rendering.

use scraper::{ElementRef, Html, Node, Selector};

use crate::models::job::BasicJobData;

/// Job-board specific selectors come first, generic fallbacks last.
const TITLE_SELECTORS: &[&str] = &[
    ".jobs-unified-top-card__job-title",
    ".job-details-jobs-unified-top-card__job-title",
    ".topcard__title",
    "[data-testid='jobsearch-JobInfoHeader-title']",
    ".jobsearch-JobInfoHeader-title",
    "[data-automation='job-detail-title']",
    ".posting-headline h2",
    ".app-title",
    ".job-title",
    "[class*='job-title']",
    "h1",
];

const COMPANY_SELECTORS: &[&str] = &[
    ".jobs-unified-top-card__company-name",
    ".job-details-jobs-unified-top-card__company-name",
    ".topcard__org-name-link",
    "[data-testid='inlineHeader-companyName']",
    "[data-company-name='true']",
    "[data-automation='advertiser-name']",
    ".company-name",
    ".company",
    "[class*='company-name']",
    "[class*='employer']",
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".jobs-description__content",
    ".jobs-box__html-content",
    ".description__text",
    "#jobDescriptionText",
    "[data-automation='jobAdDetails']",
    "#job-description",
    ".job-description",
    "[class*='job-description']",
    "[class*='description']",
    "article",
    "main",
];

const COMPANY_META: &[&str] = &["meta[property='og:site_name']", "meta[name='author']"];

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — "];

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

pub const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Extracts title, company and description from a captured page. Fields the
/// heuristics cannot find are left empty.
pub fn extract_basic_job(document: &Html, url: &str) -> BasicJobData {
    let title = first_text(document, TITLE_SELECTORS)
        .or_else(|| document_title(document))
        .unwrap_or_default();

    let company = first_text(document, COMPANY_SELECTORS)
        .or_else(|| first_meta_content(document, COMPANY_META))
        .unwrap_or_default();

    let description = DESCRIPTION_SELECTORS
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .find_map(|sel| {
            document
                .select(&sel)
                .map(visible_text)
                .find(|text| text.len() >= 100)
        })
        .or_else(|| body_text(document))
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
        .unwrap_or_default();

    BasicJobData {
        title,
        company,
        description,
        url: url.to_string(),
    }
}

/// Rendered text of the whole document body, hidden elements skipped.
pub fn body_text(document: &Html) -> Option<String> {
    let body = Selector::parse("body").ok()?;
    document
        .select(&body)
        .next()
        .map(visible_text)
        .or_else(|| Some(visible_text(document.root_element())))
        .filter(|text| !text.is_empty())
}

/// Text content of an element with whitespace collapsed and hidden subtrees skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if HIDDEN_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .find_map(|sel| {
            document
                .select(&sel)
                .map(visible_text)
                .find(|text| !text.is_empty() && text.len() <= 200)
        })
}

fn first_meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .find_map(|sel| {
            document
                .select(&sel)
                .filter_map(|el| el.value().attr("content"))
                .map(collapse_whitespace)
                .find(|content| !content.is_empty())
        })
}

/// `<title>` text up to the first separator, e.g. "Engineer - Acme | Jobs" → "Engineer".
fn document_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let raw: String = document.select(&selector).next()?.text().collect();
    let title = collapse_whitespace(&raw);
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    let head = title[..cut].trim();
    (!head.is_empty()).then(|| head.to_string())
}

pub fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    buf.trim().to_string()
}

/// Cuts to at most `max` characters, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
