//! Popup session state machine.
//!
//! `init` loads the master resume and the last captured page, then parses the job.
//! `tailor` runs requirements → tailoring → scoring. `download` and
//! `application_draft` export whatever the session currently holds. Every external
//! stage substitutes a fallback or a status message; nothing here aborts the session.
//!
//! The latest view is published on a `watch` channel after every action, so readers
//! never wait on a session that is busy with model calls.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::capture::{load_captured_page, CapturedPage};
use crate::llm_client::TextGenerator;
use crate::models::application::{ApplicationStatus, NewApplication};
use crate::models::job::{JobPosting, JobRequirements};
use crate::models::resume::ResumeDocument;
use crate::popup::render::{download_filename, resume_markdown};
use crate::popup::PopupError;
use crate::resume::MasterResumeStore;
use crate::storage::StorageAdapter;
use crate::tailoring::job_parser::parse_job_posting;
use crate::tailoring::requirements::extract_requirements;
use crate::tailoring::scoring::{AtsScore, AtsScorer};
use crate::tailoring::tailor::{tailor_resume, TailorOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupStage {
    /// Nothing loaded yet.
    Idle,
    /// Resume and page loaded (either may be missing), job parsed if a page was present.
    Loaded,
    /// Tailoring and scoring finished, possibly on fallbacks.
    Tailored,
}

/// What the popup shows after each action.
#[derive(Debug, Clone, Serialize)]
pub struct PopupView {
    pub stage: PopupStage,
    pub resume_loaded: bool,
    pub page_url: Option<String>,
    pub job: Option<JobPosting>,
    pub requirements: Option<JobRequirements>,
    pub tailored: Option<TailorOutcome>,
    pub score: Option<AtsScore>,
    pub messages: Vec<String>,
}

impl PopupView {
    fn idle() -> Self {
        Self {
            stage: PopupStage::Idle,
            resume_loaded: false,
            page_url: None,
            job: None,
            requirements: None,
            tailored: None,
            score: None,
            messages: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeDownload {
    pub filename: String,
    pub content: String,
}

pub struct PopupOrchestrator {
    resumes: MasterResumeStore,
    sync: StorageAdapter,
    generator: Arc<dyn TextGenerator>,
    scorer: Arc<dyn AtsScorer>,

    stage: PopupStage,
    resume: Option<ResumeDocument>,
    page: Option<CapturedPage>,
    job: Option<JobPosting>,
    requirements: Option<JobRequirements>,
    tailored: Option<TailorOutcome>,
    score: Option<AtsScore>,
    messages: Vec<String>,

    published: watch::Sender<PopupView>,
}

impl PopupOrchestrator {
    pub fn new(
        resumes: MasterResumeStore,
        sync: StorageAdapter,
        generator: Arc<dyn TextGenerator>,
        scorer: Arc<dyn AtsScorer>,
    ) -> Self {
        Self {
            resumes,
            sync,
            generator,
            scorer,
            stage: PopupStage::Idle,
            resume: None,
            page: None,
            job: None,
            requirements: None,
            tailored: None,
            score: None,
            messages: vec![],
            published: watch::channel(PopupView::idle()).0,
        }
    }

    /// Receiver of the view as of the last completed action.
    pub fn subscribe(&self) -> watch::Receiver<PopupView> {
        self.published.subscribe()
    }

    /// Starts a fresh session: resume, captured page, job parse.
    pub async fn init(&mut self) -> PopupView {
        self.reset();

        self.resume = self.resumes.load().await;
        if self.resume.is_none() {
            self.messages
                .push("No master resume found. Save one in the web app first.".to_string());
        }

        if !self.sync.is_available() {
            self.messages
                .push("Synchronized storage is unavailable, so no captured page can be read.".to_string());
        }
        self.page = load_captured_page(&self.sync).await;

        match &self.page {
            Some(page) => {
                let url = page.url.as_deref().unwrap_or_default();
                let job = parse_job_posting(
                    self.generator.as_ref(),
                    url,
                    &page.html,
                    page.basic_job.as_ref(),
                )
                .await;
                info!("Popup loaded job {:?} at {:?}", job.title, job.company);
                self.job = Some(job);
            }
            None if self.sync.is_available() => {
                self.messages
                    .push("No job page captured yet. Open a posting and capture it.".to_string());
            }
            None => {}
        }

        self.stage = PopupStage::Loaded;
        self.publish()
    }

    /// Requirements → tailoring → scoring. Needs a loaded resume and a parsed job.
    pub async fn tailor(&mut self) -> Result<PopupView, PopupError> {
        let resume = self
            .resume
            .clone()
            .ok_or_else(|| PopupError::NotReady("No master resume is loaded".to_string()))?;
        let job = self
            .job
            .clone()
            .ok_or_else(|| PopupError::NotReady("No job posting has been parsed".to_string()))?;

        let generator = self.generator.as_ref();
        let requirements = extract_requirements(generator, &job).await;
        let outcome = tailor_resume(generator, &resume, &job, &requirements).await;
        if outcome.fallback {
            warn!("Tailoring fell back to the original resume");
            self.messages
                .push("Tailoring failed. Showing your original resume instead.".to_string());
        }
        let score = self.scorer.score(&outcome.resume, &job, &requirements).await;

        self.requirements = Some(requirements);
        self.tailored = Some(outcome);
        self.score = Some(score);
        self.stage = PopupStage::Tailored;
        Ok(self.publish())
    }

    pub fn view(&self) -> PopupView {
        PopupView {
            stage: self.stage,
            resume_loaded: self.resume.is_some(),
            page_url: self.page.as_ref().and_then(|p| p.url.clone()),
            job: self.job.clone(),
            requirements: self.requirements.clone(),
            tailored: self.tailored.clone(),
            score: self.score.clone(),
            messages: self.messages.clone(),
        }
    }

    /// The tailored resume if there is one, else the original, as markdown.
    pub fn download(&self) -> Result<ResumeDownload, PopupError> {
        let resume = self
            .tailored
            .as_ref()
            .map(|t| &t.resume)
            .or(self.resume.as_ref())
            .ok_or_else(|| PopupError::NotReady("No resume to download".to_string()))?;

        Ok(ResumeDownload {
            filename: download_filename(
                &resume.contact.name,
                self.job.as_ref().map(|j| j.company.as_str()),
            ),
            content: resume_markdown(resume),
        })
    }

    /// Application record for the current job, ready for the companion backend.
    pub fn application_draft(&self, user_id: Uuid) -> Result<NewApplication, PopupError> {
        let job = self
            .job
            .as_ref()
            .ok_or_else(|| PopupError::NotReady("No job posting has been parsed".to_string()))?;

        let tailored_resume = self
            .tailored
            .as_ref()
            .filter(|t| !t.fallback)
            .and_then(|t| serde_json::to_value(&t.resume).ok());

        Ok(NewApplication {
            user_id,
            job_title: job.title.clone(),
            company: job.company.clone(),
            job_url: self.page.as_ref().and_then(|p| p.url.clone()),
            ats_score: self.score.as_ref().map(|s| i32::from(s.score)),
            status: ApplicationStatus::Saved,
            tailored_resume,
            notes: Some(format!("Saved from popup on {}", Utc::now().format("%Y-%m-%d"))),
        })
    }

    fn publish(&self) -> PopupView {
        let view = self.view();
        self.published.send_replace(view.clone());
        view
    }

    fn reset(&mut self) {
        self.stage = PopupStage::Idle;
        self.resume = None;
        self.page = None;
        self.job = None;
        self.requirements = None;
        self.tailored = None;
        self.score = None;
        self.messages.clear();
    }
}
