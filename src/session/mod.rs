//! Per-user session state and the interaction workflow.
//!
//! A [`Session`] owns its knowledge base and conversation log. Loading a video
//! runs fetch, ingest and summarize in sequence; questions are gated on a
//! video having been loaded.

mod log;
mod store;

pub use log::{ConversationLog, LogEntry, TRANSCRIPT_FILE_NAME};
pub use store::{OpenAISessionFactory, SessionFactory, SessionHandle, SessionStore};

use crate::error::{Result, TubeQaError};
use crate::rag::KnowledgeBase;
use crate::transcript::{TranscriptFetcher, VideoReference};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

/// Shown instead of an answer when no video has been loaded yet.
pub const LOAD_VIDEO_FIRST: &str =
    "Load a YouTube video first, then ask your questions about it.";

/// The video most recently loaded into a session.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedVideo {
    pub video_id: String,
    pub url: String,
    pub title: String,
    /// Length of the captioned part of the video.
    pub duration_seconds: f64,
    pub chunks_indexed: usize,
    pub summary: String,
}

/// Result of submitting a question.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// The question was answered and logged.
    Answered(LogEntry),
    /// Nothing was asked; the message tells the user what to do.
    Guidance(String),
}

/// State of one user's session.
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    fetcher: TranscriptFetcher,
    knowledge_base: Box<dyn KnowledgeBase>,
    summary_label: String,
    video: Option<LoadedVideo>,
    log: ConversationLog,
}

impl Session {
    /// Start a session over a configured knowledge base.
    pub fn new(
        fetcher: TranscriptFetcher,
        knowledge_base: Box<dyn KnowledgeBase>,
        summary_label: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            fetcher,
            knowledge_base,
            summary_label: summary_label.into(),
            video: None,
            log: ConversationLog::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Whether a video has been loaded.
    pub fn is_video_loaded(&self) -> bool {
        self.video.is_some()
    }

    pub fn video(&self) -> Option<&LoadedVideo> {
        self.video.as_ref()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Fetch, ingest and summarize the video at `url`.
    ///
    /// The summary becomes a log entry. On any failure the loaded video and
    /// the log are left as they were.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn load_video(&mut self, url: &str) -> Result<LoadedVideo> {
        self.last_active = Utc::now();

        let fetched = self.fetcher.fetch(url).await?;
        let chunks_indexed = self.knowledge_base.ingest(&fetched).await?;
        let summary = self
            .knowledge_base
            .summarize(&fetched.reference.video_id)
            .await?;

        let VideoReference { url, video_id } = fetched.reference;
        let loaded = LoadedVideo {
            video_id,
            title: fetched.title,
            duration_seconds: fetched.transcript.duration_seconds(),
            chunks_indexed,
            summary: summary.clone(),
            url,
        };

        self.log
            .push(format!("{} ({})", self.summary_label, loaded.url), summary);
        self.video = Some(loaded.clone());

        info!("Loaded video {} into session", loaded.video_id);
        Ok(loaded)
    }

    /// Ask a question about the loaded video.
    ///
    /// Without a loaded video the knowledge base is not called and
    /// [`AskOutcome::Guidance`] is returned.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn ask(&mut self, question: &str) -> Result<AskOutcome> {
        self.last_active = Utc::now();

        let question = question.trim();
        if question.is_empty() {
            return Err(TubeQaError::InvalidInput("The question is empty".to_string()));
        }

        if !self.is_video_loaded() {
            return Ok(AskOutcome::Guidance(LOAD_VIDEO_FIRST.to_string()));
        }

        let answer = self.knowledge_base.query(question).await?;
        let entry = self.log.push(question, answer).clone();
        Ok(AskOutcome::Answered(entry))
    }

    /// The downloadable conversation transcript.
    pub fn transcript_text(&self) -> String {
        self.log.render()
    }
}
