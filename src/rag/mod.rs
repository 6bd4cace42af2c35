//! RAG (Retrieval-Augmented Generation) knowledge base over video transcripts.
//!
//! A session's knowledge base ingests transcripts into a vector store, and
//! answers summary requests and questions with a chat model grounded in the
//! retrieved chunks.

mod chat;
pub mod context;
mod engine;

pub use chat::{ChatMessage, ChatModel, ChatRole, OpenAIChatModel};
pub use context::ContextBuilder;
pub use engine::RagKnowledgeBase;

use crate::error::Result;
use crate::transcript::FetchedVideo;
use crate::vector_store::SearchResult;
use async_trait::async_trait;

/// The operations a session needs from its knowledge base.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Add a video's transcript as retrievable content. Returns the number of
    /// chunks indexed.
    async fn ingest(&self, video: &FetchedVideo) -> Result<usize>;

    /// Summarize an ingested video.
    async fn summarize(&mut self, video_id: &str) -> Result<String>;

    /// Answer a question from the ingested content.
    async fn query(&mut self, question: &str) -> Result<String>;
}

/// A retrieved chunk formatted for prompting.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Video ID.
    pub source_id: String,
    /// Video title.
    pub title: String,
    /// Formatted timestamp (e.g., "02:34").
    pub timestamp: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// Text content.
    pub content: String,
    /// Watch URL jumping to the chunk.
    pub url: String,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        let doc = result.document;
        Self {
            url: format!(
                "https://www.youtube.com/watch?v={}&t={}s",
                doc.source_id,
                doc.start_seconds.max(0.0) as u32
            ),
            timestamp: doc.format_timestamp(),
            source_id: doc.source_id,
            title: doc.title,
            start_seconds: doc.start_seconds,
            content: doc.content,
        }
    }
}
