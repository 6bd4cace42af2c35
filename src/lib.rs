//! TubeQA - question answering over YouTube transcripts
//!
//! A local web app: the user supplies an OpenAI API key and a YouTube link,
//! gets a summary of the video, then asks questions answered from the
//! video's transcript through retrieval-augmented generation.
//!
//! # Architecture
//!
//! - `transcript` - YouTube URL parsing and caption retrieval
//! - `chunking` - Splitting transcripts into timestamped chunks
//! - `embedding` - Embedding generation
//! - `vector_store` - Per-session vector index (memory or SQLite)
//! - `rag` - The knowledge base: ingest, summarize, query
//! - `session` - Per-user workflow and conversation log
//! - `server` - HTML page and JSON API
//! - `config` - Settings, prompts and knowledge base configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubeqa::config::{KnowledgeBaseConfig, Prompts, Settings};
//! use tubeqa::rag::RagKnowledgeBase;
//! use tubeqa::session::Session;
//! use tubeqa::transcript::{TranscriptFetcher, YoutubeTranscriptSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let prompts = Prompts::default();
//!     let config = KnowledgeBaseConfig::new("sk-...", &settings)?;
//!     let knowledge_base = RagKnowledgeBase::initialize(&config, &settings, prompts)?;
//!
//!     let source = YoutubeTranscriptSource::new(vec!["en".to_string()])?;
//!     let fetcher = TranscriptFetcher::new(Arc::new(source), true);
//!     let mut session = Session::new(fetcher, Box::new(knowledge_base), "Summarize this video");
//!
//!     let video = session.load_video("https://youtu.be/dQw4w9WgXcQ").await?;
//!     println!("{}", video.summary);
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod rag;
pub mod server;
pub mod session;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, TubeQaError};
