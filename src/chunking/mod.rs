//! Chunking strategies for breaking transcripts into retrievable pieces.

mod window;

pub use window::WindowChunker;

use crate::config::ChunkingSettings;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// A chunk of transcript text with the time range it covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Order of this chunk in the video.
    pub order: i32,
}

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Target number of words per chunk.
    pub chunk_words: usize,
    /// Words repeated at the start of the next chunk.
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_words: 200,
            overlap_words: 20,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_words: settings.chunk_words,
            overlap_words: settings.overlap_words,
        }
    }
}

/// Trait for content chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split a transcript into content chunks.
    fn chunk(&self, transcript: &Transcript, config: &ChunkingConfig) -> Vec<ContentChunk>;
}
