//! Per-session vector index of transcript chunks.
//!
//! Backends hold embedded chunks for the videos a session has loaded and rank
//! them by cosine similarity against a query embedding.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transcript chunk stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Video ID this chunk belongs to.
    pub source_id: String,
    /// Video title.
    pub title: String,
    /// URL the video was loaded from.
    pub url: String,
    /// Text content of this chunk.
    pub content: String,
    /// Start time in the video (seconds).
    pub start_seconds: f64,
    /// End time in the video (seconds).
    pub end_seconds: f64,
    /// Order of this chunk in the video.
    pub chunk_order: i32,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document.
    pub fn new(
        source_id: String,
        title: String,
        url: String,
        content: String,
        start_seconds: f64,
        end_seconds: f64,
        chunk_order: i32,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            title,
            url,
            content,
            start_seconds,
            end_seconds,
            chunk_order,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Format the start timestamp for display.
    pub fn format_timestamp(&self) -> String {
        format_timestamp(self.start_seconds)
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Swap all chunks of a video for `docs` in one step. On error the
    /// previous chunks are kept.
    async fn replace_source(&self, source_id: &str, docs: &[Document]) -> Result<usize>;

    /// Get all chunks of a video, in chunk order.
    async fn get_by_source(&self, source_id: &str) -> Result<Vec<Document>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank scored documents: filter by threshold, sort descending, truncate.
pub(crate) fn rank(
    docs: impl Iterator<Item = Document>,
    query_embedding: &[f32],
    limit: usize,
    min_score: f32,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = docs
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .filter(|r| r.score >= min_score)
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(125.0), "02:05");
        assert_eq!(format_timestamp(3725.4), "01:02:05");
        assert_eq!(format_timestamp(-3.0), "00:00");
    }

    #[test]
    fn test_rank_orders_and_filters() {
        let doc = |content: &str, embedding: Vec<f32>| {
            Document::new(
                "v".into(),
                "T".into(),
                "u".into(),
                content.into(),
                0.0,
                1.0,
                0,
                embedding,
            )
        };
        let docs = vec![
            doc("low", vec![0.0, 1.0]),
            doc("high", vec![1.0, 0.0]),
            doc("mid", vec![1.0, 1.0]),
        ];

        let results = rank(docs.into_iter(), &[1.0, 0.0], 10, 0.5);
        let contents: Vec<_> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(contents, vec!["high", "mid"]);
    }
}
