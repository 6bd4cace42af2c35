//! Context building for RAG responses.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;

/// Builds context from search results for RAG.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            max_chunks: 5,
            min_score: 0.2,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Retrieve the best-matching chunks for a query, in playback order.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, self.max_chunks, self.min_score)
            .await?;

        let mut chunks: Vec<ContextChunk> = results.into_iter().map(ContextChunk::from).collect();
        chunks.sort_by(|a, b| {
            a.source_id
                .cmp(&b.source_id)
                .then(a.start_seconds.total_cmp(&b.start_seconds))
        });
        Ok(chunks)
    }
}

/// Format context chunks for inclusion in a prompt.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "---\n[{}] {} @ {} ({})\n{}\n---",
                i + 1,
                chunk.title,
                chunk.timestamp,
                chunk.url,
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Document, MemoryVectorStore};
    use async_trait::async_trait;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.0.clone()).collect())
        }

        fn dimensions(&self) -> usize {
            self.0.len()
        }
    }

    fn doc(content: &str, order: i32, embedding: Vec<f32>) -> Document {
        Document::new(
            "abc123XYZ".to_string(),
            "Rust Talk".to_string(),
            "https://youtu.be/abc123XYZ".to_string(),
            content.to_string(),
            order as f64 * 60.0,
            (order + 1) as f64 * 60.0,
            order,
            embedding,
        )
    }

    #[tokio::test]
    async fn test_build_filters_and_orders_by_time() {
        let store = Arc::new(MemoryVectorStore::new());
        store
            .replace_source(
                "abc123XYZ",
                &[
                    doc("late, best match", 2, vec![1.0, 0.0]),
                    doc("early, weaker match", 0, vec![1.0, 1.0]),
                    doc("unrelated", 1, vec![0.0, 1.0]),
                ],
            )
            .await
            .unwrap();

        let builder = ContextBuilder::new(store, Arc::new(FixedEmbedder(vec![1.0, 0.0])))
            .with_min_score(0.5);
        let chunks = builder.build("anything").await.unwrap();

        let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["early, weaker match", "late, best match"]);
        assert_eq!(chunks[1].timestamp, "02:00");
        assert_eq!(chunks[1].url, "https://www.youtube.com/watch?v=abc123XYZ&t=120s");
    }

    #[test]
    fn test_format_context() {
        let chunks = vec![ContextChunk {
            source_id: "abc123XYZ".to_string(),
            title: "Rust Talk".to_string(),
            timestamp: "02:05".to_string(),
            start_seconds: 125.0,
            content: "Ownership is checked at compile time.".to_string(),
            url: "https://www.youtube.com/watch?v=abc123XYZ&t=125s".to_string(),
        }];

        assert_eq!(
            format_context_for_prompt(&chunks),
            "---\n[1] Rust Talk @ 02:05 (https://www.youtube.com/watch?v=abc123XYZ&t=125s)\n\
             Ownership is checked at compile time.\n---"
        );
        assert!(format_context_for_prompt(&[]).is_empty());
    }
}
