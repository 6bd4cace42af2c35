//! Text embeddings for transcript chunks and questions.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Turns text into vectors comparable by cosine similarity.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text, typically a question.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts; output order matches input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Length of the vectors this embedder produces.
    fn dimensions(&self) -> usize;
}
