//! The session knowledge base: vector index plus chat model.

use super::context::format_context_for_prompt;
use super::{ChatMessage, ChatModel, ContextBuilder, KnowledgeBase, OpenAIChatModel};
use crate::chunking::{Chunker, ChunkingConfig, WindowChunker};
use crate::config::{KnowledgeBaseConfig, Prompts, Settings, VectorStoreBackend};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, TubeQaError};
use crate::openai::create_client;
use crate::transcript::FetchedVideo;
use crate::vector_store::{Document, MemoryVectorStore, SqliteVectorStore, VectorStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, instrument};

/// Knowledge base over ingested video transcripts.
pub struct RagKnowledgeBase {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    context_builder: ContextBuilder,
    chunker: WindowChunker,
    chunking: ChunkingConfig,
    prompts: Prompts,
    history: Vec<ChatMessage>,
    history_limit: usize,
    summary_max_chars: usize,
    /// Holds the SQLite backend's directory; removed when the knowledge base drops.
    _storage_dir: Option<TempDir>,
}

impl RagKnowledgeBase {
    /// Configure the OpenAI-backed knowledge base for one session.
    ///
    /// No request is made here: a rejected key surfaces on first use.
    pub fn initialize(
        config: &KnowledgeBaseConfig,
        settings: &Settings,
        prompts: Prompts,
    ) -> Result<Self> {
        let client = create_client(config)?;

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(
            client.clone(),
            &config.embedding_model,
            config.embedding_dimensions,
        ));
        let chat: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(client, config));

        let (vector_store, storage_dir): (Arc<dyn VectorStore>, Option<TempDir>) =
            match config.backend {
                VectorStoreBackend::Memory => (Arc::new(MemoryVectorStore::new()), None),
                VectorStoreBackend::Sqlite => {
                    let base = settings.temp_dir();
                    std::fs::create_dir_all(&base)?;
                    let dir = tempfile::Builder::new().prefix("session-").tempdir_in(&base)?;
                    let store = SqliteVectorStore::new(&dir.path().join("vectors.db"))?;
                    (Arc::new(store), Some(dir))
                }
            };

        info!(
            "Initialized knowledge base ({} backend, model {})",
            config.backend, config.chat_model
        );

        let mut kb = Self::with_components(vector_store, embedder, chat, settings, prompts);
        kb._storage_dir = storage_dir;
        Ok(kb)
    }

    /// Build a knowledge base from explicit components.
    pub fn with_components(
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        settings: &Settings,
        prompts: Prompts,
    ) -> Self {
        let context_builder = ContextBuilder::new(vector_store.clone(), embedder.clone())
            .with_max_chunks(settings.rag.max_context_chunks)
            .with_min_score(settings.rag.min_score);

        Self {
            vector_store,
            embedder,
            chat,
            context_builder,
            chunker: WindowChunker::new(),
            chunking: ChunkingConfig::from(&settings.chunking),
            prompts,
            history: Vec::new(),
            history_limit: settings.rag.history_limit,
            summary_max_chars: settings.rag.summary_max_chars,
            _storage_dir: None,
        }
    }

    /// Record a completed exchange and keep the history bounded.
    fn remember(&mut self, question: &str, answer: &str) {
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(answer));

        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }
    }

    /// Ordered transcript text of a video, cut at `summary_max_chars`.
    async fn summary_source(&self, video_id: &str) -> Result<(String, String)> {
        let chunks = self.vector_store.get_by_source(video_id).await?;
        let title = chunks
            .first()
            .map(|c| c.title.clone())
            .ok_or_else(|| {
                TubeQaError::InvalidInput(format!("Video {} has not been ingested", video_id))
            })?;

        let mut text = String::new();
        for chunk in &chunks {
            let line = format!("[{}] {}\n", chunk.format_timestamp(), chunk.content);
            if text.len() + line.len() > self.summary_max_chars {
                let remaining = self.summary_max_chars.saturating_sub(text.len());
                let cut = line
                    .char_indices()
                    .map(|(i, _)| i)
                    .take_while(|i| *i <= remaining)
                    .last()
                    .unwrap_or(0);
                text.push_str(&line[..cut]);
                debug!("Summary input truncated at {} characters", self.summary_max_chars);
                break;
            }
            text.push_str(&line);
        }

        Ok((title, text))
    }
}

#[async_trait]
impl KnowledgeBase for RagKnowledgeBase {
    #[instrument(skip(self, video), fields(video_id = %video.reference.video_id))]
    async fn ingest(&self, video: &FetchedVideo) -> Result<usize> {
        let chunks = self.chunker.chunk(&video.transcript, &self.chunking);
        if chunks.is_empty() {
            return Err(TubeQaError::TranscriptUnavailable {
                video_id: video.reference.video_id.clone(),
                reason: "the transcript has no words".to_string(),
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(
                    video.reference.video_id.clone(),
                    video.title.clone(),
                    video.reference.url.clone(),
                    chunk.content,
                    chunk.start_seconds,
                    chunk.end_seconds,
                    chunk.order,
                    embedding,
                )
            })
            .collect();

        // Replace any earlier ingestion of the same video
        let count = self
            .vector_store
            .replace_source(&video.reference.video_id, &documents)
            .await?;

        info!(
            "Indexed {} chunks for '{}' ({} in session index)",
            count,
            video.title,
            self.vector_store.document_count().await?
        );
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn summarize(&mut self, video_id: &str) -> Result<String> {
        let (title, transcript) = self.summary_source(video_id).await?;

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), title);
        vars.insert("transcript".to_string(), transcript);
        let user_prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.user, &vars);

        let messages = vec![
            ChatMessage::system(self.prompts.summary.system.clone()),
            ChatMessage::user(user_prompt),
        ];
        let summary = self.chat.complete(&messages).await?;

        let label = self.prompts.summary.label.clone();
        self.remember(&label, &summary);
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn query(&mut self, question: &str) -> Result<String> {
        let context_chunks = self.context_builder.build(question).await?;
        debug!("Retrieved {} context chunks", context_chunks.len());

        let context = if context_chunks.is_empty() {
            "(No relevant context found in the loaded video transcripts)".to_string()
        } else {
            format_context_for_prompt(&context_chunks)
        };

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context);
        let user_prompt = self.prompts.render_with_custom(&self.prompts.rag.user, &vars);

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.prompts.rag.system.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(user_prompt));

        let answer = self.chat.complete(&messages).await?;
        self.remember(question, &answer);
        Ok(answer)
    }
}
