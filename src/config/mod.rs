//! Configuration module for tubeqa.
//!
//! Handles loading application settings, prompt templates, and the validated
//! knowledge base configuration built per session.

mod knowledge_base;
mod prompts;
mod settings;

pub use knowledge_base::KnowledgeBaseConfig;
pub use prompts::{Prompts, RagPrompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, LlmSettings, PromptSettings,
    RagSettings, ServerSettings, Settings, VectorStoreBackend, VectorStoreSettings,
    YoutubeSettings,
};
