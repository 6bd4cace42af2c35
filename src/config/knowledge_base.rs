//! Validated configuration for a session's knowledge base.

use super::{Settings, VectorStoreBackend};
use crate::error::{Result, TubeQaError};
use std::time::Duration;

/// Everything needed to build a knowledge base for one session.
///
/// Built from the user's API key and the loaded [`Settings`]; construction
/// fails fast on missing or out-of-range values.
#[derive(Clone)]
pub struct KnowledgeBaseConfig {
    api_key: String,
    pub api_base: Option<String>,
    pub chat_model: String,
    pub temperature: f32,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub backend: VectorStoreBackend,
    pub timeout: Duration,
}

impl KnowledgeBaseConfig {
    /// Validate and build a configuration.
    pub fn new(api_key: &str, settings: &Settings) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(TubeQaError::InvalidInput(
                "An OpenAI API key is required".to_string(),
            ));
        }

        if settings.llm.model.trim().is_empty() {
            return Err(TubeQaError::Config("llm.model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&settings.llm.temperature) {
            return Err(TubeQaError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                settings.llm.temperature
            )));
        }

        if settings.embedding.model.trim().is_empty() {
            return Err(TubeQaError::Config("embedding.model must not be empty".to_string()));
        }

        if settings.embedding.dimensions == 0 {
            return Err(TubeQaError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }

        if settings.llm.timeout_seconds == 0 {
            return Err(TubeQaError::Config(
                "llm.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let api_base = match settings.llm.api_base.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(base) => {
                url::Url::parse(base).map_err(|e| {
                    TubeQaError::Config(format!("llm.api_base is not a valid URL: {}", e))
                })?;
                Some(base.trim_end_matches('/').to_string())
            }
        };

        Ok(Self {
            api_key: api_key.to_string(),
            api_base,
            chat_model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
            embedding_model: settings.embedding.model.clone(),
            embedding_dimensions: settings.embedding.dimensions as usize,
            backend: settings.vector_store.backend,
            timeout: Duration::from_secs(settings.llm.timeout_seconds),
        })
    }

    /// The API credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for KnowledgeBaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("backend", &self.backend)
            .field("timeout", &self.timeout)
            .finish()
    }
}
