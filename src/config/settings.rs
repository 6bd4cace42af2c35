//! Configuration settings for tubeqa.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub chunking: ChunkingSettings,
    pub rag: RagSettings,
    pub youtube: YoutubeSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory under which per-session temporary directories are created.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/tubeqa".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Open a browser tab once the server is listening.
    pub open_browser: bool,
    /// Sessions idle for longer than this are dropped when a new session starts.
    pub session_idle_minutes: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            open_browser: true,
            session_idle_minutes: 120,
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completion model.
    pub model: String,
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: f32,
    /// Override for the API base URL (OpenAI-compatible endpoints).
    pub api_base: Option<String>,
    /// Timeout for a single API request, in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.5,
            api_base: None,
            timeout_seconds: 300,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreBackend {
    /// Process memory, dropped with the session.
    #[default]
    Memory,
    /// SQLite database inside a per-session temporary directory.
    Sqlite,
}

impl std::str::FromStr for VectorStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(VectorStoreBackend::Memory),
            "sqlite" => Ok(VectorStoreBackend::Sqlite),
            _ => Err(format!("Unknown vector store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for VectorStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorStoreBackend::Memory => write!(f, "memory"),
            VectorStoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct VectorStoreSettings {
    /// Vector store backend (memory, sqlite).
    pub backend: VectorStoreBackend,
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Target number of words per chunk.
    pub chunk_words: usize,
    /// Words shared between consecutive chunks.
    pub overlap_words: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_words: 200,
            overlap_words: 20,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Maximum number of context chunks to include in a query.
    pub max_context_chunks: usize,
    /// Minimum similarity score for a chunk to be used as context.
    pub min_score: f32,
    /// Number of chat messages kept for follow-up questions.
    pub history_limit: usize,
    /// Maximum transcript characters sent with the summary prompt.
    pub summary_max_chars: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            max_context_chunks: 5,
            min_score: 0.2,
            history_limit: 20,
            summary_max_chars: 24_000,
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Caption languages in order of preference.
    pub languages: Vec<String>,
    /// Look up the real video title through oEmbed.
    pub fetch_title: bool,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            fetch_title: true,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file, falling back to
    /// defaults when there is none.
    pub fn load() -> crate::error::Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// Load settings from an explicitly chosen file, which must exist.
    pub fn load_from(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Err(crate::error::TubeQaError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubeqa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
