//! Error types for tubeqa.

use thiserror::Error;

/// Library-level error type for tubeqa operations.
#[derive(Error, Debug)]
pub enum TubeQaError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("No transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl TubeQaError {
    /// Short machine-readable name of the error kind, used by the web API.
    pub fn kind(&self) -> &'static str {
        match self {
            TubeQaError::InvalidUrl(_) => "invalid_url",
            TubeQaError::TranscriptUnavailable { .. } => "transcript_unavailable",
            TubeQaError::Authentication(_) => "authentication",
            TubeQaError::RemoteService(_) => "remote_service",
            TubeQaError::Config(_) => "config",
            TubeQaError::InvalidInput(_) => "invalid_input",
            TubeQaError::SessionNotFound(_) => "session_not_found",
            TubeQaError::Embedding(_) => "embedding",
            TubeQaError::VectorStore(_) => "vector_store",
            TubeQaError::Internal(_) => "internal",
            TubeQaError::Io(_) => "io",
            TubeQaError::Json(_) => "json",
            TubeQaError::TomlParse(_) => "toml",
            TubeQaError::Http(_) => "http",
            TubeQaError::Database(_) => "database",
        }
    }
}

/// Result type alias for tubeqa operations.
pub type Result<T> = std::result::Result<T, TubeQaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TubeQaError::TranscriptUnavailable {
            video_id: "abc123XYZ".to_string(),
            reason: "captions disabled".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No transcript available for video abc123XYZ: captions disabled"
        );
        assert_eq!(err.kind(), "transcript_unavailable");
        assert_eq!(TubeQaError::InvalidUrl("x".into()).kind(), "invalid_url");
    }
}
