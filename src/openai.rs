//! OpenAI client construction and error classification.

use crate::config::KnowledgeBaseConfig;
use crate::error::{Result, TubeQaError};
use async_openai::error::OpenAIError;
use async_openai::{config::OpenAIConfig, Client};

/// Create an OpenAI client for the given session configuration.
///
/// The HTTP client carries the configured timeout so a hung API call cannot
/// block an interaction forever.
pub fn create_client(config: &KnowledgeBaseConfig) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;

    let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key());
    if let Some(base) = &config.api_base {
        openai_config = openai_config.with_api_base(base);
    }

    Ok(Client::with_config(openai_config).with_http_client(http_client))
}

/// Map an OpenAI error onto the tubeqa error taxonomy.
///
/// A rejected credential becomes [`TubeQaError::Authentication`]; every other
/// failure is a [`TubeQaError::RemoteService`] error prefixed with `context`.
pub fn classify_error(context: &str, err: OpenAIError) -> TubeQaError {
    if let OpenAIError::ApiError(api) = &err {
        let code = api.code.as_deref().unwrap_or_default();
        let kind = api.r#type.as_deref().unwrap_or_default();
        let message = api.message.to_lowercase();

        if code == "invalid_api_key"
            || kind == "authentication_error"
            || message.contains("incorrect api key")
            || message.contains("invalid api key")
        {
            return TubeQaError::Authentication(api.message.clone());
        }
    }

    TubeQaError::RemoteService(format!("{}: {}", context, err))
}
