//! YouTube caption retrieval.

use super::{Transcript, TranscriptSegment, TranscriptSource, VideoReference};
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use yt_transcript_rs::api::YouTubeTranscriptApi;

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Timeout for the title lookup; captions go through the transcript API client.
const OEMBED_TIMEOUT_SECS: u64 = 15;

#[derive(Deserialize)]
struct OEmbedResponse {
    title: String,
}

/// Caption source backed by YouTube's public transcript endpoints.
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
    http: reqwest::Client,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    /// Create a source preferring caption tracks in `languages`, in order.
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            TubeQaError::Config(format!("Failed to initialize transcript client: {}", e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(OEMBED_TIMEOUT_SECS))
            .build()?;

        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };

        Ok(Self {
            api,
            http,
            languages,
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self), fields(video_id = %video.video_id))]
    async fn fetch_transcript(&self, video: &VideoReference) -> Result<Transcript> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let fetched = self
            .api
            .fetch_transcript(&video.video_id, &languages, false)
            .await
            .map_err(|e| TubeQaError::TranscriptUnavailable {
                video_id: video.video_id.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Fetched {} snippets ({}, generated: {})",
            fetched.snippets.len(),
            fetched.language_code,
            fetched.is_generated
        );

        let segments = fetched
            .snippets
            .iter()
            .map(|s| TranscriptSegment::new(s.text.clone(), s.start, s.duration))
            .collect();

        Ok(Transcript::new(
            video.video_id.clone(),
            Some(fetched.language_code.clone()),
            segments,
        ))
    }

    #[instrument(skip(self), fields(video_id = %video.video_id))]
    async fn fetch_title(&self, video: &VideoReference) -> Result<Option<String>> {
        let endpoint = url::Url::parse_with_params(
            OEMBED_ENDPOINT,
            &[("url", video.watch_url().as_str()), ("format", "json")],
        )
        .map_err(|e| TubeQaError::InvalidUrl(e.to_string()))?;

        let response: OEmbedResponse = self
            .http
            .get(endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Some(response.title))
    }
}
