//! Transcript fetching for YouTube videos.
//!
//! Turns a submitted URL into a [`VideoReference`], retrieves its caption
//! track through a [`TranscriptSource`], and optionally looks up the title.

mod reference;
mod youtube;

pub use reference::VideoReference;
pub use youtube::YoutubeTranscriptSource;

use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Title used when the real title could not be looked up.
pub const PLACEHOLDER_TITLE: &str = "Unknown";

/// One caption line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            duration_seconds,
        }
    }

    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// The caption track of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    /// Language code of the caption track, when known.
    pub language: Option<String>,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(video_id: String, language: Option<String>, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            video_id,
            language,
            segments,
        }
    }

    /// All caption text joined into one plain string.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .flat_map(|s| s.text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .iter()
            .map(TranscriptSegment::end_seconds)
            .fold(0.0, f64::max)
    }

    /// Whether the transcript carries any text at all.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}

/// A video whose transcript has been retrieved.
#[derive(Debug, Clone)]
pub struct FetchedVideo {
    pub reference: VideoReference,
    pub title: String,
    pub transcript: Transcript,
}

/// Something that can retrieve captions (and optionally titles) for a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Retrieve the caption track.
    async fn fetch_transcript(&self, video: &VideoReference) -> Result<Transcript>;

    /// Look up the video title. `Ok(None)` when the source has no title lookup.
    async fn fetch_title(&self, _video: &VideoReference) -> Result<Option<String>> {
        Ok(None)
    }
}

/// URL to transcript pipeline.
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    fetch_title: bool,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>, fetch_title: bool) -> Self {
        Self { source, fetch_title }
    }

    /// Parse `url`, fetch its transcript and, if enabled, its title.
    ///
    /// Fails with `InvalidUrl` before any network call when the URL is not
    /// recognized, and with `TranscriptUnavailable` when the video has no
    /// usable captions.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedVideo> {
        let reference = VideoReference::parse(url)?;

        info!("Fetching transcript for {}", reference.video_id);
        let transcript = self.source.fetch_transcript(&reference).await?;

        if transcript.is_empty() {
            return Err(TubeQaError::TranscriptUnavailable {
                video_id: reference.video_id.clone(),
                reason: "the caption track is empty".to_string(),
            });
        }

        let title = if self.fetch_title {
            match self.source.fetch_title(&reference).await {
                Ok(Some(title)) if !title.trim().is_empty() => title,
                Ok(_) => PLACEHOLDER_TITLE.to_string(),
                Err(e) => {
                    warn!("Title lookup failed for {}: {}", reference.video_id, e);
                    PLACEHOLDER_TITLE.to_string()
                }
            }
        } else {
            PLACEHOLDER_TITLE.to_string()
        };

        info!(
            "Fetched {} caption lines for '{}' ({})",
            transcript.segments.len(),
            title,
            reference.video_id
        );

        Ok(FetchedVideo {
            reference,
            title,
            transcript,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by tests in other modules.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a canned transcript and counts calls.
    pub struct FakeTranscriptSource {
        pub segments: Vec<TranscriptSegment>,
        pub title: Option<String>,
        pub fail_title: bool,
        pub calls: AtomicUsize,
    }

    impl FakeTranscriptSource {
        pub fn with_text(lines: &[&str]) -> Self {
            Self {
                segments: lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| TranscriptSegment::new(*line, i as f64 * 5.0, 5.0))
                    .collect(),
                title: Some("A Test Video".to_string()),
                fail_title: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeTranscriptSource {
        async fn fetch_transcript(&self, video: &VideoReference) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.segments.is_empty() {
                return Err(TubeQaError::TranscriptUnavailable {
                    video_id: video.video_id.clone(),
                    reason: "subtitles are disabled".to_string(),
                });
            }
            Ok(Transcript::new(
                video.video_id.clone(),
                Some("en".to_string()),
                self.segments.clone(),
            ))
        }

        async fn fetch_title(&self, _video: &VideoReference) -> Result<Option<String>> {
            if self.fail_title {
                return Err(TubeQaError::RemoteService("oEmbed unavailable".to_string()));
            }
            Ok(self.title.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTranscriptSource;
    use super::*;

    #[test]
    fn test_full_text_collapses_whitespace() {
        let transcript = Transcript::new(
            "abc".to_string(),
            None,
            vec![
                TranscriptSegment::new("hello\nthere ", 0.0, 2.0),
                TranscriptSegment::new("  general kenobi", 2.0, 3.5),
            ],
        );
        assert_eq!(transcript.full_text(), "hello there general kenobi");
        assert!((transcript.duration_seconds() - 5.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_call() {
        let source = Arc::new(FakeTranscriptSource::with_text(&["hi"]));
        let fetcher = TranscriptFetcher::new(source.clone(), true);

        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, TubeQaError::InvalidUrl(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_with_title() {
        let source = Arc::new(FakeTranscriptSource::with_text(&["one", "two"]));
        let fetcher = TranscriptFetcher::new(source.clone(), true);

        let video = fetcher
            .fetch("https://www.youtube.com/watch?v=abc123XYZ")
            .await
            .unwrap();
        assert_eq!(video.reference.video_id, "abc123XYZ");
        assert_eq!(video.title, "A Test Video");
        assert_eq!(video.transcript.full_text(), "one two");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_title_falls_back_to_placeholder() {
        let mut source = FakeTranscriptSource::with_text(&["one"]);
        source.fail_title = true;
        let fetcher = TranscriptFetcher::new(Arc::new(source), true);
        let video = fetcher.fetch("https://youtu.be/abc123XYZ").await.unwrap();
        assert_eq!(video.title, PLACEHOLDER_TITLE);

        let fetcher = TranscriptFetcher::new(Arc::new(FakeTranscriptSource::with_text(&["one"])), false);
        let video = fetcher.fetch("https://youtu.be/abc123XYZ").await.unwrap();
        assert_eq!(video.title, PLACEHOLDER_TITLE);
    }

    #[tokio::test]
    async fn test_empty_captions_are_unavailable() {
        let fetcher = TranscriptFetcher::new(
            Arc::new(FakeTranscriptSource::with_text(&["  ", "\n"])),
            false,
        );
        let err = fetcher.fetch("https://youtu.be/abc123XYZ").await.unwrap_err();
        assert!(matches!(err, TubeQaError::TranscriptUnavailable { .. }));

        let fetcher = TranscriptFetcher::new(Arc::new(FakeTranscriptSource::with_text(&[])), false);
        let err = fetcher.fetch("https://youtu.be/abc123XYZ").await.unwrap_err();
        assert!(matches!(err, TubeQaError::TranscriptUnavailable { .. }));
    }
}
