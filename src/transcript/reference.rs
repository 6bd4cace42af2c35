//! Video references parsed from YouTube URLs.

use crate::error::{Result, TubeQaError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid regex"));

/// A YouTube URL together with the video identifier parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// The URL as submitted (trimmed).
    pub url: String,
    /// The video identifier.
    pub video_id: String,
}

impl VideoReference {
    /// Parse a YouTube URL.
    ///
    /// Recognized shapes (scheme optional):
    /// - `youtube.com/watch?v=<id>`
    /// - `youtube.com/shorts/<id>`, `/embed/<id>`, `/live/<id>`, `/v/<id>`
    /// - `youtu.be/<id>`
    ///
    /// The `www.`, `m.` and `music.` subdomains and `youtube-nocookie.com` are
    /// accepted as well.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let invalid = || TubeQaError::InvalidUrl(input.to_string());

        if input.is_empty() {
            return Err(invalid());
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let host = parsed.host_str().ok_or_else(invalid)?.to_lowercase();
        let host = ["www.", "m.", "music."]
            .iter()
            .find_map(|prefix| host.strip_prefix(prefix))
            .unwrap_or(&host);

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let video_id = match host {
            "youtu.be" => segments.first().map(|s| s.to_string()),
            "youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
                ["watch"] => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                ["shorts" | "embed" | "live" | "v", id, ..] => Some(id.to_string()),
                _ => None,
            },
            _ => None,
        };

        match video_id {
            Some(id) if VIDEO_ID.is_match(&id) => Ok(Self {
                url: input.to_string(),
                video_id: id,
            }),
            _ => Err(invalid()),
        }
    }

    /// Canonical watch URL for the video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

impl std::fmt::Display for VideoReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> Option<String> {
        VideoReference::parse(input).ok().map(|r| r.video_id)
    }

    #[test]
    fn test_recognized_shapes() {
        let expected = Some("abc123XYZ".to_string());
        assert_eq!(id("https://www.youtube.com/watch?v=abc123XYZ"), expected);
        assert_eq!(id("https://www.youtube.com/watch?v=abc123XYZ&t=42s"), expected);
        assert_eq!(id("https://youtube.com/watch?feature=share&v=abc123XYZ"), expected);
        assert_eq!(id("http://m.youtube.com/watch?v=abc123XYZ"), expected);
        assert_eq!(id("www.youtube.com/watch?v=abc123XYZ"), expected);
        assert_eq!(id("https://youtube.com/shorts/abc123XYZ?feature=share"), expected);
        assert_eq!(id("https://www.youtube.com/embed/abc123XYZ"), expected);
        assert_eq!(id("https://www.youtube.com/live/abc123XYZ"), expected);
        assert_eq!(id("https://youtu.be/abc123XYZ?si=tracking"), expected);
        assert_eq!(id("https://www.youtube-nocookie.com/embed/abc123XYZ"), expected);
        assert_eq!(id("  https://youtu.be/dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
        assert_eq!(id("https://www.youtube.com/watch?v=a-b_c"), Some("a-b_c".to_string()));
    }

    #[test]
    fn test_unrecognized_inputs() {
        for input in [
            "not a url",
            "",
            "   ",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/watch?v=abc$123",
            "https://www.youtube.com/playlist?list=PLtest",
            "https://youtu.be/",
            "ftp://youtube.com/watch?v=abc123XYZ",
            "https://notyoutube.com/watch?v=abc123XYZ",
        ] {
            let err = VideoReference::parse(input).unwrap_err();
            assert!(matches!(err, TubeQaError::InvalidUrl(_)), "{input:?} gave {err:?}");
        }
    }

    #[test]
    fn test_reference_keeps_submitted_url() {
        let reference = VideoReference::parse(" https://youtu.be/abc123XYZ ").unwrap();
        assert_eq!(reference.url, "https://youtu.be/abc123XYZ");
        assert_eq!(reference.watch_url(), "https://www.youtube.com/watch?v=abc123XYZ");
    }
}
