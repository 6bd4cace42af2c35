//! Fixed-size word windows with overlap.

use super::{Chunker, ChunkingConfig, ContentChunk};
use crate::transcript::Transcript;

/// Splits a transcript into windows of `chunk_words` words, each sharing
/// `overlap_words` words with the previous one.
///
/// Every word inherits the time range of the caption line it came from, so a
/// chunk spans from the start of its first line to the end of its last.
pub struct WindowChunker;

impl WindowChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

struct TimedWord<'a> {
    word: &'a str,
    start: f64,
    end: f64,
}

impl Chunker for WindowChunker {
    fn chunk(&self, transcript: &Transcript, config: &ChunkingConfig) -> Vec<ContentChunk> {
        let words: Vec<TimedWord<'_>> = transcript
            .segments
            .iter()
            .flat_map(|seg| {
                seg.text.split_whitespace().map(move |word| TimedWord {
                    word,
                    start: seg.start_seconds,
                    end: seg.end_seconds(),
                })
            })
            .collect();

        if words.is_empty() {
            return Vec::new();
        }

        let size = config.chunk_words.max(1);
        let overlap = config.overlap_words.min(size - 1);
        let step = size - overlap;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + size).min(words.len());
            let window = &words[start..end];

            chunks.push(ContentChunk {
                content: window.iter().map(|w| w.word).collect::<Vec<_>>().join(" "),
                start_seconds: window[0].start,
                end_seconds: window.iter().map(|w| w.end).fold(window[0].end, f64::max),
                order: chunks.len() as i32,
            });

            if end == words.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSegment;

    fn transcript(lines: &[&str]) -> Transcript {
        Transcript::new(
            "test".to_string(),
            None,
            lines
                .iter()
                .enumerate()
                .map(|(i, l)| TranscriptSegment::new(*l, i as f64 * 10.0, 10.0))
                .collect(),
        )
    }

    #[test]
    fn test_window_chunking() {
        let chunker = WindowChunker::new();
        let transcript = transcript(&["a b c", "d e f", "g h"]);
        let config = ChunkingConfig {
            chunk_words: 4,
            overlap_words: 1,
        };

        let chunks = chunker.chunk(&transcript, &config);
        let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a b c d", "d e f g", "g h"]);

        assert_eq!(chunks[0].start_seconds, 0.0);
        assert_eq!(chunks[0].end_seconds, 20.0);
        assert_eq!(chunks[2].start_seconds, 20.0);
        assert_eq!(chunks[2].end_seconds, 30.0);
        assert_eq!(chunks.iter().map(|c| c.order).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_short_transcript_single_chunk() {
        let chunks = WindowChunker::new().chunk(&transcript(&["just a few words"]), &ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "just a few words");
    }

    #[test]
    fn test_degenerate_config_still_terminates() {
        let config = ChunkingConfig {
            chunk_words: 0,
            overlap_words: 10,
        };
        let chunks = WindowChunker::new().chunk(&transcript(&["a b c"]), &config);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_empty_transcript() {
        let chunks = WindowChunker::new().chunk(&transcript(&[" "]), &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }
}
