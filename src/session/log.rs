//! The conversation log of one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name offered for the downloaded conversation.
pub const TRANSCRIPT_FILE_NAME: &str = "youtube-qa-conversation-transcript.txt";

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub question: String,
    pub answer: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only record of a session's exchanges, in submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<LogEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exchange and return it.
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) -> &LogEntry {
        self.entries.push(LogEntry {
            question: question.into(),
            answer: answer.into(),
            recorded_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten the log into the downloadable plain-text transcript.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("Query: {}\nResponse: {}\n\n", e.question, e.answer))
            .collect()
    }
}
