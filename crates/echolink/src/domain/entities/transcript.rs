//! Transcript - ordered lines spoken during a call

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Speaker;

/// One line of a call transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Offset from the start of the call, "MM:SS"
    pub time: String,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            time: time.into(),
        }
    }

    /// Entry spoken `offset_secs` seconds into the call
    pub fn at_offset(speaker: Speaker, text: impl Into<String>, offset_secs: u64) -> Self {
        Self::new(speaker, text, format_offset(offset_secs))
    }

    pub fn is_ai(&self) -> bool {
        self.speaker == Speaker::Ai
    }
}

/// Render a call-relative offset; minutes keep counting past the hour
pub fn format_offset(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
