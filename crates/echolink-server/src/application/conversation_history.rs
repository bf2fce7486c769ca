//! Conversation History - per-call transcripts accumulated across webhooks
//!
//! Each speech turn arrives on a separate request, so the running transcript
//! lives here until the provider reports the call ended. Calls that never
//! get a terminal status callback are dropped once they have been idle
//! longer than the provider's maximum call length.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use echolink::{Speaker, TranscriptEntry};

/// Twilio's default call time limit (4 hours)
pub const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(4 * 60 * 60);

struct CallLog {
    started_at: Instant,
    last_active: Instant,
    entries: Vec<TranscriptEntry>,
}

impl CallLog {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            last_active: now,
            entries: Vec::new(),
        }
    }
}

pub struct ConversationHistory {
    calls: RwLock<HashMap<String, CallLog>>,
    max_idle: Duration,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_idle(max_idle: Duration) -> Self {
        Self {
            calls: RwLock::new(HashMap::new()),
            max_idle,
        }
    }

    /// Append a line, stamped with its offset from the call's first line
    ///
    /// Other calls idle for longer than `max_idle` are evicted first.
    pub async fn append(&self, call_sid: &str, speaker: Speaker, text: &str) -> TranscriptEntry {
        let mut calls = self.calls.write().await;

        let before = calls.len();
        calls.retain(|sid, log| sid == call_sid || log.last_active.elapsed() <= self.max_idle);
        let evicted = before - calls.len();
        if evicted > 0 {
            tracing::warn!("Evicted {} idle call transcripts without persisting", evicted);
        }

        let log = calls.entry(call_sid.to_string()).or_insert_with(CallLog::new);
        log.last_active = Instant::now();

        let entry = TranscriptEntry::at_offset(speaker, text, log.started_at.elapsed().as_secs());
        log.entries.push(entry.clone());
        entry
    }

    pub async fn snapshot(&self, call_sid: &str) -> Vec<TranscriptEntry> {
        let calls = self.calls.read().await;
        calls
            .get(call_sid)
            .map(|log| log.entries.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything recorded for the call
    pub async fn drain(&self, call_sid: &str) -> Vec<TranscriptEntry> {
        let mut calls = self.calls.write().await;
        calls
            .remove(call_sid)
            .map(|log| log.entries)
            .unwrap_or_default()
    }

    /// Put drained entries back in front of anything recorded since
    pub async fn restore(&self, call_sid: &str, mut entries: Vec<TranscriptEntry>) {
        if entries.is_empty() {
            return;
        }

        let mut calls = self.calls.write().await;
        let log = calls.entry(call_sid.to_string()).or_insert_with(CallLog::new);
        entries.append(&mut log.entries);
        log.entries = entries;
    }

    pub async fn active_calls(&self) -> usize {
        self.calls.read().await.len()
    }
}
