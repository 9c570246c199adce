//! Question history
//!
//! Caller-held, append-only, in-memory. The pipeline never sees it.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub question: String,
    pub final_query: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an answered question, stamped now
    pub fn record(&mut self, question: &str, final_query: &str) {
        self.record_at(question, final_query, Local::now());
    }

    pub fn record_at(&mut self, question: &str, final_query: &str, timestamp: DateTime<Local>) {
        self.entries.push(HistoryEntry {
            question: question.to_string(),
            final_query: final_query.to_string(),
            timestamp,
        });
    }

    /// Entries oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries newest first (display order)
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
