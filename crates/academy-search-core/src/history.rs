//! Bounded log of recent queries, newest first.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::levenshtein::similarity;

/// Default number of queries retained.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Maximum number of "did you mean" hints.
const MAX_DID_YOU_MEAN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    /// The query exactly as the user typed it.
    pub query: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    /// Kind of the answer, `None` when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: Vec<QueryHistoryEntry>,
    max_entries: usize,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl QueryHistory {
    /// A history retaining at most `max_entries` queries (at least one).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a query, stamped with the current time.
    pub fn record(&mut self, query: &str, result_type: Option<&str>) {
        self.entries.insert(
            0,
            QueryHistoryEntry {
                query: query.to_string(),
                timestamp: Utc::now().timestamp_millis(),
                result_type: result_type.map(str::to_string),
            },
        );
        self.entries.truncate(self.max_entries);
    }

    pub fn entries(&self) -> &[QueryHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Hints for `query` drawn from history and a couple of keyword rules.
    ///
    /// Past queries that are similar but not identical (similarity strictly
    /// between 0.5 and 1.0) come first, newest first, at most three.
    pub fn context_suggestions(&self, query: &str) -> Vec<String> {
        let current = query.trim().to_lowercase();
        let mut suggestions: Vec<String> = self
            .entries
            .iter()
            .filter(|e| {
                let s = similarity(&current, &e.query);
                s > 0.5 && s < 1.0
            })
            .take(MAX_DID_YOU_MEAN)
            .map(|e| format!("Did you mean: \"{}\"?", e.query))
            .collect();

        if current.contains("module") || current.contains("phase") {
            suggestions.push("Try: \"Show all modules\"".to_string());
            suggestions.push("Try: \"What is module 1 about?\"".to_string());
        }
        if current.contains("tool") || current.contains("cursor") || current.contains("claude") {
            suggestions.push("Try: \"List all tools\"".to_string());
            suggestions.push("Try: \"How do I use Cursor?\"".to_string());
        }

        suggestions
    }
}
