//! Per-word practice progress
//!
//! A score per item: +1 for a clean round, -1 for a round with mistakes.
//! Scores are unbounded in both directions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Progress of a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub score: i32,
    /// Unix ms of the last outcome
    #[serde(rename = "lastSeen")]
    pub last_seen: u64,
    pub attempts: u32,
}

/// All progress, keyed by item id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressBook {
    pub items: BTreeMap<String, ProgressRecord>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn record(&self, id: &str) -> Option<&ProgressRecord> {
        self.items.get(id)
    }

    /// Current score (0 for items never seen)
    pub fn score(&self, id: &str) -> i32 {
        self.items.get(id).map(|r| r.score).unwrap_or(0)
    }

    /// Last outcome time (0 for items never seen)
    pub fn last_seen(&self, id: &str) -> u64 {
        self.items.get(id).map(|r| r.last_seen).unwrap_or(0)
    }

    /// Apply one outcome and return the new score
    pub fn record_outcome(&mut self, id: &str, correct: bool, now_ms: u64) -> i32 {
        let record = self.items.entry(id.to_string()).or_default();
        record.score += if correct { 1 } else { -1 };
        record.last_seen = now_ms;
        record.attempts += 1;
        log::debug!("Progress {}: score {} ({})", id, record.score, if correct { "correct" } else { "wrong" });
        record.score
    }

    /// Items at or above the mastery threshold
    pub fn mastered_count(&self, threshold: i32) -> usize {
        self.items.values().filter(|r| r.score >= threshold).count()
    }

    /// Overlay another book; its entries replace ours (remote wins)
    pub fn merge_over(&mut self, other: ProgressBook) {
        self.items.extend(other.items);
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> serde_json::Value {
        // A map of plain structs always serializes
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_move_score_by_one() {
        let mut book = ProgressBook::new();
        assert_eq!(book.score("cat"), 0);
        assert_eq!(book.record_outcome("cat", true, 10), 1);
        assert_eq!(book.record_outcome("cat", true, 20), 2);
        assert_eq!(book.record_outcome("cat", false, 30), 1);

        let record = book.record("cat").unwrap();
        assert_eq!(record.last_seen, 30);
        assert_eq!(record.attempts, 3);
    }

    #[test]
    fn test_score_can_go_negative() {
        let mut book = ProgressBook::new();
        for _ in 0..3 {
            book.record_outcome("dog", false, 1);
        }
        assert_eq!(book.score("dog"), -3);
    }

    #[test]
    fn test_merge_remote_wins() {
        let mut local = ProgressBook::new();
        local.record_outcome("a", true, 1);
        local.record_outcome("b", true, 1);

        let mut remote = ProgressBook::new();
        remote.record_outcome("b", false, 5);
        remote.record_outcome("c", true, 5);

        local.merge_over(remote);
        assert_eq!(local.score("a"), 1);
        assert_eq!(local.score("b"), -1);
        assert_eq!(local.score("c"), 1);
        assert_eq!(local.len(), 3);
    }

    #[test]
    fn test_json_shape() {
        let mut book = ProgressBook::new();
        book.record_outcome("sun", true, 42);
        let value = book.to_value();
        assert_eq!(value["items"]["sun"]["score"], 1);
        assert_eq!(value["items"]["sun"]["lastSeen"], 42);

        let parsed = ProgressBook::from_json(&book.to_json()).unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn test_empty_object_is_empty_book() {
        let book = ProgressBook::from_json("{}").unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_mastered_count() {
        let mut book = ProgressBook::new();
        for _ in 0..5 {
            book.record_outcome("a", true, 1);
        }
        book.record_outcome("b", true, 1);
        assert_eq!(book.mastered_count(5), 1);
    }
}
