//! High score leaderboard system
//!
//! Persisted under a fixed key as a flat JSON array, tracks top 10 scores.
//! Every game end does a read-modify-write against the store; storage
//! failures degrade to an empty or unchanged list.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::element::Element;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub element: Element,
    pub score: u64,
    /// Final size
    pub size: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "wafe_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would survive the top-10 cut
    pub fn qualifies(&self, score: u64) -> bool {
        self.potential_rank(score).is_some()
    }

    /// Get the rank a score would achieve (1-indexed, None if it would be cut).
    /// Ties rank after existing entries.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let pos = self.insertion_point(score);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    fn insertion_point(&self, score: u64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
    }

    /// Append, keep sorted, truncate to the top 10.
    /// Returns the rank achieved (1-indexed) or None if it fell off the list.
    pub fn add_entry(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let pos = self.insertion_point(entry.score);
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores; anything unreadable counts as an empty list
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    // The store is external; don't trust its order or length
                    scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Discarding malformed high scores: {}", e),
            },
            Ok(None) => log::info!("No high scores found, starting fresh"),
            Err(e) => log::warn!("High score store unavailable: {}", e),
        }
        Self::new()
    }

    /// Save high scores; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("Failed to save high scores: {}", e),
            },
            Err(e) => log::warn!("Failed to encode high scores: {}", e),
        }
    }

    /// Read-modify-write one finished game into the store
    pub fn record(store: &mut dyn KeyValueStore, entry: HighScoreEntry) -> Option<usize> {
        let mut scores = Self::load(store);
        let rank = scores.add_entry(entry);
        scores.save(store);
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            element: Element::Fire,
            score,
            size: score as f32 / 500.0,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_entry(entry("a", 500)), Some(1));
        assert_eq!(hs.add_entry(entry("b", 900)), Some(1));
        assert_eq!(hs.add_entry(entry("c", 700)), Some(2));
        // Tie ranks after the existing entry
        assert_eq!(hs.add_entry(entry("d", 700)), Some(3));
        let names: Vec<_> = hs.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a"]);
        assert_eq!(hs.top_score(), Some(900));
    }

    #[test]
    fn test_truncates_to_ten() {
        let mut hs = HighScores::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            hs.add_entry(entry("x", 1000 + i));
        }
        assert!(!hs.qualifies(999));
        assert_eq!(hs.add_entry(entry("low", 999)), None);
        assert_eq!(hs.len(), MAX_HIGH_SCORES);

        assert_eq!(hs.potential_rank(5000), Some(1));
        assert_eq!(hs.add_entry(entry("high", 5000)), Some(1));
        assert_eq!(hs.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(1001));
    }

    #[test]
    fn test_wire_format_is_flat_array() {
        let mut hs = HighScores::new();
        hs.add_entry(entry("Ana", 512));
        let json = serde_json::to_string(&hs).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"element\":\"fire\""));
        assert!(json.contains("\"timestamp\":1700000000000"));
    }

    #[test]
    fn test_record_read_modify_write() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScores::record(&mut store, entry("a", 600)), Some(1));
        assert_eq!(HighScores::record(&mut store, entry("b", 800)), Some(1));
        let hs = HighScores::load(&store);
        assert_eq!(hs.len(), 2);
        assert_eq!(hs.entries[0].name, "b");
    }

    #[test]
    fn test_degraded_storage() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "{garbage").unwrap();
        assert!(HighScores::load(&store).is_empty());

        let mut broken = UnavailableStore;
        assert!(HighScores::load(&broken).is_empty());
        // Still reports the rank it would have had
        assert_eq!(HighScores::record(&mut broken, entry("a", 10)), Some(1));
    }

    #[test]
    fn test_load_sorts_external_data() {
        let mut store = MemoryStore::new();
        let unsorted = serde_json::to_string(&vec![entry("lo", 1), entry("hi", 9)]).unwrap();
        store.set(HighScores::STORAGE_KEY, &unsorted).unwrap();
        let hs = HighScores::load(&store);
        assert_eq!(hs.top_score(), Some(9));
    }
}
