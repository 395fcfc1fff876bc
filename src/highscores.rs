//! High score leaderboard system
//!
//! Persisted as a JSON array, tracks the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player leaves the field blank
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Total play time in whole seconds
    pub time: u64,
    /// Locale-formatted date string supplied by the platform
    pub date: String,
}

impl HighScoreEntry {
    /// Build an entry, substituting the default name for blank input
    pub fn new(name: &str, score: u64, level: u32, time: u64, date: impl Into<String>) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            score,
            level,
            time,
            date: date.into(),
        }
    }
}

/// High score leaderboard, ordered by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bounce_breaker_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it onto the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry, re-sort descending by score and keep the top 10
    ///
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    /// Ties keep their existing order, so older entries rank first.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        self.entries.push(entry);
        let new_index = self.entries.len() - 1;

        // Stable sort keeps the appended entry after equal scores
        let mut indexed: Vec<(usize, HighScoreEntry)> =
            self.entries.drain(..).enumerate().collect();
        indexed.sort_by(|a, b| b.1.score.cmp(&a.1.score));

        let rank = indexed.iter().position(|(i, _)| *i == new_index);
        self.entries = indexed.into_iter().map(|(_, e)| e).collect();
        self.entries.truncate(MAX_HIGH_SCORES);

        rank.filter(|&r| r < MAX_HIGH_SCORES).map(|r| r + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores; malformed data is treated as an empty board
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };

        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                // Stored data may have been edited by hand
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Failed to load high scores, starting fresh: {e}");
                Self::new()
            }
        }
    }

    /// Save high scores
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry::new(name, score, 1, 30, "1/1/2026")
    }

    #[test]
    fn test_add_sorts_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry("a", 100)), Some(1));
        assert_eq!(scores.add(entry("b", 300)), Some(1));
        assert_eq!(scores.add(entry("c", 200)), Some(2));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_add_truncates_to_ten() {
        let mut scores = HighScores::new();
        for i in 1..=10 {
            scores.add(entry("p", i * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);

        // Too low: pushed, sorted, then cut
        assert_eq!(scores.add(entry("low", 5)), None);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(scores.entries.iter().all(|e| e.name != "low"));

        assert_eq!(scores.add(entry("high", 1000)), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut scores = HighScores::new();
        scores.add(entry("first", 50));
        assert_eq!(scores.add(entry("second", 50)), Some(2));
        assert_eq!(scores.entries[0].name, "first");
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        assert_eq!(entry("   ", 1).name, DEFAULT_PLAYER_NAME);
        assert_eq!(entry("  Ada ", 1).name, "Ada");
    }

    #[test]
    fn test_potential_rank() {
        let mut scores = HighScores::new();
        scores.add(entry("a", 300));
        scores.add(entry("b", 100));
        assert_eq!(scores.potential_rank(200), Some(2));
        assert_eq!(scores.potential_rank(50), Some(3));
    }

    #[test]
    fn test_predicted_rank_matches_add_on_full_board() {
        let mut scores = HighScores::new();
        for i in 1..=10 {
            scores.add(entry("p", i * 10));
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(10), None);

        for score in [15, 50, 55, 200] {
            let predicted = scores.potential_rank(score);
            assert!(predicted.is_some());
            assert_eq!(scores.clone().add(entry("new", score)), predicted);
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add(entry("a", 10));
        scores.add(entry("b", 20));
        scores.save(&mut store).unwrap();

        // Persisted as a bare array
        let raw = store.get(HighScores::STORAGE_KEY).unwrap();
        assert!(raw.starts_with('['));

        assert_eq!(HighScores::load(&store), scores);
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "][").unwrap();
        assert!(HighScores::load(&store).is_empty());

        store
            .set(HighScores::STORAGE_KEY, r#"{"score": 10}"#)
            .unwrap();
        assert!(HighScores::load(&store).is_empty());
    }
}
