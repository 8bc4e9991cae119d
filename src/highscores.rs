//! High score leaderboard system
//!
//! Tracks the top 10 scores by player name. Persisted through a `ScoreStore`.

use serde::{Deserialize, Serialize};

use crate::persistence::{ScoreStore, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Calendar date (YYYY-MM-DD, UTC) when achieved
    pub date: String,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Outcome of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Beat the player's previous best on the board
    pub is_new_personal_best: bool,
    pub made_leaderboard: bool,
    /// 1-indexed rank, if the score is on the board
    pub rank: Option<usize>,
    /// Player's best before this run (0 if they had none)
    pub previous_best: u64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties with the last entry lose: earlier entries rank higher
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insertion_index(score) + 1)
    }

    /// Record a finished run for `name`.
    ///
    /// The entry goes below any existing entries with an equal score, and the
    /// board is trimmed back to its cap afterwards.
    pub fn record_score(&mut self, name: &str, score: u64, timestamp: u64) -> ScoreResult {
        let previous = self.best_score_for(name);
        let previous_best = previous.unwrap_or(0);
        let is_new_personal_best = score > previous_best;

        let index = self.insertion_index(score);
        self.entries.insert(
            index,
            HighScoreEntry {
                name: name.to_string(),
                score,
                date: format_date(timestamp),
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        let rank = (index < self.entries.len()).then_some(index + 1);
        log::debug!(
            "Recorded {} for {}: rank {:?}, previous best {}",
            score,
            name,
            rank,
            previous_best
        );

        ScoreResult {
            is_new_personal_best,
            made_leaderboard: rank.is_some(),
            rank,
            previous_best,
        }
    }

    /// Best `n` entries, highest first
    pub fn top_scores(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Highest score on the board for `name`
    pub fn best_score_for(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.score)
            .max()
    }

    /// Distinct player names on the board, sorted
    pub fn player_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// First slot whose score is strictly lower
    fn insertion_index(&self, score: u64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
    }

    /// Load the board from a store. Missing, unreadable or malformed data
    /// yields an empty board.
    pub fn load_from(store: &dyn ScoreStore) -> Self {
        let text = match store.load_raw() {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
            Err(err) => {
                log::warn!("Could not read high scores: {}", err);
                return Self::new();
            }
        };

        match serde_json::from_str::<HighScores>(&text) {
            Ok(mut scores) => {
                // Never trust the file's ordering or length
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("High score data is malformed, starting fresh: {}", err);
                Self::new()
            }
        }
    }

    /// Save the board to a store
    pub fn save_to(&self, store: &mut dyn ScoreStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.save_raw(&json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format a Unix timestamp (ms) as a UTC calendar date, `YYYY-MM-DD`
pub fn format_date(timestamp: u64) -> String {
    let days = (timestamp / 86_400_000) as i64;

    // Days since 1970-01-01 to civil date (proleptic Gregorian)
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!("{:04}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_and_rank() {
        let mut hs = HighScores::new();
        let r = hs.record_score("ann", 500, 0);
        assert_eq!(r.rank, Some(1));
        assert!(r.made_leaderboard);
        assert!(r.is_new_personal_best);
        assert_eq!(r.previous_best, 0);

        let r = hs.record_score("bob", 900, 1);
        assert_eq!(r.rank, Some(1));
        let r = hs.record_score("ann", 300, 2);
        assert_eq!(r.rank, Some(3));
        assert!(!r.is_new_personal_best);
        assert_eq!(r.previous_best, 500);

        let scores: Vec<u64> = hs.top_scores(10).iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 500, 300]);
        assert_eq!(hs.best_score_for("ann"), Some(500));
        assert_eq!(hs.best_score_for("nobody"), None);
    }

    #[test]
    fn test_ties_rank_by_insertion_order() {
        let mut hs = HighScores::new();
        hs.record_score("first", 1000, 10);
        let r = hs.record_score("second", 1000, 20);
        assert_eq!(r.rank, Some(2));
        let names: Vec<&str> = hs.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut hs = HighScores::new();
        for i in 1..=12u64 {
            hs.record_score("p", i * 100, i);
        }
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.top_score(), Some(1200));
        assert_eq!(hs.entries.last().map(|e| e.score), Some(300));

        // Too low for a full board
        let r = hs.record_score("late", 100, 99);
        assert!(!r.made_leaderboard);
        assert_eq!(r.rank, None);
        assert!(r.is_new_personal_best);
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);

        // Equal to the last entry also misses out
        assert!(!hs.qualifies(300));
        let r = hs.record_score("tie", 300, 100);
        assert!(!r.made_leaderboard);
    }

    #[test]
    fn test_qualifies_and_potential_rank() {
        let mut hs = HighScores::new();
        assert!(!hs.qualifies(0));
        assert_eq!(hs.potential_rank(50), Some(1));
        hs.record_score("a", 100, 0);
        hs.record_score("b", 50, 0);
        assert_eq!(hs.potential_rank(75), Some(2));
        assert_eq!(hs.potential_rank(50), Some(3));
    }

    #[test]
    fn test_top_scores_short_board() {
        let mut hs = HighScores::new();
        hs.record_score("a", 10, 0);
        assert_eq!(hs.top_scores(5).len(), 1);
        assert!(hs.top_scores(0).is_empty());
    }

    #[test]
    fn test_player_names_sorted_unique() {
        let mut hs = HighScores::new();
        hs.record_score("zed", 10, 0);
        hs.record_score("amy", 20, 0);
        hs.record_score("zed", 30, 0);
        assert_eq!(hs.player_names(), vec!["amy".to_string(), "zed".to_string()]);
        hs.clear();
        assert!(hs.is_empty());
        assert!(hs.player_names().is_empty());
    }

    #[test]
    fn test_store_round_trip_keeps_order() {
        let mut store = MemoryStore::new();
        let mut hs = HighScores::new();
        hs.record_score("a", 700, 1);
        hs.record_score("b", 700, 2);
        hs.record_score("c", 900, 3);
        hs.save_to(&mut store).unwrap();

        let loaded = HighScores::load_from(&store);
        assert_eq!(loaded.entries, hs.entries);
        let names: Vec<&str> = loaded.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_malformed_loads_empty() {
        let store = MemoryStore::with_data("{not json");
        assert!(HighScores::load_from(&store).is_empty());

        let store = MemoryStore::new();
        assert!(HighScores::load_from(&store).is_empty());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "1970-01-01");
        // 2000-02-29 12:00 UTC
        assert_eq!(format_date(951_825_600_000), "2000-02-29");
        // 2024-12-31 23:59:59 UTC
        assert_eq!(format_date(1_735_689_599_000), "2024-12-31");
    }
}
