//! High score leaderboard
//!
//! Persisted to LocalStorage, keeps the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Invaders destroyed
    pub score: u64,
    /// Level the run ended on
    pub level: u32,
    /// Cleared every level
    #[serde(default)]
    pub victory: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Leaderboard sorted by descending score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "invaderers_highscores";

    /// Whether a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a run. Returns its 1-based rank, or `None` if it did not qualify.
    /// Ties rank below earlier entries.
    pub fn add_score(&mut self, score: u64, level: u32, victory: bool, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let index = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            HighScoreEntry {
                score,
                level,
                victory,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load() -> Self {
        let scores: Self = storage::load_json(Self::STORAGE_KEY).unwrap_or_default();
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
    }
}

/// Format how long ago a timestamp was, relative to `now` (both in ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let mins = ((now - timestamp) / 60_000.0).max(0.0).floor() as u64;
    let hours = mins / 60;
    let days = hours / 24;
    match (days, hours, mins) {
        (0, 0, 0) => "Just now".to_string(),
        (0, 0, 1) => "1 min ago".to_string(),
        (0, 0, m) => format!("{} mins ago", m),
        (0, 1, _) => "1 hour ago".to_string(),
        (0, h, _) => format!("{} hours ago", h),
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) => format!("{} days ago", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!HighScores::default().qualifies(0));
    }

    #[test]
    fn test_sorted_insertion_and_rank() {
        let mut scores = HighScores::default();
        assert_eq!(scores.add_score(5, 1, false, 0.0), Some(1));
        assert_eq!(scores.add_score(9, 2, false, 0.0), Some(1));
        assert_eq!(scores.add_score(7, 2, false, 0.0), Some(2));
        assert_eq!(scores.add_score(7, 2, false, 1.0), Some(3));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![9, 7, 7, 5]);
        assert_eq!(scores.top_score(), Some(9));
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::default();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(s * 10, 1, false, 0.0);
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.add_score(5, 1, false, 0.0), None);
        assert_eq!(scores.add_score(15, 1, true, 0.0), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_format_age() {
        let min = 60_000.0;
        assert_eq!(format_age(0.0, 30_000.0), "Just now");
        assert_eq!(format_age(0.0, 5.0 * min), "5 mins ago");
        assert_eq!(format_age(0.0, 61.0 * min), "1 hour ago");
        assert_eq!(format_age(0.0, 25.0 * 60.0 * min), "Yesterday");
        assert_eq!(format_age(0.0, 72.0 * 60.0 * min), "3 days ago");
    }
}
