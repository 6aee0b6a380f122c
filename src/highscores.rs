//! High score table
//!
//! Kept in memory for the lifetime of the page; nothing is written to disk.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    /// Game speed reached when the run ended
    pub game_speed: f32,
    /// Frames survived
    pub frames: u64,
}

/// Best runs, sorted by descending score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Record a finished run. Returns the 1-indexed rank, or None if it
    /// didn't make the table. Ties rank below earlier runs.
    pub fn record(&mut self, run: RunRecord) -> Option<usize> {
        if !self.qualifies(run.score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| run.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, run);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Best score so far (0 when empty)
    pub fn best(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunRecord {
        RunRecord {
            score,
            game_speed: 1.5,
            frames: score * 60,
        }
    }

    #[test]
    fn test_empty_table() {
        let table = HighScores::new();
        assert!(table.is_empty());
        assert_eq!(table.best(), 0);
        assert!(!table.qualifies(0));
        assert!(table.qualifies(1));
    }

    #[test]
    fn test_ranks_sorted_descending() {
        let mut table = HighScores::new();
        assert_eq!(table.record(run(50)), Some(1));
        assert_eq!(table.record(run(120)), Some(1));
        assert_eq!(table.record(run(80)), Some(2));
        // Tie goes below the existing entry
        assert_eq!(table.record(run(80)), Some(3));

        let scores: Vec<u64> = table.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![120, 80, 80, 50]);
        assert_eq!(table.best(), 120);
    }

    #[test]
    fn test_table_is_capped() {
        let mut table = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            table.record(run(s * 10));
        }
        assert_eq!(table.entries.len(), MAX_HIGH_SCORES);
        // Lowest is 10; 5 doesn't make it, 15 does
        assert_eq!(table.record(run(5)), None);
        assert_eq!(table.record(run(15)), Some(MAX_HIGH_SCORES));
        assert_eq!(table.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(table.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_zero_never_recorded() {
        let mut table = HighScores::new();
        assert_eq!(table.record(run(0)), None);
        assert!(table.is_empty());
    }
}
