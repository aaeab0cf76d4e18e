//! High score leaderboard for TREADLINE.
//!
//! Tracks the top 10 finished matches per game mode. One entry per match:
//! a co-op run records both names and the combined score in a single row.

use serde::{Deserialize, Serialize};

use treadline_core::enums::GameMode;

pub mod persistence;

/// Maximum number of high scores kept per mode.
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player names; one for single, two for co-op.
    pub names: Vec<String>,
    /// Wave reached.
    pub wave: u32,
    /// Final match score (combined over seats in co-op).
    pub score: u32,
    /// Unix timestamp (seconds) when achieved.
    pub timestamp: u64,
}

/// High score tables, one per mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreTable {
    pub single: Vec<ScoreEntry>,
    pub coop: Vec<ScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, mode: GameMode) -> &[ScoreEntry] {
        match mode {
            GameMode::Single => &self.single,
            GameMode::Coop => &self.coop,
        }
    }

    fn entries_mut(&mut self, mode: GameMode) -> &mut Vec<ScoreEntry> {
        match mode {
            GameMode::Single => &mut self.single,
            GameMode::Coop => &mut self.coop,
        }
    }

    /// Whether a score would make the table for its mode.
    pub fn qualifies(&self, mode: GameMode, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.entries(mode);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a finished match, keeping the table sorted descending and
    /// trimmed to MAX_HIGH_SCORES. Returns the 1-indexed rank achieved,
    /// or None if the score did not qualify.
    pub fn add_score(&mut self, mode: GameMode, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(mode, entry.score) {
            return None;
        }

        let entries = self.entries_mut(mode);
        let pos = entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                entries.insert(i, entry);
                i + 1
            }
            None => {
                entries.push(entry);
                entries.len()
            }
        };

        entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Top score for a mode, if any.
    pub fn top_score(&self, mode: GameMode) -> Option<u32> {
        self.entries(mode).first().map(|e| e.score)
    }
}
