//! JSON file persistence for the high score table.
//!
//! Persistence never takes the game down: a missing or unreadable file
//! loads as an empty table, and save errors are reported to the caller
//! (and logged) rather than panicking.

use std::fs;
use std::path::Path;

use crate::HighScoreTable;

/// Default file name, relative to wherever the caller keeps game data.
pub const HIGH_SCORE_FILE: &str = "treadline_high_scores.json";

/// Load the table from `path`. Any failure yields an empty table.
pub fn load(path: &Path) -> HighScoreTable {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            if path.exists() {
                log::warn!("Failed to read high scores from {}: {err}", path.display());
            }
            return HighScoreTable::new();
        }
    };

    match serde_json::from_str(&json) {
        Ok(table) => table,
        Err(err) => {
            log::warn!("Corrupt high score file {}: {err}", path.display());
            HighScoreTable::new()
        }
    }
}

/// Save the table to `path`, creating parent directories as needed.
pub fn save(path: &Path, table: &HighScoreTable) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create score directory: {e}"))?;
        }
    }
    let json = serde_json::to_string_pretty(table)
        .map_err(|e| format!("Failed to serialize high scores: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write high score file: {e}"))?;
    Ok(())
}
