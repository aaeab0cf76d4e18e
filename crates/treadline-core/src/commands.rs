//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Held-key state for one player, resent whenever it changes.
/// The engine keeps the last received state per seat and applies it
/// every tick until replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// -1 reverse, 0 hold, 1 advance.
    pub throttle: i8,
    /// -1 counterclockwise, 0 hold, 1 clockwise.
    pub turn: i8,
    pub fire: bool,
}

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Match lifecycle ---
    /// Start a new match from the menu.
    StartGame { mode: GameMode },
    /// Return to the menu from the game-over screen.
    Restart,

    // --- In-match input ---
    /// Replace the held-key state for one seat.
    SetInput { slot: PlayerSlot, input: InputState },

    // --- Phase interactions ---
    /// Pick a stat upgrade during LevelUp (applies to the player at the
    /// front of the pending queue).
    ChooseUpgrade { stat: PlayerStat },
    /// Dismiss the enemy upgrade announcement and begin the next wave.
    AcknowledgeUpgradeWarning,
}
