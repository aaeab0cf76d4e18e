//! Events emitted by the simulation for audio and UI feedback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Audio events for the frontend sound system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A tank fired (one event per trigger, not per pellet).
    ShotFired { kind: TankKind },
    /// A projectile struck a tank.
    Hit { pos: Vec2 },
    /// A tank was destroyed.
    Explosion { pos: Vec2, kind: TankKind },
    /// A player collected a powerup.
    PowerupCollected { slot: PlayerSlot, kind: PowerupKind },
    /// All enemies in the wave are down.
    WaveCleared { wave: u32 },
    /// A player leveled up.
    LevelUp { slot: PlayerSlot, level: u32 },
    /// The global enemy upgrade fired.
    EnemyUpgraded { stat: EnemyStat, percent: u32 },
    /// Every player is dead.
    GameOver { score: u32, wave: u32 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
