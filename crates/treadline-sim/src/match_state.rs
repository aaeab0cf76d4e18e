//! Engine-side match state: wave scheduling, enemy upgrades, scoring.
//!
//! These are plain structs owned by the engine, not ECS components.
//! Everything about the current match lives either here or in the world;
//! there is no other mutable state.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use treadline_core::enums::EnemyStat;

/// One enemy waiting in the staggered spawn queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PendingSpawn {
    /// Spawn point just outside the arena edge.
    pub pos: Vec2,
    pub spawn_at_tick: u64,
}

/// Current wave and its outstanding spawns.
///
/// A wave counts as cleared only when both the field and this queue are
/// empty; enemies still waiting to spawn keep the wave alive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveState {
    pub wave: u32,
    pub pending: VecDeque<PendingSpawn>,
}

/// Compounding global multipliers applied to every enemy spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyMultipliers {
    pub move_speed: f32,
    pub shot_speed: f32,
    pub shot_range: f32,
    pub health: f32,
    pub damage: f32,
}

impl Default for EnemyMultipliers {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            shot_speed: 1.0,
            shot_range: 1.0,
            health: 1.0,
            damage: 1.0,
        }
    }
}

/// Enemy upgrade scheduler state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyUpgradeState {
    pub multipliers: EnemyMultipliers,
    /// Wave number (absolute) at which the next upgrade fires.
    pub next_upgrade_wave: u32,
    /// Most recent upgrade, shown on the warning screen.
    pub last_upgrade: Option<(EnemyStat, u32)>,
}

impl EnemyUpgradeState {
    /// Fresh scheduler with the first upgrade wave rolled.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        use treadline_core::constants::{ENEMY_UPGRADE_MAX_WAVES, ENEMY_UPGRADE_MIN_WAVES};
        Self {
            multipliers: EnemyMultipliers::default(),
            next_upgrade_wave: rng.gen_range(ENEMY_UPGRADE_MIN_WAVES..=ENEMY_UPGRADE_MAX_WAVES),
            last_upgrade: None,
        }
    }
}

/// Running kill tally for the match.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub enemies_killed: u32,
}

/// Powerup spawn timer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PowerupSpawner {
    pub last_spawn_tick: u64,
}
