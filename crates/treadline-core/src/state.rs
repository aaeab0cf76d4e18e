//! Game state snapshot — the complete visible state sent to the frontend each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{AmmoMod, UpgradeCounts};
use crate::enums::*;
use crate::events::{Alert, AudioEvent};
use crate::types::{Aabb, SimTime};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub wave: u32,
    pub tanks: Vec<TankView>,
    pub projectiles: Vec<ProjectileView>,
    pub powerups: Vec<PowerupView>,
    pub obstacles: Vec<ObstacleView>,
    pub players: Vec<PlayerHudView>,
    /// Seat currently choosing a stat upgrade (LevelUp phase).
    pub pending_upgrade: Option<PlayerSlot>,
    /// Last enemy upgrade, shown during EnemyUpgradeWarning.
    pub enemy_upgrade: Option<EnemyUpgradeView>,
    pub alerts: Vec<Alert>,
    pub audio_events: Vec<AudioEvent>,
    pub score: ScoreView,
}

/// A tank on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankView {
    pub kind: TankKind,
    /// Seat, for player tanks.
    pub slot: Option<PlayerSlot>,
    pub pos: Vec2,
    pub heading: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub shielded: bool,
    /// Tread trail positions (newest first).
    pub trail: Vec<Vec2>,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub heading: f32,
    pub fired_by: TankKind,
    pub homing: bool,
}

/// A powerup crate on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupView {
    pub pos: Vec2,
    pub kind: PowerupKind,
}

/// A static obstacle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

/// Per-player HUD data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHudView {
    pub slot: PlayerSlot,
    pub alive: bool,
    pub level: u32,
    pub xp: u32,
    /// XP needed to reach the next level.
    pub xp_to_next: u32,
    pub upgrades: UpgradeCounts,
    /// Seconds of shield remaining.
    pub shield_remaining_secs: Option<f64>,
    /// Seconds of speed boost remaining.
    pub speed_remaining_secs: Option<f64>,
    pub ammo: Option<AmmoMod>,
}

/// The last global enemy upgrade, for the warning screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyUpgradeView {
    pub stat: EnemyStat,
    pub percent: u32,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    /// Combined match score (summed over seats in co-op).
    pub score: u32,
    pub wave: u32,
    pub enemies_killed: u32,
}
