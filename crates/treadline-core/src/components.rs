//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Position and facing in arena space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec2,
    /// Heading in radians (0 = +x, counterclockwise).
    pub heading: f32,
}

/// AABB half-extents for collision. The box is always axis-aligned
/// regardless of heading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub half: Vec2,
}

/// Hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: f32,
    pub max_hp: f32,
}

/// Affiliation tag carried by every tank entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tank {
    pub kind: TankKind,
}

/// Marks a tank as player-controlled and identifies the seat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerTag {
    pub slot: PlayerSlot,
}

/// Marks a tank as AI-controlled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyTag;

/// Per-tank combat stats. Player upgrades and enemy wave multipliers
/// are applied to these values, not to the base constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TankStats {
    /// Movement speed (px/tick).
    pub move_speed: f32,
    /// Projectile speed (px/tick).
    pub shot_speed: f32,
    /// Projectile max travel (px).
    pub shot_range: f32,
    /// Ticks between shots.
    pub fire_cooldown_ticks: u64,
    /// Damage per projectile.
    pub damage: f32,
    /// Muzzle offset from tank center (px).
    pub barrel_length: f32,
}

/// Fire cooldown tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FireControl {
    /// Tick at which the next shot is allowed.
    pub ready_at_tick: u64,
}

/// Per-tick movement and fire intent. Written by the input bridge for
/// players and by the navigation FSM for enemies; consumed by the
/// movement and fire control systems.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Controls {
    /// -1 reverse, 0 hold, 1 advance.
    pub throttle: i8,
    /// -1 counterclockwise, 0 hold, 1 clockwise.
    pub turn: i8,
    pub fire: bool,
}

/// Remaining shots for an ammo-based weapon modification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmmoMod {
    pub kind: WeaponMod,
    pub remaining: u32,
}

/// Active powerup effects on a player tank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PowerupState {
    /// Tick at which the shield expires.
    pub shield_until: Option<u64>,
    /// Tick at which the speed boost expires.
    pub speed_until: Option<u64>,
    /// Active weapon mod, if any. Mutually exclusive; pickup replaces.
    pub ammo: Option<AmmoMod>,
}

/// Picks taken per upgradable stat. Each is capped at MAX_STAT_UPGRADES.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UpgradeCounts {
    pub movement_speed: u8,
    pub shot_speed: u8,
    pub shot_distance: u8,
    pub fire_rate: u8,
    pub powerup_duration: u8,
    pub health: u8,
}

/// Player XP and level progression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    /// XP accumulated toward the next level (also feeds the score).
    pub xp: u32,
    pub upgrades: UpgradeCounts,
}

/// A projectile in flight.
/// Not serialized: carries entity handles, which are world-local.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    /// Which side fired it; projectiles only hit the opposing side.
    pub fired_by: TankKind,
    /// The tank that fired it, for XP credit. Validated against the
    /// world before use; the owner may die while the shot flies.
    pub owner: Option<hecs::Entity>,
    pub damage: f32,
    /// Speed (px/tick) along the transform heading.
    pub speed: f32,
    /// Cumulative distance traveled (px).
    pub traveled: f32,
    /// Retire after traveling this far (px).
    pub max_distance: f32,
    /// Homing shots steer toward `target` each tick.
    pub homing: bool,
    /// Current homing target handle; re-acquired when it goes stale.
    pub target: Option<hecs::Entity>,
}

/// Marks an entity as a static obstacle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    /// Cosmetic only; no system reads this.
    pub kind: ObstacleKind,
}

/// A powerup crate waiting on the field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerupCrate {
    pub kind: PowerupKind,
}

/// Persistent navigation memory for the enemy FSM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavMemory {
    /// Position at the previous AI evaluation.
    pub last_pos: Vec2,
    /// Consecutive ticks with < 0.5 px of movement.
    pub stuck_ticks: u32,
    /// Escape heading while the unstuck maneuver is running.
    pub unstuck_heading: Option<f32>,
}

/// History of positions for tread-trail rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    /// Recent positions (newest first), up to MAX_TRAIL_POINTS.
    pub points: Vec<Vec2>,
}
