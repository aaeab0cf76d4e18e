//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    /// Normal combat; the only phase in which systems run.
    Playing,
    /// Frozen between waves while a player picks a stat upgrade.
    LevelUp,
    /// Frozen while the enemy upgrade announcement awaits acknowledgment.
    EnemyUpgradeWarning,
    GameOver,
}

/// Match mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Single,
    Coop,
}

/// Tank affiliation. Every tank carries this tag explicitly; no system
/// infers affiliation from which components happen to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    Enemy,
}

/// Player identity within a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    #[default]
    P1,
    P2,
}

/// Powerup crate contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Timed: blocks all incoming damage.
    Shield,
    /// Timed: movement speed x1.5.
    Speed,
    /// Ammo: quartered fire cooldown.
    RapidFire,
    /// Ammo: five-pellet spread per trigger.
    Shotgun,
    /// Ammo: projectiles steer toward the nearest enemy.
    Homing,
}

/// Decorative obstacle category. Rendering picks a sprite from this;
/// collision only ever uses the collider geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bunker,
    Barracks,
    Watchtower,
    Satellite,
    SupplyDepot,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Bunker,
        ObstacleKind::Barracks,
        ObstacleKind::Watchtower,
        ObstacleKind::Satellite,
        ObstacleKind::SupplyDepot,
    ];
}

/// Ammo-based weapon modification. At most one is active per player;
/// picking up another replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponMod {
    RapidFire,
    Shotgun,
    Homing,
}

/// Player-upgradable stats, in the order the level-up menu presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStat {
    MovementSpeed,
    ShotSpeed,
    ShotDistance,
    FireRate,
    PowerupDuration,
    Health,
}

impl PlayerStat {
    /// Menu order.
    pub const ALL: [PlayerStat; 6] = [
        PlayerStat::MovementSpeed,
        PlayerStat::ShotSpeed,
        PlayerStat::ShotDistance,
        PlayerStat::FireRate,
        PlayerStat::PowerupDuration,
        PlayerStat::Health,
    ];
}

/// Enemy stats eligible for the global wave upgrade roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyStat {
    MovementSpeed,
    ShotSpeed,
    ShotDistance,
    Health,
    Damage,
}

impl EnemyStat {
    pub const ALL: [EnemyStat; 5] = [
        EnemyStat::MovementSpeed,
        EnemyStat::ShotSpeed,
        EnemyStat::ShotDistance,
        EnemyStat::Health,
        EnemyStat::Damage,
    ];
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
