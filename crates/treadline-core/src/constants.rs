//! Simulation constants and tuning parameters.
//!
//! Distances are pixels, speeds pixels per tick, durations milliseconds
//! (converted to ticks with `ticks_from_ms`).

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Convert a millisecond duration to whole ticks.
pub const fn ticks_from_ms(ms: u64) -> u64 {
    ms * TICK_RATE as u64 / 1000
}

// --- Arena ---

/// Arena width in pixels.
pub const ARENA_WIDTH: f32 = 1920.0;

/// Arena height in pixels.
pub const ARENA_HEIGHT: f32 = 1080.0;

// --- Player tank ---

/// Player movement speed (px/tick).
pub const PLAYER_MOVE_SPEED: f32 = 2.0;

/// Player projectile speed (px/tick).
pub const PLAYER_SHOT_SPEED: f32 = 8.0;

/// Player projectile max travel (px).
pub const PLAYER_SHOT_DISTANCE: f32 = 500.0;

/// Player fire cooldown (ms).
pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 500;

/// Base duration for timed powerups (ms).
pub const PLAYER_POWERUP_DURATION_MS: u64 = 10_000;

/// Player max health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Player tank half-extents (px).
pub const PLAYER_TANK_HALF: (f32, f32) = (30.0, 22.5);

/// Player barrel length (px) — projectiles spawn at the muzzle.
pub const PLAYER_BARREL_LENGTH: f32 = 35.0;

/// Player projectile damage.
pub const PLAYER_SHOT_DAMAGE: f32 = 10.0;

// --- Enemy tank ---

/// Enemy movement speed (px/tick).
pub const ENEMY_MOVE_SPEED: f32 = 1.0;

/// Enemy projectile speed (px/tick).
pub const ENEMY_SHOT_SPEED: f32 = 6.0;

/// Enemy projectile max travel (px).
pub const ENEMY_SHOT_DISTANCE: f32 = 350.0;

/// Enemy fire cooldown (ms).
pub const ENEMY_FIRE_COOLDOWN_MS: u64 = 1500;

/// Enemy max health.
pub const ENEMY_MAX_HEALTH: f32 = 50.0;

/// Enemy tank half-extents (px).
pub const ENEMY_TANK_HALF: (f32, f32) = (27.5, 20.0);

/// Enemy barrel length (px).
pub const ENEMY_BARREL_LENGTH: f32 = 30.0;

/// Enemy projectile base damage.
pub const ENEMY_BASE_DAMAGE: f32 = 10.0;

// --- Tanks (shared) ---

/// Tank turn rate (rad/tick).
pub const TANK_TURN_RATE: f32 = 0.05;

// --- Projectiles ---

/// Projectile radius (px); collision uses the radius-square AABB.
pub const PROJECTILE_RADIUS: f32 = 5.0;

/// Homing projectile turn rate (rad/tick).
pub const HOMING_TURN_RATE: f32 = 0.05;

// --- Waves ---

/// Enemies in wave 1, single player.
pub const WAVE_BASE_ENEMIES_SINGLE: u32 = 1;

/// Enemies in wave 1, co-op.
pub const WAVE_BASE_ENEMIES_COOP: u32 = 3;

/// Additional enemies per wave.
pub const WAVE_ENEMIES_PER_WAVE: u32 = 1;

/// Distance outside the arena edge at which enemies spawn (px).
pub const ENEMY_SPAWN_DISTANCE: f32 = 100.0;

/// Delay between staggered enemy spawns within a wave (ms).
pub const ENEMY_SPAWN_DELAY_MS: u64 = 3000;

// --- Enemy upgrades ---

/// Minimum waves between enemy upgrades.
pub const ENEMY_UPGRADE_MIN_WAVES: u32 = 1;

/// Maximum waves between enemy upgrades.
pub const ENEMY_UPGRADE_MAX_WAVES: u32 = 5;

/// Possible upgrade percentages.
pub const ENEMY_UPGRADE_PERCENTAGES: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// Selection weights for the percentages (higher = more likely).
pub const ENEMY_UPGRADE_WEIGHTS: [u32; 6] = [40, 30, 15, 10, 3, 2];

// --- Obstacles ---

/// Obstacle count floor (wave 1).
pub const OBSTACLE_MIN_COUNT: u32 = 3;

/// Obstacle count ceiling.
pub const OBSTACLE_MAX_COUNT: u32 = 8;

/// Obstacle side length range (px).
pub const OBSTACLE_MIN_SIZE: f32 = 40.0;
pub const OBSTACLE_MAX_SIZE: f32 = 120.0;

/// Keep obstacles this far from player spawn points (px).
pub const OBSTACLE_MIN_DISTANCE_FROM_SPAWN: f32 = 150.0;

/// Minimum distance between obstacle centers (px).
pub const OBSTACLE_MIN_DISTANCE_BETWEEN: f32 = 80.0;

/// Margin between obstacles and the arena edges (px).
pub const OBSTACLE_EDGE_MARGIN: f32 = 50.0;

/// Placement attempts before giving up on a full field.
pub const OBSTACLE_MAX_ATTEMPTS: u32 = 100;

// --- Leveling ---

/// XP needed for the first level.
pub const BASE_LEVEL_XP: u32 = 500;

/// XP requirement growth per level (%).
pub const XP_INCREASE_PERCENT: u32 = 10;

/// XP for a projectile hit on an enemy.
pub const XP_PER_HIT: u32 = 10;

/// XP for destroying an enemy.
pub const XP_PER_KILL: u32 = 25;

/// Stat increase per upgrade pick (%).
pub const STAT_INCREASE_PERCENT: u32 = 10;

/// Cap on picks per stat (10 x 10% = +100%).
pub const MAX_STAT_UPGRADES: u8 = 10;

// --- Powerups ---

/// Speed boost multiplier.
pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;

/// Rapid fire ammo count.
pub const RAPID_FIRE_SHOTS: u32 = 100;

/// Rapid fire cooldown divisor.
pub const RAPID_FIRE_COOLDOWN_DIVISOR: u64 = 4;

/// Shotgun ammo count.
pub const SHOTGUN_SHOTS: u32 = 100;

/// Pellets per shotgun trigger.
pub const SHOTGUN_PELLETS: u32 = 5;

/// Total shotgun spread angle (radians).
pub const SHOTGUN_SPREAD: f32 = 0.3;

/// Homing ammo count.
pub const HOMING_SHOTS: u32 = 40;

/// Time between powerup spawns (ms).
pub const POWERUP_SPAWN_FREQUENCY_MS: u64 = 8000;

/// Maximum powerups on the field at once.
pub const MAX_POWERUPS: usize = 3;

/// Minimum spawn distance from any tank (px).
pub const POWERUP_MIN_DISTANCE_FROM_TANKS: f32 = 100.0;

/// Clearance between a powerup and obstacle boxes (px).
pub const POWERUP_OBSTACLE_CLEARANCE: f32 = 40.0;

/// Margin between powerup spawns and the arena edges (px).
pub const POWERUP_EDGE_MARGIN: f32 = 100.0;

/// Powerup crate half-extent (px).
pub const POWERUP_HALF_SIZE: f32 = 15.0;

/// Placement attempts before skipping a spawn cycle.
pub const POWERUP_MAX_ATTEMPTS: u32 = 50;

// --- Enemy navigation ---

/// Movement below this per tick counts as "not moving" (px).
pub const NAV_STUCK_EPSILON: f32 = 0.5;

/// Consecutive stuck ticks before the unstuck maneuver starts.
pub const NAV_STUCK_TRIGGER_TICKS: u32 = 30;

/// Stuck ticks after which the unstuck maneuver self-cancels.
pub const NAV_STUCK_RESET_TICKS: u32 = 60;

/// Steering deadband (rad); smaller deviations are not corrected.
pub const NAV_TURN_DEADBAND: f32 = 0.1;

/// Samples along the line-of-sight check.
pub const NAV_LOS_SAMPLES: u32 = 20;

/// Look-ahead probe distances for wall following (px).
pub const NAV_LOOK_AHEAD_DISTANCES: [f32; 3] = [60.0, 80.0, 100.0];

/// Probe distance when testing escape angles (px).
pub const NAV_ESCAPE_PROBE_DISTANCE: f32 = 60.0;

/// Probe distance when steering on a clear path (px).
pub const NAV_CLEAR_PROBE_DISTANCE: f32 = 50.0;

/// Advance while farther than this from the target (px).
pub const NAV_ADVANCE_RANGE: f32 = 200.0;

/// Back up while closer than this to the target (px).
pub const NAV_RETREAT_RANGE: f32 = 80.0;

// --- Scoring ---

/// Score contribution per wave reached.
pub const SCORE_PER_WAVE: u32 = 1000;

/// Score contribution per player level.
pub const SCORE_PER_LEVEL: u32 = 500;

// --- Display ---

/// Maximum number of trail points per tank.
pub const MAX_TRAIL_POINTS: usize = 50;

/// Distance a tank must travel between trail points (px).
pub const TRAIL_SPACING: f32 = 12.0;
