//! Entity spawn factories for setting up the match world.
//!
//! Creates player tanks, enemy tanks, obstacles and powerup crates with
//! appropriate component bundles.

use glam::Vec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use treadline_core::components::*;
use treadline_core::constants::*;
use treadline_core::enums::*;
use treadline_core::types::Aabb;

use crate::match_state::EnemyMultipliers;

/// The playable area.
pub fn arena_bounds() -> Aabb {
    Aabb {
        min: Vec2::ZERO,
        max: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
    }
}

/// Start position for a seat. Single player spawns at center; co-op
/// seats split the arena in thirds.
pub fn player_start_position(mode: GameMode, slot: PlayerSlot) -> Vec2 {
    match (mode, slot) {
        (GameMode::Single, _) => Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
        (GameMode::Coop, PlayerSlot::P1) => Vec2::new(ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0),
        (GameMode::Coop, PlayerSlot::P2) => {
            Vec2::new(2.0 * ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0)
        }
    }
}

/// All spawn points obstacles must keep clear of, regardless of mode.
fn all_spawn_points() -> [Vec2; 3] {
    [
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
        Vec2::new(ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0),
        Vec2::new(2.0 * ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0),
    ]
}

/// Base combat stats for a player tank.
pub fn player_base_stats() -> TankStats {
    TankStats {
        move_speed: PLAYER_MOVE_SPEED,
        shot_speed: PLAYER_SHOT_SPEED,
        shot_range: PLAYER_SHOT_DISTANCE,
        fire_cooldown_ticks: ticks_from_ms(PLAYER_FIRE_COOLDOWN_MS),
        damage: PLAYER_SHOT_DAMAGE,
        barrel_length: PLAYER_BARREL_LENGTH,
    }
}

/// Set up a fresh match: one or two player tanks at their start positions.
pub fn setup_match(world: &mut World, mode: GameMode) {
    spawn_player(world, mode, PlayerSlot::P1);
    if mode == GameMode::Coop {
        spawn_player(world, mode, PlayerSlot::P2);
    }
}

/// Spawn a player tank for the given seat.
pub fn spawn_player(world: &mut World, mode: GameMode, slot: PlayerSlot) -> hecs::Entity {
    let pos = player_start_position(mode, slot);
    world.spawn((
        Tank {
            kind: TankKind::Player,
        },
        PlayerTag { slot },
        Transform { pos, heading: 0.0 },
        Collider {
            half: Vec2::new(PLAYER_TANK_HALF.0, PLAYER_TANK_HALF.1),
        },
        Health {
            hp: PLAYER_MAX_HEALTH,
            max_hp: PLAYER_MAX_HEALTH,
        },
        player_base_stats(),
        FireControl::default(),
        Controls::default(),
        PowerupState::default(),
        Progress {
            level: 1,
            xp: 0,
            upgrades: UpgradeCounts::default(),
        },
        PositionHistory::default(),
    ))
}

/// Spawn an enemy tank at `pos` with the global wave multipliers applied.
pub fn spawn_enemy(world: &mut World, pos: Vec2, mults: &EnemyMultipliers) -> hecs::Entity {
    let max_hp = ENEMY_MAX_HEALTH * mults.health;
    let stats = TankStats {
        move_speed: ENEMY_MOVE_SPEED * mults.move_speed,
        shot_speed: ENEMY_SHOT_SPEED * mults.shot_speed,
        shot_range: ENEMY_SHOT_DISTANCE * mults.shot_range,
        fire_cooldown_ticks: ticks_from_ms(ENEMY_FIRE_COOLDOWN_MS),
        damage: ENEMY_BASE_DAMAGE * mults.damage,
        barrel_length: ENEMY_BARREL_LENGTH,
    };

    world.spawn((
        Tank {
            kind: TankKind::Enemy,
        },
        EnemyTag,
        Transform { pos, heading: 0.0 },
        Collider {
            half: Vec2::new(ENEMY_TANK_HALF.0, ENEMY_TANK_HALF.1),
        },
        Health { hp: max_hp, max_hp },
        stats,
        FireControl::default(),
        Controls::default(),
        NavMemory {
            last_pos: pos,
            stuck_ticks: 0,
            unstuck_heading: None,
        },
        PositionHistory::default(),
    ))
}

/// Pick an enemy spawn position: a random edge, pushed out past the
/// arena boundary. The first bounds clamp walks it onto the field.
pub fn enemy_spawn_position(rng: &mut ChaCha8Rng) -> Vec2 {
    match rng.gen_range(0..4u8) {
        0 => Vec2::new(rng.gen_range(0.0..=ARENA_WIDTH), -ENEMY_SPAWN_DISTANCE),
        1 => Vec2::new(
            ARENA_WIDTH + ENEMY_SPAWN_DISTANCE,
            rng.gen_range(0.0..=ARENA_HEIGHT),
        ),
        2 => Vec2::new(
            rng.gen_range(0.0..=ARENA_WIDTH),
            ARENA_HEIGHT + ENEMY_SPAWN_DISTANCE,
        ),
        _ => Vec2::new(-ENEMY_SPAWN_DISTANCE, rng.gen_range(0.0..=ARENA_HEIGHT)),
    }
}

/// Remove every obstacle from the field.
pub fn clear_obstacles(world: &mut World) {
    let doomed: Vec<hecs::Entity> = world
        .query::<&Obstacle>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}

/// Generate the obstacle field for a wave by rejection sampling.
///
/// Count scales with the wave. Placements keep clear of every player
/// spawn point, other obstacles, and the arena edges; after
/// OBSTACLE_MAX_ATTEMPTS the field stays sparse rather than looping.
pub fn generate_obstacles(world: &mut World, rng: &mut ChaCha8Rng, wave: u32) {
    let target = (OBSTACLE_MIN_COUNT + wave.saturating_sub(1) / 2).min(OBSTACLE_MAX_COUNT);

    let mut placed: Vec<Vec2> = Vec::new();
    let mut attempts = 0;

    while (placed.len() as u32) < target && attempts < OBSTACLE_MAX_ATTEMPTS {
        attempts += 1;

        let half = Vec2::new(
            rng.gen_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE) / 2.0,
            rng.gen_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE) / 2.0,
        );
        let center = Vec2::new(
            rng.gen_range(half.x + OBSTACLE_EDGE_MARGIN..=ARENA_WIDTH - half.x - OBSTACLE_EDGE_MARGIN),
            rng.gen_range(
                half.y + OBSTACLE_EDGE_MARGIN..=ARENA_HEIGHT - half.y - OBSTACLE_EDGE_MARGIN,
            ),
        );

        let near_spawn = all_spawn_points()
            .iter()
            .any(|&spawn| center.distance(spawn) < OBSTACLE_MIN_DISTANCE_FROM_SPAWN);
        if near_spawn {
            continue;
        }

        let near_other = placed
            .iter()
            .any(|&other| center.distance(other) < OBSTACLE_MIN_DISTANCE_BETWEEN);
        if near_other {
            continue;
        }

        let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
        world.spawn((
            Obstacle { kind },
            Transform {
                pos: center,
                heading: 0.0,
            },
            Collider { half },
        ));
        placed.push(center);
    }
}

/// Spawn a powerup crate.
pub fn spawn_powerup_crate(world: &mut World, pos: Vec2, kind: PowerupKind) -> hecs::Entity {
    world.spawn((
        PowerupCrate { kind },
        Transform { pos, heading: 0.0 },
        Collider {
            half: Vec2::splat(POWERUP_HALF_SIZE),
        },
    ))
}

/// Collect every obstacle AABB (shared by movement, AI and projectiles).
pub fn obstacle_aabbs(world: &World) -> Vec<Aabb> {
    world
        .query::<(&Obstacle, &Transform, &Collider)>()
        .iter()
        .map(|(_, (_, t, c))| Aabb::from_center(t.pos, c.half))
        .collect()
}
