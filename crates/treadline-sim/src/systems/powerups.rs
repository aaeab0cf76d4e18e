//! Powerup system — crate spawning, pickup, and timed-effect expiry.
//!
//! Crates appear on a fixed cadence up to a field cap, placed by
//! rejection sampling away from tanks, obstacles and the arena edges.
//! Only players can collect them. Timed effects (shield, speed) stack
//! onto the player's powerup-duration upgrade; ammo mods replace each
//! other.

use glam::Vec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use treadline_core::components::{
    AmmoMod, Collider, Health, PlayerTag, PowerupCrate, PowerupState, Progress, Transform,
};
use treadline_core::constants::*;
use treadline_core::enums::{PowerupKind, WeaponMod};
use treadline_core::events::AudioEvent;
use treadline_core::types::Aabb;

use crate::match_state::PowerupSpawner;
use crate::world_setup::{obstacle_aabbs, spawn_powerup_crate};

/// Run the powerup lifecycle for one tick.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut PowerupSpawner,
    current_tick: u64,
    audio_events: &mut Vec<AudioEvent>,
) {
    spawn_cycle(world, rng, spawner, current_tick);
    collect(world, current_tick, audio_events);
    expire(world, current_tick);
}

/// Spawn a new crate when the cadence elapses and the field has room.
fn spawn_cycle(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut PowerupSpawner,
    current_tick: u64,
) {
    if current_tick < spawner.last_spawn_tick + ticks_from_ms(POWERUP_SPAWN_FREQUENCY_MS) {
        return;
    }

    // Timer stays elapsed while the field is full; a freed slot fills
    // on the next tick rather than after another full cadence.
    let on_field = world.query_mut::<&PowerupCrate>().into_iter().count();
    if on_field >= MAX_POWERUPS {
        return;
    }

    let tanks: Vec<Vec2> = world
        .query::<(&Transform, &Collider, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.hp > 0.0)
        .map(|(_, (transform, _, _))| transform.pos)
        .collect();
    let obstacles = obstacle_aabbs(world);

    for _ in 0..POWERUP_MAX_ATTEMPTS {
        let pos = Vec2::new(
            rng.gen_range(POWERUP_EDGE_MARGIN..=ARENA_WIDTH - POWERUP_EDGE_MARGIN),
            rng.gen_range(POWERUP_EDGE_MARGIN..=ARENA_HEIGHT - POWERUP_EDGE_MARGIN),
        );

        let near_tank = tanks
            .iter()
            .any(|&tank| pos.distance(tank) < POWERUP_MIN_DISTANCE_FROM_TANKS);
        if near_tank {
            continue;
        }

        let clearance = Aabb::from_center(
            pos,
            Vec2::splat(POWERUP_HALF_SIZE + POWERUP_OBSTACLE_CLEARANCE),
        );
        if obstacles.iter().any(|o| clearance.intersects(o)) {
            continue;
        }

        let kind = match rng.gen_range(0..5u8) {
            0 => PowerupKind::Shield,
            1 => PowerupKind::Speed,
            2 => PowerupKind::RapidFire,
            3 => PowerupKind::Shotgun,
            _ => PowerupKind::Homing,
        };
        spawn_powerup_crate(world, pos, kind);
        spawner.last_spawn_tick = current_tick;
        return;
    }
    // Placement attempts exhausted: wait a full cadence before retrying.
    spawner.last_spawn_tick = current_tick;
}

/// Hand crates to any alive player tank overlapping them.
fn collect(world: &mut World, current_tick: u64, audio_events: &mut Vec<AudioEvent>) {
    struct Pickup {
        crate_entity: hecs::Entity,
        player: hecs::Entity,
        kind: PowerupKind,
    }

    let mut pickups: Vec<Pickup> = Vec::new();

    {
        let mut players = world.query::<(&PlayerTag, &Transform, &Collider, &Health)>();
        let player_boxes: Vec<(hecs::Entity, Aabb)> = players
            .iter()
            .filter(|(_, (_, _, _, health))| health.hp > 0.0)
            .map(|(entity, (_, transform, collider, _))| {
                (entity, Aabb::from_center(transform.pos, collider.half))
            })
            .collect();
        drop(players);

        for (entity, (powerup, transform, collider)) in
            world.query::<(&PowerupCrate, &Transform, &Collider)>().iter()
        {
            let crate_box = Aabb::from_center(transform.pos, collider.half);
            if let Some(&(player, _)) = player_boxes
                .iter()
                .find(|(_, player_box)| crate_box.intersects(player_box))
            {
                pickups.push(Pickup {
                    crate_entity: entity,
                    player,
                    kind: powerup.kind,
                });
            }
        }
    }

    for pickup in pickups {
        if world.despawn(pickup.crate_entity).is_err() {
            continue;
        }

        let duration_picks = world
            .get::<&Progress>(pickup.player)
            .map(|p| p.upgrades.powerup_duration)
            .unwrap_or(0);
        let slot = match world.get::<&PlayerTag>(pickup.player) {
            Ok(tag) => tag.slot,
            Err(_) => continue,
        };

        let Ok(mut state) = world.get::<&mut PowerupState>(pickup.player) else {
            continue;
        };

        let until = current_tick + scaled_duration_ticks(duration_picks);
        match pickup.kind {
            PowerupKind::Shield => state.shield_until = Some(until),
            PowerupKind::Speed => state.speed_until = Some(until),
            PowerupKind::RapidFire => {
                state.ammo = Some(AmmoMod {
                    kind: WeaponMod::RapidFire,
                    remaining: scaled_shots(RAPID_FIRE_SHOTS, duration_picks),
                });
            }
            PowerupKind::Shotgun => {
                state.ammo = Some(AmmoMod {
                    kind: WeaponMod::Shotgun,
                    remaining: scaled_shots(SHOTGUN_SHOTS, duration_picks),
                });
            }
            PowerupKind::Homing => {
                state.ammo = Some(AmmoMod {
                    kind: WeaponMod::Homing,
                    remaining: scaled_shots(HOMING_SHOTS, duration_picks),
                });
            }
        }

        audio_events.push(AudioEvent::PowerupCollected {
            slot,
            kind: pickup.kind,
        });
    }
}

/// Clear timed effects that have run out.
fn expire(world: &mut World, current_tick: u64) {
    for (_entity, state) in world.query_mut::<&mut PowerupState>() {
        if state.shield_until.is_some_and(|until| until <= current_tick) {
            state.shield_until = None;
        }
        if state.speed_until.is_some_and(|until| until <= current_tick) {
            state.speed_until = None;
        }
    }
}

/// Effect duration in ticks, stretched by the powerup-duration upgrade.
fn scaled_duration_ticks(picks: u8) -> u64 {
    let ms = PLAYER_POWERUP_DURATION_MS * (100 + picks as u64 * STAT_INCREASE_PERCENT as u64) / 100;
    ticks_from_ms(ms)
}

/// Ammo count, stretched by the powerup-duration upgrade.
fn scaled_shots(base: u32, picks: u8) -> u32 {
    base * (100 + picks as u32 * STAT_INCREASE_PERCENT) / 100
}
