//! Fire control system — turns fire intent into projectiles.
//!
//! Gates every trigger on the tank's cooldown, applies the active
//! weapon mod (rapid fire quarters the cooldown, shotgun fans five
//! pellets, homing locks the nearest enemy), and decrements ammo.

use glam::Vec2;
use hecs::World;

use treadline_core::components::{
    Collider, Controls, FireControl, Health, PowerupState, Projectile, Tank, TankStats, Transform,
};
use treadline_core::constants::{
    PROJECTILE_RADIUS, RAPID_FIRE_COOLDOWN_DIVISOR, SHOTGUN_PELLETS, SHOTGUN_SPREAD,
};
use treadline_core::enums::{TankKind, WeaponMod};
use treadline_core::events::AudioEvent;
use treadline_core::types::{heading_vec, normalize_angle};

use crate::guidance;

/// One resolved trigger pull, waiting to become projectile entities.
struct ShotRequest {
    muzzle: Vec2,
    heading: f32,
    fired_by: TankKind,
    owner: hecs::Entity,
    damage: f32,
    speed: f32,
    max_distance: f32,
    weapon_mod: Option<WeaponMod>,
}

/// Resolve fire intent into projectile spawns.
pub fn run(world: &mut World, current_tick: u64, audio_events: &mut Vec<AudioEvent>) {
    let mut requests: Vec<ShotRequest> = Vec::new();

    for (entity, (tank, transform, stats, controls, health, fire, powerups)) in world.query_mut::<(
        &Tank,
        &Transform,
        &TankStats,
        &Controls,
        &Health,
        &mut FireControl,
        Option<&mut PowerupState>,
    )>() {
        if !controls.fire || health.hp <= 0.0 || current_tick < fire.ready_at_tick {
            continue;
        }

        let weapon_mod = powerups.as_ref().and_then(|p| p.ammo).map(|a| a.kind);

        let mut cooldown = stats.fire_cooldown_ticks;
        if weapon_mod == Some(WeaponMod::RapidFire) {
            cooldown /= RAPID_FIRE_COOLDOWN_DIVISOR;
        }
        fire.ready_at_tick = current_tick + cooldown.max(1);

        // Ammo mods spend one round per trigger, not per pellet.
        if let Some(powerups) = powerups {
            if let Some(ammo) = powerups.ammo.as_mut() {
                ammo.remaining = ammo.remaining.saturating_sub(1);
                if ammo.remaining == 0 {
                    powerups.ammo = None;
                }
            }
        }

        requests.push(ShotRequest {
            muzzle: transform.pos + heading_vec(transform.heading) * stats.barrel_length,
            heading: transform.heading,
            fired_by: tank.kind,
            owner: entity,
            damage: stats.damage,
            speed: stats.shot_speed,
            max_distance: stats.shot_range,
            weapon_mod,
        });

        audio_events.push(AudioEvent::ShotFired { kind: tank.kind });
    }

    for request in requests {
        match request.weapon_mod {
            Some(WeaponMod::Shotgun) => {
                let center = (SHOTGUN_PELLETS / 2) as i32;
                for i in 0..SHOTGUN_PELLETS as i32 {
                    let offset = (i - center) as f32 * SHOTGUN_SPREAD / SHOTGUN_PELLETS as f32;
                    spawn_projectile(
                        world,
                        &request,
                        normalize_angle(request.heading + offset),
                        false,
                        None,
                    );
                }
            }
            Some(WeaponMod::Homing) => {
                let target = guidance::nearest_enemy(world, request.muzzle);
                spawn_projectile(world, &request, request.heading, true, target);
            }
            _ => {
                spawn_projectile(world, &request, request.heading, false, None);
            }
        }
    }
}

fn spawn_projectile(
    world: &mut World,
    request: &ShotRequest,
    heading: f32,
    homing: bool,
    target: Option<hecs::Entity>,
) {
    world.spawn((
        Projectile {
            fired_by: request.fired_by,
            owner: Some(request.owner),
            damage: request.damage,
            speed: request.speed,
            traveled: 0.0,
            max_distance: request.max_distance,
            homing,
            target,
        },
        Transform {
            pos: request.muzzle,
            heading,
        },
        Collider {
            half: Vec2::splat(PROJECTILE_RADIUS),
        },
    ));
}
