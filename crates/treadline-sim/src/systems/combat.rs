//! Combat system — projectile-versus-tank hit resolution.
//!
//! Projectiles only strike the opposing side. A shield absorbs the hit
//! but still consumes the projectile. Enemy damage and kills credit XP
//! to the owning player when it is still alive to collect.

use glam::Vec2;
use hecs::World;

use treadline_core::components::{
    Collider, Health, PlayerTag, PowerupState, Progress, Projectile, Tank, Transform,
};
use treadline_core::constants::{XP_PER_HIT, XP_PER_KILL};
use treadline_core::enums::TankKind;
use treadline_core::events::AudioEvent;
use treadline_core::types::Aabb;

use crate::match_state::ScoreState;

struct PendingHit {
    projectile: hecs::Entity,
    target: hecs::Entity,
    owner: Option<hecs::Entity>,
    damage: f32,
    pos: Vec2,
}

/// Resolve projectile hits.
pub fn run(
    world: &mut World,
    current_tick: u64,
    audio_events: &mut Vec<AudioEvent>,
    score: &mut ScoreState,
) {
    let mut hits: Vec<PendingHit> = Vec::new();

    {
        let mut tanks = world.query::<(&Tank, &Transform, &Collider, &Health)>();
        let tank_boxes: Vec<(hecs::Entity, TankKind, Aabb)> = tanks
            .iter()
            .filter(|(_, (_, _, _, health))| health.hp > 0.0)
            .map(|(entity, (tank, transform, collider, _))| {
                (entity, tank.kind, Aabb::from_center(transform.pos, collider.half))
            })
            .collect();
        drop(tanks);

        for (entity, (projectile, transform, collider)) in
            world.query::<(&Projectile, &Transform, &Collider)>().iter()
        {
            let shot_box = Aabb::from_center(transform.pos, collider.half);
            for &(target, kind, ref tank_box) in &tank_boxes {
                if kind == projectile.fired_by {
                    continue;
                }
                if shot_box.intersects(tank_box) {
                    hits.push(PendingHit {
                        projectile: entity,
                        target,
                        owner: projectile.owner,
                        damage: projectile.damage,
                        pos: transform.pos,
                    });
                    break;
                }
            }
        }
    }

    for hit in hits {
        // A hit consumes the projectile whether or not it does damage.
        let _ = world.despawn(hit.projectile);
        audio_events.push(AudioEvent::Hit { pos: hit.pos });

        let shielded = world
            .get::<&PowerupState>(hit.target)
            .ok()
            .and_then(|p| p.shield_until)
            .is_some_and(|until| until > current_tick);
        if shielded {
            continue;
        }

        let Ok(target_kind) = world.get::<&Tank>(hit.target).map(|t| t.kind) else {
            continue;
        };

        let killed = {
            let Ok(mut health) = world.get::<&mut Health>(hit.target) else {
                continue;
            };
            let was_alive = health.hp > 0.0;
            health.hp -= hit.damage;
            was_alive && health.hp <= 0.0
        };

        if target_kind == TankKind::Enemy {
            credit_xp(world, hit.owner, XP_PER_HIT);
            if killed {
                credit_xp(world, hit.owner, XP_PER_KILL);
                score.enemies_killed += 1;
            }
        }

        if killed {
            if let Ok(transform) = world.get::<&Transform>(hit.target) {
                audio_events.push(AudioEvent::Explosion {
                    pos: transform.pos,
                    kind: target_kind,
                });
            }
        }
    }
}

/// Award XP to the owning player, when it still exists and is a player.
fn credit_xp(world: &mut World, owner: Option<hecs::Entity>, amount: u32) {
    let Some(owner) = owner else {
        return;
    };
    if world.get::<&PlayerTag>(owner).is_err() {
        return;
    }
    if let Ok(mut progress) = world.get::<&mut Progress>(owner) {
        progress.xp += amount;
    }
}
