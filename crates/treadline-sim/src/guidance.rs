//! Homing projectile guidance.
//!
//! Homing shots steer toward a live enemy tank with a clamped per-tick
//! turn rate. Target selection picks the nearest alive enemy; when the
//! target dies mid-flight the projectile re-acquires.

use glam::Vec2;
use hecs::World;

use treadline_core::components::{EnemyTag, Health, Transform};
use treadline_core::constants::HOMING_TURN_RATE;
use treadline_core::types::rotate_towards;

/// New heading after one tick of homing toward `target_pos`.
pub fn homing_heading(pos: Vec2, heading: f32, target_pos: Vec2) -> f32 {
    let to_target = target_pos - pos;
    if to_target.length_squared() < 1.0 {
        return heading;
    }
    let bearing = to_target.y.atan2(to_target.x);
    rotate_towards(heading, bearing, HOMING_TURN_RATE)
}

/// Nearest alive enemy tank to `from`, if any.
pub fn nearest_enemy(world: &World, from: Vec2) -> Option<hecs::Entity> {
    let mut best: Option<(hecs::Entity, f32)> = None;
    for (entity, (_, transform, health)) in world.query::<(&EnemyTag, &Transform, &Health)>().iter()
    {
        if health.hp <= 0.0 {
            continue;
        }
        let dist_sq = from.distance_squared(transform.pos);
        if best.map_or(true, |(_, d)| dist_sq < d) {
            best = Some((entity, dist_sq));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Whether `target` is still a valid homing target in this world.
pub fn target_alive(world: &World, target: hecs::Entity) -> bool {
    matches!(
        world.get::<&Health>(target),
        Ok(health) if health.hp > 0.0
    ) && world.get::<&EnemyTag>(target).is_ok()
}
