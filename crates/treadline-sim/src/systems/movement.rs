//! Tank movement system.
//!
//! Integrates heading and position from the per-tick controls. A move
//! that would overlap an obstacle is rejected whole, so tanks slide to
//! a stop against walls rather than clipping into them. All tanks are
//! clamped to the arena, which also walks freshly spawned enemies in
//! from their off-screen spawn points.

use hecs::World;

use treadline_core::components::{
    Collider, Controls, Health, PositionHistory, PowerupState, Tank, TankStats, Transform,
};
use treadline_core::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, MAX_TRAIL_POINTS, SPEED_BOOST_MULTIPLIER, TANK_TURN_RATE,
    TRAIL_SPACING,
};
use treadline_core::types::{heading_vec, normalize_angle, Aabb};

use crate::world_setup::obstacle_aabbs;

/// Integrate movement for all alive tanks.
pub fn run(world: &mut World, current_tick: u64) {
    let obstacles = obstacle_aabbs(world);

    for (_entity, (_, transform, collider, stats, controls, health, powerups)) in world
        .query_mut::<(
            &Tank,
            &mut Transform,
            &Collider,
            &TankStats,
            &Controls,
            &Health,
            Option<&PowerupState>,
        )>()
    {
        if health.hp <= 0.0 {
            continue;
        }

        if controls.turn != 0 {
            transform.heading =
                normalize_angle(transform.heading + controls.turn as f32 * TANK_TURN_RATE);
        }

        if controls.throttle != 0 {
            let boosted = powerups
                .and_then(|p| p.speed_until)
                .is_some_and(|until| until > current_tick);
            let speed = if boosted {
                stats.move_speed * SPEED_BOOST_MULTIPLIER
            } else {
                stats.move_speed
            };

            let candidate =
                transform.pos + heading_vec(transform.heading) * speed * controls.throttle as f32;
            let footprint = Aabb::from_center(candidate, collider.half);
            if !obstacles.iter().any(|o| footprint.intersects(o)) {
                transform.pos = candidate;
            }
        }

        transform.pos.x = transform
            .pos
            .x
            .clamp(collider.half.x, ARENA_WIDTH - collider.half.x);
        transform.pos.y = transform
            .pos
            .y
            .clamp(collider.half.y, ARENA_HEIGHT - collider.half.y);
    }
}

/// Record tread-trail points, spaced by distance traveled.
pub fn update_history(world: &mut World) {
    for (_entity, (transform, history)) in
        world.query_mut::<(&Transform, &mut PositionHistory)>()
    {
        let spaced = history
            .points
            .first()
            .is_none_or(|last| last.distance(transform.pos) >= TRAIL_SPACING);
        if spaced {
            history.points.insert(0, transform.pos);
            history.points.truncate(MAX_TRAIL_POINTS);
        }
    }
}
