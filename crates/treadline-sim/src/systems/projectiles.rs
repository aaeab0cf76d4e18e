//! Projectile flight system.
//!
//! Steers homing shots, advances every projectile along its heading,
//! and retires shots that run out of range, leave the arena, or bury
//! themselves in an obstacle.

use hecs::World;

use treadline_core::components::{Collider, Projectile, Transform};
use treadline_core::types::{heading_vec, Aabb};

use crate::guidance;
use crate::world_setup::{arena_bounds, obstacle_aabbs};

/// Advance all projectiles one tick.
pub fn run(world: &mut World) {
    steer_homing(world);

    let obstacles = obstacle_aabbs(world);
    let arena = arena_bounds();
    let mut retired: Vec<hecs::Entity> = Vec::new();

    for (entity, (projectile, transform, collider)) in
        world.query_mut::<(&mut Projectile, &mut Transform, &Collider)>()
    {
        transform.pos += heading_vec(transform.heading) * projectile.speed;
        projectile.traveled += projectile.speed;

        let spent = projectile.traveled >= projectile.max_distance;
        let out_of_bounds = !arena.contains(transform.pos);
        let buried = {
            let footprint = Aabb::from_center(transform.pos, collider.half);
            obstacles.iter().any(|o| footprint.intersects(o))
        };

        if spent || out_of_bounds || buried {
            retired.push(entity);
        }
    }

    for entity in retired {
        let _ = world.despawn(entity);
    }
}

/// Update homing targets and headings. Reads the world to validate
/// targets, so updates are buffered and applied afterwards.
fn steer_homing(world: &mut World) {
    let mut updates: Vec<(hecs::Entity, f32, Option<hecs::Entity>)> = Vec::new();

    for (entity, (projectile, transform)) in world.query::<(&Projectile, &Transform)>().iter() {
        if !projectile.homing {
            continue;
        }

        // Re-acquire when the lock goes stale (target died or despawned).
        let target = projectile
            .target
            .filter(|&t| guidance::target_alive(world, t))
            .or_else(|| guidance::nearest_enemy(world, transform.pos));

        let heading = match target {
            Some(t) => match world.get::<&Transform>(t) {
                Ok(target_transform) => {
                    guidance::homing_heading(transform.pos, transform.heading, target_transform.pos)
                }
                Err(_) => transform.heading,
            },
            None => transform.heading,
        };

        updates.push((entity, heading, target));
    }

    for (entity, heading, target) in updates {
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.heading = heading;
        }
        if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
            projectile.target = target;
        }
    }
}
