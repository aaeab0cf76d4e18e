//! Cleanup system: removes destroyed enemy tanks.
//!
//! Dead player tanks stay in the world so the wave-clear heal can
//! revive them; projectiles and crates are despawned at point of use.

use hecs::{Entity, World};

use treadline_core::components::{EnemyTag, Health};

/// Sweep dead enemies. Uses a pre-allocated buffer to avoid per-tick
/// allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_, health)) in world.query_mut::<(&EnemyTag, &Health)>() {
        if health.hp <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
