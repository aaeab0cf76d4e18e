//! Control system — writes movement and fire intent for every tank.
//!
//! Players get the held-key state for their seat. Enemies get the
//! navigation FSM from treadline-enemy-ai, targeting the nearest alive
//! player. With no players alive, enemies idle.

use glam::Vec2;
use hecs::World;
use rand_chacha::ChaCha8Rng;

use treadline_core::commands::InputState;
use treadline_core::components::{
    Collider, Controls, EnemyTag, Health, NavMemory, PlayerTag, Transform,
};
use treadline_core::enums::PlayerSlot;

use treadline_enemy_ai::fsm::{evaluate, NavContext};

use crate::world_setup::obstacle_aabbs;

/// Seat index into the per-slot input array.
pub fn seat_index(slot: PlayerSlot) -> usize {
    match slot {
        PlayerSlot::P1 => 0,
        PlayerSlot::P2 => 1,
    }
}

/// Apply player inputs and run enemy navigation.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, inputs: &[InputState; 2]) {
    // Players: copy the held-key state, dead tanks idle.
    for (_entity, (tag, health, controls)) in
        world.query_mut::<(&PlayerTag, &Health, &mut Controls)>()
    {
        if health.hp <= 0.0 {
            *controls = Controls::default();
            continue;
        }
        let input = inputs[seat_index(tag.slot)];
        controls.throttle = input.throttle;
        controls.turn = input.turn;
        controls.fire = input.fire;
    }

    let targets: Vec<Vec2> = world
        .query::<(&PlayerTag, &Transform, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.hp > 0.0)
        .map(|(_, (_, transform, _))| transform.pos)
        .collect();

    let obstacles = obstacle_aabbs(world);

    for (_entity, (_, transform, collider, health, memory, controls)) in world.query_mut::<(
        &EnemyTag,
        &Transform,
        &Collider,
        &Health,
        &mut NavMemory,
        &mut Controls,
    )>() {
        if health.hp <= 0.0 {
            *controls = Controls::default();
            continue;
        }

        let Some(target) = nearest(transform.pos, &targets) else {
            *controls = Controls::default();
            continue;
        };

        let ctx = NavContext {
            pos: transform.pos,
            heading: transform.heading,
            half_extents: collider.half,
            target,
            obstacles: &obstacles,
            memory: *memory,
        };

        let update = evaluate(&ctx, rng);
        *memory = update.memory;
        controls.throttle = update.throttle;
        controls.turn = update.turn;
        controls.fire = update.fire;
    }
}

fn nearest(from: Vec2, candidates: &[Vec2]) -> Option<Vec2> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            from.distance_squared(*a)
                .total_cmp(&from.distance_squared(*b))
        })
}
