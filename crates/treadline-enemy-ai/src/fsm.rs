//! Enemy navigation state machine.
//!
//! Pure functions that compute steering, throttle and fire intent for one
//! enemy tank per tick. The caller owns the ECS; this module sees plain
//! data and returns the updated `NavMemory` alongside the intents.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use treadline_core::components::NavMemory;
use treadline_core::constants::*;
use treadline_core::types::{angle_diff, normalize_angle, Aabb};

use crate::los::{line_of_sight, probe_clear};

/// Input to the navigation FSM for a single enemy.
pub struct NavContext<'a> {
    pub pos: Vec2,
    pub heading: f32,
    /// Tank footprint half-extents.
    pub half_extents: Vec2,
    /// Nearest alive player position.
    pub target: Vec2,
    pub obstacles: &'a [Aabb],
    pub memory: NavMemory,
}

/// Output from the navigation FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavUpdate {
    /// -1 counterclockwise, 0 hold, 1 clockwise.
    pub turn: i8,
    /// -1 reverse, 0 hold, 1 advance.
    pub throttle: i8,
    pub fire: bool,
    pub memory: NavMemory,
}

/// Evaluate the FSM for one enemy. `rng` is only consulted when a new
/// unstuck escape heading must be picked.
pub fn evaluate<R: Rng>(ctx: &NavContext, rng: &mut R) -> NavUpdate {
    let mut memory = track_movement(ctx);

    // Stuck recovery takes priority over everything else.
    if memory.stuck_ticks > NAV_STUCK_TRIGGER_TICKS {
        let escape = *memory.unstuck_heading.get_or_insert_with(|| {
            let offsets = [FRAC_PI_2, -FRAC_PI_2, PI];
            let offset = offsets[rng.gen_range(0..offsets.len())];
            normalize_angle(ctx.heading + offset)
        });

        // Give up on the maneuver after a while and re-evaluate fresh.
        if memory.stuck_ticks > NAV_STUCK_RESET_TICKS {
            memory.stuck_ticks = 0;
            memory.unstuck_heading = None;
        }

        return NavUpdate {
            turn: steer_toward(ctx.heading, escape),
            throttle: 1,
            fire: true,
            memory,
        };
    }

    let to_target = ctx.target - ctx.pos;
    let distance = to_target.length();
    let direct_angle = to_target.y.atan2(to_target.x);

    let turn = if line_of_sight(ctx.pos, ctx.target, ctx.half_extents, ctx.obstacles) {
        steer_on_clear_path(ctx, direct_angle)
    } else {
        follow_wall(ctx, direct_angle)
    };

    // Combat range band: close in when far, back off when crowded.
    let throttle = if distance > NAV_ADVANCE_RANGE {
        1
    } else if distance < NAV_RETREAT_RANGE {
        // Back out only when the space behind is open.
        let reverse = normalize_angle(ctx.heading + PI);
        if probe_clear(
            ctx.pos,
            reverse,
            NAV_CLEAR_PROBE_DISTANCE,
            ctx.half_extents,
            ctx.obstacles,
        ) {
            -1
        } else {
            0
        }
    } else {
        1
    };

    NavUpdate {
        turn,
        throttle,
        fire: true,
        memory,
    }
}

/// Update stuck bookkeeping from the distance moved since last tick.
fn track_movement(ctx: &NavContext) -> NavMemory {
    let mut memory = ctx.memory;
    let moved = (ctx.pos - memory.last_pos).length();
    if moved < NAV_STUCK_EPSILON {
        memory.stuck_ticks += 1;
    } else {
        memory.stuck_ticks = 0;
        memory.unstuck_heading = None;
    }
    memory.last_pos = ctx.pos;
    memory
}

/// Turn intent toward `target_heading`, with a deadband.
fn steer_toward(heading: f32, target_heading: f32) -> i8 {
    let diff = angle_diff(heading, target_heading);
    if diff.abs() <= NAV_TURN_DEADBAND {
        0
    } else if diff > 0.0 {
        1
    } else {
        -1
    }
}

/// Direct path is clear: turn toward the target, but only when the
/// post-turn heading keeps a short probe clear of obstacles.
fn steer_on_clear_path(ctx: &NavContext, direct_angle: f32) -> i8 {
    let diff = angle_diff(ctx.heading, direct_angle);
    let step = diff.abs().min(0.15);
    let candidate = normalize_angle(ctx.heading + step.copysign(diff));

    if probe_clear(
        ctx.pos,
        candidate,
        NAV_CLEAR_PROBE_DISTANCE,
        ctx.half_extents,
        ctx.obstacles,
    ) {
        steer_toward(ctx.heading, direct_angle)
    } else {
        0
    }
}

/// Direct path is blocked: probe ahead at increasing distances, and when
/// facing an obstacle pick the clear escape angle closest to the target
/// bearing. With nothing clear, turn clockwise and hope.
fn follow_wall(ctx: &NavContext, direct_angle: f32) -> i8 {
    let facing_obstacle = NAV_LOOK_AHEAD_DISTANCES.iter().any(|&dist| {
        !probe_clear(ctx.pos, ctx.heading, dist, ctx.half_extents, ctx.obstacles)
    });

    if !facing_obstacle {
        return steer_on_clear_path(ctx, direct_angle);
    }

    let escape_offsets = [
        FRAC_PI_4,
        -FRAC_PI_4,
        FRAC_PI_2,
        -FRAC_PI_2,
        3.0 * FRAC_PI_4,
        -3.0 * FRAC_PI_4,
    ];

    let mut best_angle: Option<f32> = None;
    let mut best_deviation = f32::INFINITY;

    for offset in escape_offsets {
        let candidate = normalize_angle(ctx.heading + offset);
        if !probe_clear(
            ctx.pos,
            candidate,
            NAV_ESCAPE_PROBE_DISTANCE,
            ctx.half_extents,
            ctx.obstacles,
        ) {
            continue;
        }
        let deviation = angle_diff(candidate, direct_angle).abs();
        if deviation < best_deviation {
            best_deviation = deviation;
            best_angle = Some(candidate);
        }
    }

    match best_angle {
        Some(angle) => steer_toward(ctx.heading, angle),
        None => 1,
    }
}
