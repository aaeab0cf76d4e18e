//! Obstacle probing and line-of-sight sampling.
//!
//! All checks test the full tank footprint, not just the center point:
//! a path only counts as clear if the whole AABB fits through it.

use glam::Vec2;

use treadline_core::constants::NAV_LOS_SAMPLES;
use treadline_core::types::{heading_vec, Aabb};

/// Whether a tank footprint centered at `center` overlaps any obstacle.
pub fn footprint_blocked(center: Vec2, half: Vec2, obstacles: &[Aabb]) -> bool {
    let footprint = Aabb::from_center(center, half);
    obstacles.iter().any(|obs| footprint.intersects(obs))
}

/// Whether a probe point `distance` px along `heading` from `pos` is clear.
pub fn probe_clear(pos: Vec2, heading: f32, distance: f32, half: Vec2, obstacles: &[Aabb]) -> bool {
    let probe = pos + heading_vec(heading) * distance;
    !footprint_blocked(probe, half, obstacles)
}

/// Sampled line-of-sight check between two points.
///
/// Interpolates NAV_LOS_SAMPLES footprints along the segment and fails
/// if any of them intersects an obstacle.
pub fn line_of_sight(from: Vec2, to: Vec2, half: Vec2, obstacles: &[Aabb]) -> bool {
    let samples = NAV_LOS_SAMPLES;
    for i in 0..samples {
        let t = i as f32 / (samples - 1) as f32;
        let sample = from + (to - from) * t;
        if footprint_blocked(sample, half, obstacles) {
            return false;
        }
    }
    true
}
