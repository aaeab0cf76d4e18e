//! TREADLINE simulation engine.
//!
//! Owns the hecs world and runs the fixed-tick game loop: player input,
//! enemy navigation, movement, fire control, projectiles, powerups,
//! waves, progression, and snapshot building.

pub mod engine;
pub mod guidance;
pub mod match_state;
pub mod systems;
pub mod world_setup;

#[cfg(test)]
mod tests;
