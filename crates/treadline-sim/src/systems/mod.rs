//! All simulation systems, run in a fixed order each tick by the engine.

pub mod cleanup;
pub mod combat;
pub mod control;
pub mod fire_control;
pub mod movement;
pub mod powerups;
pub mod progression;
pub mod projectiles;
pub mod snapshot;
pub mod waves;
