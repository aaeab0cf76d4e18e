//! Enemy navigation AI for TREADLINE.
//!
//! Implements the per-tank navigation state machine: stuck recovery,
//! line-of-sight checks, wall following, and combat range keeping.
//! Pure functions over plain data — no ECS dependency.

pub mod fsm;
pub mod los;

pub use treadline_core as core;
