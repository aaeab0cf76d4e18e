//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use treadline_core::components::*;
use treadline_core::constants::{DT, SCORE_PER_LEVEL, SCORE_PER_WAVE};
use treadline_core::enums::*;
use treadline_core::events::{Alert, AudioEvent};
use treadline_core::state::*;
use treadline_core::types::{Aabb, SimTime};

use crate::match_state::{EnemyUpgradeState, ScoreState};
use crate::systems::progression::xp_threshold;

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    mode: GameMode,
    wave: u32,
    pending_upgrade: Option<PlayerSlot>,
    upgrades: &EnemyUpgradeState,
    alerts: Vec<Alert>,
    audio_events: Vec<AudioEvent>,
    score: &ScoreState,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        mode,
        wave,
        tanks: build_tanks(world, time.tick),
        projectiles: build_projectiles(world),
        powerups: build_powerups(world),
        obstacles: build_obstacles(world),
        players: build_players(world, time.tick),
        pending_upgrade,
        enemy_upgrade: upgrades
            .last_upgrade
            .map(|(stat, percent)| EnemyUpgradeView { stat, percent }),
        alerts,
        audio_events,
        score: ScoreView {
            score: compute_score(world, wave),
            wave,
            enemies_killed: score.enemies_killed,
        },
    }
}

/// Combined match score: per seat, waves reached plus levels plus
/// current XP.
pub fn compute_score(world: &World, wave: u32) -> u32 {
    world
        .query::<(&PlayerTag, &Progress)>()
        .iter()
        .map(|(_, (_, progress))| {
            wave * SCORE_PER_WAVE + progress.level * SCORE_PER_LEVEL + progress.xp
        })
        .sum()
}

/// Build TankView list, players first in seat order.
fn build_tanks(world: &World, current_tick: u64) -> Vec<TankView> {
    let mut tanks: Vec<TankView> = world
        .query::<(
            &Tank,
            &Transform,
            &Health,
            &PositionHistory,
            Option<&PlayerTag>,
            Option<&PowerupState>,
        )>()
        .iter()
        .map(|(_, (tank, transform, health, history, tag, powerups))| TankView {
            kind: tank.kind,
            slot: tag.map(|t| t.slot),
            pos: transform.pos,
            heading: transform.heading,
            hp: health.hp,
            max_hp: health.max_hp,
            shielded: powerups
                .and_then(|p| p.shield_until)
                .is_some_and(|until| until > current_tick),
            trail: history.points.clone(),
        })
        .collect();

    tanks.sort_by_key(|t| (t.kind == TankKind::Enemy, t.slot));
    tanks
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Transform)>()
        .iter()
        .map(|(_, (projectile, transform))| ProjectileView {
            pos: transform.pos,
            heading: transform.heading,
            fired_by: projectile.fired_by,
            homing: projectile.homing,
        })
        .collect()
}

fn build_powerups(world: &World) -> Vec<PowerupView> {
    world
        .query::<(&PowerupCrate, &Transform)>()
        .iter()
        .map(|(_, (powerup, transform))| PowerupView {
            pos: transform.pos,
            kind: powerup.kind,
        })
        .collect()
}

fn build_obstacles(world: &World) -> Vec<ObstacleView> {
    world
        .query::<(&Obstacle, &Transform, &Collider)>()
        .iter()
        .map(|(_, (obstacle, transform, collider))| ObstacleView {
            kind: obstacle.kind,
            bounds: Aabb::from_center(transform.pos, collider.half),
        })
        .collect()
}

/// Build per-seat HUD data, sorted by seat.
fn build_players(world: &World, current_tick: u64) -> Vec<PlayerHudView> {
    let mut players: Vec<PlayerHudView> = world
        .query::<(&PlayerTag, &Health, &Progress, &PowerupState)>()
        .iter()
        .map(|(_, (tag, health, progress, powerups))| PlayerHudView {
            slot: tag.slot,
            alive: health.hp > 0.0,
            level: progress.level,
            xp: progress.xp,
            xp_to_next: xp_threshold(progress.level),
            upgrades: progress.upgrades,
            shield_remaining_secs: remaining_secs(powerups.shield_until, current_tick),
            speed_remaining_secs: remaining_secs(powerups.speed_until, current_tick),
            ammo: powerups.ammo,
        })
        .collect();

    players.sort_by_key(|p| p.slot);
    players
}

fn remaining_secs(until: Option<u64>, current_tick: u64) -> Option<f64> {
    until
        .filter(|&until| until > current_tick)
        .map(|until| (until - current_tick) as f64 * DT)
}
