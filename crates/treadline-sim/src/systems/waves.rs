//! Wave system — staggered enemy spawning, clear detection, and the
//! global enemy upgrade roll.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use treadline_core::components::{EnemyTag, Health, PlayerTag, PositionHistory, Transform};
use treadline_core::constants::*;
use treadline_core::enums::{EnemyStat, GameMode};
use treadline_core::events::AudioEvent;

use crate::match_state::{EnemyUpgradeState, PendingSpawn, WaveState};
use crate::world_setup::{enemy_spawn_position, player_start_position, spawn_enemy};

/// What the wave system observed this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveStatus {
    InProgress,
    /// Field and spawn queue are empty. Carries the upgrade roll when
    /// the scheduler fired this wave.
    Cleared {
        upgraded: Option<(EnemyStat, u32)>,
    },
}

/// Queue the staggered spawns for a wave starting now.
pub fn schedule(wave: &mut WaveState, rng: &mut ChaCha8Rng, mode: GameMode, current_tick: u64) {
    let base = match mode {
        GameMode::Single => WAVE_BASE_ENEMIES_SINGLE,
        GameMode::Coop => WAVE_BASE_ENEMIES_COOP,
    };
    let count = base + wave.wave.saturating_sub(1) * WAVE_ENEMIES_PER_WAVE;

    wave.pending.clear();
    for i in 0..count as u64 {
        wave.pending.push_back(PendingSpawn {
            pos: enemy_spawn_position(rng),
            spawn_at_tick: current_tick + i * ticks_from_ms(ENEMY_SPAWN_DELAY_MS),
        });
    }
}

/// Spawn due enemies and detect wave clear.
pub fn run(
    world: &mut World,
    wave: &mut WaveState,
    upgrades: &mut EnemyUpgradeState,
    rng: &mut ChaCha8Rng,
    mode: GameMode,
    current_tick: u64,
    audio_events: &mut Vec<AudioEvent>,
) -> WaveStatus {
    while let Some(next) = wave.pending.front() {
        if next.spawn_at_tick > current_tick {
            break;
        }
        let pos = next.pos;
        wave.pending.pop_front();
        spawn_enemy(world, pos, &upgrades.multipliers);
    }

    let enemies_alive = world
        .query_mut::<(&EnemyTag, &Health)>()
        .into_iter()
        .any(|(_, (_, health))| health.hp > 0.0);
    if enemies_alive || !wave.pending.is_empty() {
        return WaveStatus::InProgress;
    }

    audio_events.push(AudioEvent::WaveCleared { wave: wave.wave });
    reset_players(world, mode);

    let upgraded = if wave.wave >= upgrades.next_upgrade_wave {
        let (stat, percent) = roll_upgrade(rng);
        apply_upgrade(upgrades, stat, percent);
        upgrades.last_upgrade = Some((stat, percent));
        upgrades.next_upgrade_wave =
            wave.wave + rng.gen_range(ENEMY_UPGRADE_MIN_WAVES..=ENEMY_UPGRADE_MAX_WAVES);
        audio_events.push(AudioEvent::EnemyUpgraded { stat, percent });
        Some((stat, percent))
    } else {
        None
    };

    WaveStatus::Cleared { upgraded }
}

/// Put every player tank back at its start position at full health,
/// reviving the fallen and dropping stale trails.
fn reset_players(world: &mut World, mode: GameMode) {
    for (_entity, (tag, health, transform, history)) in world.query_mut::<(
        &PlayerTag,
        &mut Health,
        &mut Transform,
        &mut PositionHistory,
    )>() {
        health.hp = health.max_hp;
        transform.pos = player_start_position(mode, tag.slot);
        transform.heading = 0.0;
        history.points.clear();
    }
}

/// Roll a random enemy stat and a weighted percentage.
fn roll_upgrade(rng: &mut ChaCha8Rng) -> (EnemyStat, u32) {
    let stat = EnemyStat::ALL[rng.gen_range(0..EnemyStat::ALL.len())];

    let total: u32 = ENEMY_UPGRADE_WEIGHTS.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (percent, weight) in ENEMY_UPGRADE_PERCENTAGES
        .iter()
        .zip(ENEMY_UPGRADE_WEIGHTS.iter())
    {
        if roll < *weight {
            return (stat, *percent);
        }
        roll -= weight;
    }
    (stat, ENEMY_UPGRADE_PERCENTAGES[0])
}

/// Fold a rolled upgrade into the compounding multipliers. Affects
/// future spawns only; enemies already fielded keep their stats.
fn apply_upgrade(upgrades: &mut EnemyUpgradeState, stat: EnemyStat, percent: u32) {
    let factor = 1.0 + percent as f32 / 100.0;
    let m = &mut upgrades.multipliers;
    match stat {
        EnemyStat::MovementSpeed => m.move_speed *= factor,
        EnemyStat::ShotSpeed => m.shot_speed *= factor,
        EnemyStat::ShotDistance => m.shot_range *= factor,
        EnemyStat::Health => m.health *= factor,
        EnemyStat::Damage => m.damage *= factor,
    }
}
