//! Progression system — XP thresholds, level-ups, and stat upgrades.

use hecs::World;

use treadline_core::components::{Health, PlayerTag, Progress, TankStats};
use treadline_core::constants::*;
use treadline_core::enums::{PlayerSlot, PlayerStat};
use treadline_core::events::AudioEvent;

/// XP required to finish `level` and reach the next one.
pub fn xp_threshold(level: u32) -> u32 {
    let growth = (1.0 + XP_INCREASE_PERCENT as f64 / 100.0).powi(level as i32 - 1);
    (BASE_LEVEL_XP as f64 * growth).round() as u32
}

/// Check XP against thresholds and level players up. Returns the seats
/// that leveled this tick, in seat order, one entry per level gained.
pub fn run(world: &mut World, audio_events: &mut Vec<AudioEvent>) -> Vec<PlayerSlot> {
    let mut leveled: Vec<PlayerSlot> = Vec::new();

    for (_entity, (tag, progress)) in world.query_mut::<(&PlayerTag, &mut Progress)>() {
        while progress.xp >= xp_threshold(progress.level) {
            progress.xp -= xp_threshold(progress.level);
            progress.level += 1;
            leveled.push(tag.slot);
            audio_events.push(AudioEvent::LevelUp {
                slot: tag.slot,
                level: progress.level,
            });
        }
    }

    leveled.sort();
    leveled
}

/// Apply one stat pick to the seat's tank. Returns whether the pick
/// landed; a pick on a stat already at the per-stat cap is rejected so
/// the pending level-up stays open for a different choice.
pub fn apply_upgrade(world: &mut World, slot: PlayerSlot, stat: PlayerStat) -> bool {
    for (_entity, (tag, progress, stats, health)) in
        world.query_mut::<(&PlayerTag, &mut Progress, &mut TankStats, &mut Health)>()
    {
        if tag.slot != slot {
            continue;
        }

        let picks = match stat {
            PlayerStat::MovementSpeed => &mut progress.upgrades.movement_speed,
            PlayerStat::ShotSpeed => &mut progress.upgrades.shot_speed,
            PlayerStat::ShotDistance => &mut progress.upgrades.shot_distance,
            PlayerStat::FireRate => &mut progress.upgrades.fire_rate,
            PlayerStat::PowerupDuration => &mut progress.upgrades.powerup_duration,
            PlayerStat::Health => &mut progress.upgrades.health,
        };
        if *picks >= MAX_STAT_UPGRADES {
            return false;
        }
        *picks += 1;
        let factor = 1.0 + *picks as f32 * STAT_INCREASE_PERCENT as f32 / 100.0;

        match stat {
            PlayerStat::MovementSpeed => stats.move_speed = PLAYER_MOVE_SPEED * factor,
            PlayerStat::ShotSpeed => stats.shot_speed = PLAYER_SHOT_SPEED * factor,
            PlayerStat::ShotDistance => stats.shot_range = PLAYER_SHOT_DISTANCE * factor,
            PlayerStat::FireRate => {
                let base = ticks_from_ms(PLAYER_FIRE_COOLDOWN_MS) as f64;
                stats.fire_cooldown_ticks =
                    (base / factor as f64).round().max(1.0) as u64;
            }
            // Duration scaling is read at pickup time.
            PlayerStat::PowerupDuration => {}
            PlayerStat::Health => {
                let new_max = PLAYER_MAX_HEALTH * factor;
                // The gained capacity arrives as immediate healing.
                health.hp += new_max - health.max_hp;
                health.max_hp = new_max;
            }
        }
        return true;
    }
    false
}
