//! Tests for the game engine: determinism, the phase machine, combat,
//! waves, progression, and powerups.

use glam::Vec2;

use treadline_core::commands::{InputState, PlayerCommand};
use treadline_core::components::*;
use treadline_core::constants::*;
use treadline_core::enums::*;
use treadline_core::events::AudioEvent;

use crate::engine::{GameEngine, SimConfig};
use crate::match_state::EnemyMultipliers;
use crate::systems::progression::xp_threshold;
use crate::world_setup;

fn started(seed: u64, mode: GameMode) -> GameEngine {
    let mut engine = GameEngine::new(SimConfig { seed });
    engine.queue_command(PlayerCommand::StartGame { mode });
    engine.tick();
    engine
}

fn hold_input(engine: &mut GameEngine, slot: PlayerSlot, throttle: i8, turn: i8, fire: bool) {
    engine.queue_command(PlayerCommand::SetInput {
        slot,
        input: InputState {
            throttle,
            turn,
            fire,
        },
    });
}

fn player_entity(engine: &GameEngine, slot: PlayerSlot) -> hecs::Entity {
    engine
        .world()
        .query::<&PlayerTag>()
        .iter()
        .find(|(_, tag)| tag.slot == slot)
        .map(|(entity, _)| entity)
        .unwrap()
}

fn player_pos(engine: &GameEngine, slot: PlayerSlot) -> Vec2 {
    let entity = player_entity(engine, slot);
    engine.world().get::<&Transform>(entity).unwrap().pos
}

fn kill_all_enemies(engine: &mut GameEngine) {
    engine.wave_state_mut().pending.clear();
    for (_, (_, health)) in engine.world_mut().query_mut::<(&EnemyTag, &mut Health)>() {
        health.hp = 0.0;
    }
}

fn count_player_shots(engine: &GameEngine) -> usize {
    engine
        .world()
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.fired_by == TankKind::Player)
        .count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = GameEngine::new(SimConfig { seed: 12345 });
    let mut engine_b = GameEngine::new(SimConfig { seed: 12345 });

    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_command(PlayerCommand::StartGame {
            mode: GameMode::Single,
        });
        hold_input(engine, PlayerSlot::P1, 1, 1, true);
    }

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = GameEngine::new(SimConfig { seed: 111 });
    let mut engine_b = GameEngine::new(SimConfig { seed: 222 });

    engine_a.queue_command(PlayerCommand::StartGame {
        mode: GameMode::Single,
    });
    engine_b.queue_command(PlayerCommand::StartGame {
        mode: GameMode::Single,
    });

    // Obstacle layout and enemy spawn edges come from the seed, so the
    // first in-match snapshots already differ.
    let mut diverged = false;
    for _ in 0..60 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Match lifecycle ----

#[test]
fn test_start_game_single() {
    let engine = started(42, GameMode::Single);

    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(
        player_pos(&engine, PlayerSlot::P1),
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
    );

    let player_count = engine.world().query::<&PlayerTag>().iter().count();
    assert_eq!(player_count, 1);
}

#[test]
fn test_start_game_coop_spawns_two_tanks() {
    let engine = started(42, GameMode::Coop);

    assert_eq!(
        player_pos(&engine, PlayerSlot::P1),
        Vec2::new(ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0)
    );
    assert_eq!(
        player_pos(&engine, PlayerSlot::P2),
        Vec2::new(2.0 * ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0)
    );
}

#[test]
fn test_start_game_ignored_while_playing() {
    let mut engine = started(42, GameMode::Single);
    engine.queue_command(PlayerCommand::StartGame {
        mode: GameMode::Coop,
    });
    let snap = engine.tick();
    assert_eq!(snap.mode, GameMode::Single);
}

#[test]
fn test_obstacles_respect_placement_rules() {
    let engine = started(7, GameMode::Single);

    let spawns = [
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
        Vec2::new(ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0),
        Vec2::new(2.0 * ARENA_WIDTH / 3.0, ARENA_HEIGHT / 2.0),
    ];

    let obstacles = world_setup::obstacle_aabbs(engine.world());
    assert!(!obstacles.is_empty(), "Wave 1 should place obstacles");
    assert!(obstacles.len() <= OBSTACLE_MAX_COUNT as usize);

    for bounds in &obstacles {
        assert!(
            world_setup::arena_bounds().contains_aabb(bounds),
            "Obstacle must lie inside the arena: {bounds:?}"
        );
        for spawn in spawns {
            assert!(
                bounds.center().distance(spawn) >= OBSTACLE_MIN_DISTANCE_FROM_SPAWN,
                "Obstacle too close to a spawn point: {bounds:?}"
            );
        }
    }
}

#[test]
fn test_obstacle_views_carry_the_decorative_kind() {
    let mut engine = started(7, GameMode::Single);
    let snap = engine.tick();

    let world_kinds: Vec<ObstacleKind> = engine
        .world()
        .query::<&Obstacle>()
        .iter()
        .map(|(_, obstacle)| obstacle.kind)
        .collect();
    let view_kinds: Vec<ObstacleKind> = snap.obstacles.iter().map(|o| o.kind).collect();

    assert!(!view_kinds.is_empty());
    assert_eq!(view_kinds, world_kinds, "Views mirror the rolled kinds");
}

#[test]
fn test_sixty_ticks_is_one_second() {
    let mut engine = started(42, GameMode::Single);
    for _ in 0..59 {
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(snap.time.tick, 60);
    assert!((snap.time.elapsed_secs - 1.0).abs() < 1e-9);
}

// ---- Movement ----

#[test]
fn test_throttle_moves_player_along_heading() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());

    let start = player_pos(&engine, PlayerSlot::P1);
    hold_input(&mut engine, PlayerSlot::P1, 1, 0, false);
    for _ in 0..50 {
        engine.tick();
    }

    let pos = player_pos(&engine, PlayerSlot::P1);
    assert!(
        (pos.x - (start.x + 50.0 * PLAYER_MOVE_SPEED)).abs() < 1e-3,
        "Expected 2 px/tick east, got {pos:?}"
    );
    assert!((pos.y - start.y).abs() < 1e-3);
}

#[test]
fn test_turn_rate() {
    let mut engine = started(42, GameMode::Single);

    hold_input(&mut engine, PlayerSlot::P1, 0, 1, false);
    for _ in 0..10 {
        engine.tick();
    }

    let entity = player_entity(&engine, PlayerSlot::P1);
    let heading = engine.world().get::<&Transform>(entity).unwrap().heading;
    assert!(
        (heading - 10.0 * TANK_TURN_RATE).abs() < 1e-5,
        "Expected 0.05 rad/tick, got {heading}"
    );
}

#[test]
fn test_movement_blocked_by_obstacle() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());

    // Wall directly east of the player.
    let start = player_pos(&engine, PlayerSlot::P1);
    engine.world_mut().spawn((
        Obstacle {
            kind: ObstacleKind::Bunker,
        },
        Transform {
            pos: start + Vec2::new(60.0, 0.0),
            heading: 0.0,
        },
        Collider {
            half: Vec2::new(20.0, 200.0),
        },
    ));

    hold_input(&mut engine, PlayerSlot::P1, 1, 0, false);
    for _ in 0..60 {
        engine.tick();
    }

    let pos = player_pos(&engine, PlayerSlot::P1);
    assert!(
        pos.x + PLAYER_TANK_HALF.0 <= start.x + 40.0 + 1e-3,
        "Tank should stop at the wall, got {pos:?}"
    );
}

#[test]
fn test_player_clamped_to_arena() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());

    hold_input(&mut engine, PlayerSlot::P1, 1, 0, false);
    // More than enough ticks to cross the half-arena at 2 px/tick.
    for _ in 0..600 {
        engine.tick();
    }

    let pos = player_pos(&engine, PlayerSlot::P1);
    assert!(
        (pos.x - (ARENA_WIDTH - PLAYER_TANK_HALF.0)).abs() < 1e-3,
        "Tank should pin to the east edge, got {pos:?}"
    );
}

// ---- Fire control ----

#[test]
fn test_fire_cooldown_gates_shots() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());
    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);

    engine.tick();
    assert_eq!(count_player_shots(&engine), 1);

    // Held fire within the cooldown window adds nothing.
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(count_player_shots(&engine), 1);
}

#[test]
fn test_projectile_expires_at_range() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());
    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    engine.tick();
    hold_input(&mut engine, PlayerSlot::P1, 0, 0, false);

    // 500 px at 8 px/tick.
    let flight_ticks = (PLAYER_SHOT_DISTANCE / PLAYER_SHOT_SPEED).ceil() as u32 + 1;
    for _ in 0..flight_ticks {
        engine.tick();
    }
    assert_eq!(count_player_shots(&engine), 0);
}

#[test]
fn test_shotgun_fans_five_pellets_and_spends_one_round() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .ammo = Some(AmmoMod {
        kind: WeaponMod::Shotgun,
        remaining: 2,
    });

    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    engine.tick();

    assert_eq!(count_player_shots(&engine), SHOTGUN_PELLETS as usize);
    let ammo = engine
        .world()
        .get::<&PowerupState>(entity)
        .unwrap()
        .ammo
        .unwrap();
    assert_eq!(ammo.remaining, 1);
}

#[test]
fn test_homing_shot_locks_nearest_enemy_and_exhausts_ammo() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .ammo = Some(AmmoMod {
        kind: WeaponMod::Homing,
        remaining: 1,
    });

    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    engine.tick();

    let homing_count = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.fired_by == TankKind::Player && p.homing && p.target.is_some())
        .count();
    assert_eq!(homing_count, 1);

    // Last round: the mod is gone.
    let state = *engine.world().get::<&PowerupState>(entity).unwrap();
    assert!(state.ammo.is_none());
}

#[test]
fn test_rapid_fire_quarters_cooldown() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .ammo = Some(AmmoMod {
        kind: WeaponMod::RapidFire,
        remaining: 100,
    });

    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    engine.tick();

    let base = ticks_from_ms(PLAYER_FIRE_COOLDOWN_MS);
    let fire = *engine.world().get::<&FireControl>(entity).unwrap();
    // Fired at tick 0 with a quartered cooldown.
    assert_eq!(fire.ready_at_tick, base / RAPID_FIRE_COOLDOWN_DIVISOR);
}

// ---- Combat ----

#[test]
fn test_projectile_damages_and_credits_xp() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());
    engine.wave_state_mut().pending.clear();

    let start = player_pos(&engine, PlayerSlot::P1);
    let target = world_setup::spawn_enemy(
        engine.world_mut(),
        start + Vec2::new(200.0, 0.0),
        &EnemyMultipliers::default(),
    );

    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    for _ in 0..40 {
        engine.tick();
    }

    let hp = engine.world().get::<&Health>(target).unwrap().hp;
    assert!(
        hp < ENEMY_MAX_HEALTH,
        "Enemy should have taken damage, hp {hp}"
    );

    let entity = player_entity(&engine, PlayerSlot::P1);
    let progress = *engine.world().get::<&Progress>(entity).unwrap();
    assert!(progress.xp >= XP_PER_HIT, "Hit should credit XP");
}

#[test]
fn test_kill_awards_xp_and_updates_tally() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());
    engine.wave_state_mut().pending.clear();

    let start = player_pos(&engine, PlayerSlot::P1);
    let target = world_setup::spawn_enemy(
        engine.world_mut(),
        start + Vec2::new(200.0, 0.0),
        &EnemyMultipliers::default(),
    );
    engine.world_mut().get::<&mut Health>(target).unwrap().hp = 5.0;

    hold_input(&mut engine, PlayerSlot::P1, 0, 0, true);
    for _ in 0..40 {
        engine.tick();
    }

    assert!(!engine.world().contains(target), "Dead enemy should despawn");
    assert!(engine.score().enemies_killed >= 1);

    let entity = player_entity(&engine, PlayerSlot::P1);
    let progress = *engine.world().get::<&Progress>(entity).unwrap();
    assert!(
        progress.xp >= XP_PER_HIT + XP_PER_KILL,
        "Kill should credit hit + kill XP, got {}",
        progress.xp
    );
}

#[test]
fn test_shield_blocks_damage_but_consumes_projectile() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .shield_until = Some(u64::MAX);

    let pos = player_pos(&engine, PlayerSlot::P1);
    let shot = engine.world_mut().spawn((
        Projectile {
            fired_by: TankKind::Enemy,
            owner: None,
            damage: 10.0,
            speed: 0.0,
            traveled: 0.0,
            max_distance: 100.0,
            homing: false,
            target: None,
        },
        Transform { pos, heading: 0.0 },
        Collider {
            half: Vec2::splat(PROJECTILE_RADIUS),
        },
    ));

    let snap = engine.tick();

    assert!(!engine.world().contains(shot), "Hit consumes the projectile");
    let hp = engine.world().get::<&Health>(entity).unwrap().hp;
    assert_eq!(hp, PLAYER_MAX_HEALTH, "Shield should absorb the hit");
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::Hit { .. })));
}

#[test]
fn test_unshielded_hit_damages_player() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    let pos = player_pos(&engine, PlayerSlot::P1);
    engine.world_mut().spawn((
        Projectile {
            fired_by: TankKind::Enemy,
            owner: None,
            damage: 10.0,
            speed: 0.0,
            traveled: 0.0,
            max_distance: 100.0,
            homing: false,
            target: None,
        },
        Transform { pos, heading: 0.0 },
        Collider {
            half: Vec2::splat(PROJECTILE_RADIUS),
        },
    ));

    engine.tick();

    let hp = engine.world().get::<&Health>(entity).unwrap().hp;
    assert_eq!(hp, PLAYER_MAX_HEALTH - 10.0);
}

// ---- Waves ----

#[test]
fn test_wave_clear_advances_without_upgrade() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;

    kill_all_enemies(&mut engine);
    let snap = engine.tick();

    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::WaveCleared { wave: 1 })));
    assert_eq!(snap.wave, 2, "Wave should advance immediately");
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_wave_clear_heals_and_revives_players() {
    let mut engine = started(42, GameMode::Coop);
    engine.upgrades_mut().next_upgrade_wave = 100;

    let p2 = player_entity(&engine, PlayerSlot::P2);
    engine.world_mut().get::<&mut Health>(p2).unwrap().hp = 0.0;
    {
        let mut transform = engine.world_mut().get::<&mut Transform>(p2).unwrap();
        transform.pos = Vec2::new(200.0, 200.0);
        transform.heading = 1.0;
    }

    kill_all_enemies(&mut engine);
    engine.tick();

    let health = *engine.world().get::<&Health>(p2).unwrap();
    assert_eq!(health.hp, health.max_hp, "Wave clear should revive P2");

    let start = world_setup::player_start_position(GameMode::Coop, PlayerSlot::P2);
    let transform = *engine.world().get::<&Transform>(p2).unwrap();
    assert_eq!(transform.pos, start, "Revived P2 should be back at start");
    assert_eq!(transform.heading, 0.0);

    // Trail restarts from the reset position.
    let history = engine.world().get::<&PositionHistory>(p2).unwrap();
    assert_eq!(history.points, vec![start]);
}

#[test]
fn test_wave_two_fields_more_enemies() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;

    kill_all_enemies(&mut engine);
    engine.tick();

    // Wave 2 single: base 1 + 1.
    let pending = engine.wave_state().pending.len();
    let fielded = engine.world().query::<&EnemyTag>().iter().count();
    assert_eq!(
        pending + fielded,
        (WAVE_BASE_ENEMIES_SINGLE + WAVE_ENEMIES_PER_WAVE) as usize
    );
}

#[test]
fn test_enemy_upgrade_fires_and_waits_for_acknowledgment() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 1;

    kill_all_enemies(&mut engine);
    let snap = engine.tick();

    assert_eq!(engine.phase(), GamePhase::EnemyUpgradeWarning);
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::EnemyUpgraded { .. })));
    let view = snap.enemy_upgrade.unwrap();
    assert!(ENEMY_UPGRADE_PERCENTAGES.contains(&view.percent));

    // Frozen until acknowledged.
    let tick_before = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick_before);

    engine.queue_command(PlayerCommand::AcknowledgeUpgradeWarning);
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(snap.wave, 2);

    let m = engine.upgrades_mut().multipliers;
    let boosted = [m.move_speed, m.shot_speed, m.shot_range, m.health, m.damage]
        .iter()
        .any(|&v| v > 1.0);
    assert!(boosted, "One multiplier should have compounded: {m:?}");
}

#[test]
fn test_upgrade_multipliers_scale_enemy_spawns() {
    let mut world = hecs::World::new();
    let mults = EnemyMultipliers {
        health: 2.0,
        damage: 1.5,
        ..Default::default()
    };
    let enemy = world_setup::spawn_enemy(&mut world, Vec2::new(100.0, 100.0), &mults);

    let health = *world.get::<&Health>(enemy).unwrap();
    assert_eq!(health.max_hp, ENEMY_MAX_HEALTH * 2.0);
    assert_eq!(health.hp, health.max_hp);

    let stats = *world.get::<&TankStats>(enemy).unwrap();
    assert_eq!(stats.damage, ENEMY_BASE_DAMAGE * 1.5);
    assert_eq!(stats.move_speed, ENEMY_MOVE_SPEED);
}

// ---- Progression ----

#[test]
fn test_xp_thresholds_grow_ten_percent() {
    assert_eq!(xp_threshold(1), 500);
    assert_eq!(xp_threshold(2), 550);
    assert_eq!(xp_threshold(3), 605);
}

#[test]
fn test_level_up_waits_for_wave_clear() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Progress>(entity).unwrap().xp = xp_threshold(1);

    // The level itself lands mid-wave; the stat pick waits.
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing, "Combat continues");
    assert_eq!(snap.pending_upgrade, None);
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::LevelUp { slot: PlayerSlot::P1, level: 2 })));

    kill_all_enemies(&mut engine);
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelUp);
    assert_eq!(snap.pending_upgrade, Some(PlayerSlot::P1));

    let frozen_tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, frozen_tick, "LevelUp freezes the sim");

    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::MovementSpeed,
    });
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(snap.wave, 2, "Choice made, next wave starts");

    let stats = *engine.world().get::<&TankStats>(entity).unwrap();
    assert!((stats.move_speed - PLAYER_MOVE_SPEED * 1.1).abs() < 1e-5);
    let progress = *engine.world().get::<&Progress>(entity).unwrap();
    assert_eq!(progress.level, 2);
    assert_eq!(progress.upgrades.movement_speed, 1);
}

#[test]
fn test_wave_break_orders_picks_before_upgrade_notice() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 1;
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Progress>(entity).unwrap().xp = xp_threshold(1);

    kill_all_enemies(&mut engine);
    engine.tick();
    assert_eq!(
        engine.phase(),
        GamePhase::LevelUp,
        "Stat pick comes before the upgrade notice"
    );

    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::ShotDistance,
    });
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::EnemyUpgradeWarning);

    engine.queue_command(PlayerCommand::AcknowledgeUpgradeWarning);
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(snap.wave, 2);
}

#[test]
fn test_fire_rate_upgrade_shortens_cooldown() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Progress>(entity).unwrap().xp = xp_threshold(1);
    kill_all_enemies(&mut engine);
    engine.tick();

    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::FireRate,
    });
    engine.tick();

    let stats = *engine.world().get::<&TankStats>(entity).unwrap();
    let expected = (ticks_from_ms(PLAYER_FIRE_COOLDOWN_MS) as f64 / 1.1).round() as u64;
    assert_eq!(stats.fire_cooldown_ticks, expected);
}

#[test]
fn test_health_upgrade_heals_the_gained_capacity() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Progress>(entity).unwrap().xp = xp_threshold(1);
    kill_all_enemies(&mut engine);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelUp);

    // Damage taken after the wave-clear heal.
    engine.world_mut().get::<&mut Health>(entity).unwrap().hp = 50.0;
    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::Health,
    });
    engine.tick();

    let health = *engine.world().get::<&Health>(entity).unwrap();
    assert!((health.max_hp - PLAYER_MAX_HEALTH * 1.1).abs() < 1e-3);
    assert!(
        (health.hp - 60.0).abs() < 1.0,
        "Gained capacity should arrive as healing, hp {}",
        health.hp
    );
}

#[test]
fn test_maxed_stat_pick_reprompts() {
    let mut engine = started(42, GameMode::Single);
    engine.upgrades_mut().next_upgrade_wave = 100;
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut Progress>(entity)
        .unwrap()
        .upgrades
        .movement_speed = MAX_STAT_UPGRADES;
    let speed_before = engine.world().get::<&TankStats>(entity).unwrap().move_speed;

    engine.world_mut().get::<&mut Progress>(entity).unwrap().xp = xp_threshold(1);
    kill_all_enemies(&mut engine);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelUp);

    // A pick on a maxed stat is a no-op; the menu asks again.
    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::MovementSpeed,
    });
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelUp);
    assert_eq!(snap.pending_upgrade, Some(PlayerSlot::P1));
    let progress = *engine.world().get::<&Progress>(entity).unwrap();
    assert_eq!(progress.upgrades.movement_speed, MAX_STAT_UPGRADES);
    let speed_after = engine.world().get::<&TankStats>(entity).unwrap().move_speed;
    assert_eq!(speed_after, speed_before);

    // A different stat still goes through and closes the level-up.
    engine.queue_command(PlayerCommand::ChooseUpgrade {
        stat: PlayerStat::ShotSpeed,
    });
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
    let progress = *engine.world().get::<&Progress>(entity).unwrap();
    assert_eq!(progress.upgrades.shot_speed, 1);
}

// ---- Powerups ----

#[test]
fn test_powerup_pickup_applies_shield() {
    let mut engine = started(42, GameMode::Single);
    let pos = player_pos(&engine, PlayerSlot::P1);
    world_setup::spawn_powerup_crate(engine.world_mut(), pos, PowerupKind::Shield);

    let snap = engine.tick();

    let entity = player_entity(&engine, PlayerSlot::P1);
    let state = *engine.world().get::<&PowerupState>(entity).unwrap();
    assert!(state.shield_until.is_some());
    assert!(snap.audio_events.iter().any(|e| matches!(
        e,
        AudioEvent::PowerupCollected {
            slot: PlayerSlot::P1,
            kind: PowerupKind::Shield,
        }
    )));
    assert!(snap.powerups.is_empty(), "Collected crate leaves the field");
}

#[test]
fn test_powerup_duration_upgrade_stretches_effects() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut Progress>(entity)
        .unwrap()
        .upgrades
        .powerup_duration = 2;

    let pos = player_pos(&engine, PlayerSlot::P1);
    world_setup::spawn_powerup_crate(engine.world_mut(), pos, PowerupKind::Speed);
    engine.tick();

    let state = *engine.world().get::<&PowerupState>(entity).unwrap();
    let pickup_tick = engine.time().tick - 1;
    // 10 s stretched 20%: 12 s = 720 ticks.
    assert_eq!(
        state.speed_until,
        Some(pickup_tick + ticks_from_ms(12_000))
    );
}

#[test]
fn test_ammo_pickup_replaces_previous_mod() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .ammo = Some(AmmoMod {
        kind: WeaponMod::RapidFire,
        remaining: 50,
    });

    let pos = player_pos(&engine, PlayerSlot::P1);
    world_setup::spawn_powerup_crate(engine.world_mut(), pos, PowerupKind::Shotgun);
    engine.tick();

    let ammo = engine
        .world()
        .get::<&PowerupState>(entity)
        .unwrap()
        .ammo
        .unwrap();
    assert_eq!(ammo.kind, WeaponMod::Shotgun);
    assert_eq!(ammo.remaining, SHOTGUN_SHOTS);
}

#[test]
fn test_timed_effects_expire() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    let expiry = engine.time().tick + 5;
    engine
        .world_mut()
        .get::<&mut PowerupState>(entity)
        .unwrap()
        .speed_until = Some(expiry);

    for _ in 0..6 {
        engine.tick();
    }

    let state = *engine.world().get::<&PowerupState>(entity).unwrap();
    assert!(state.speed_until.is_none());
}

#[test]
fn test_full_field_spawns_again_as_soon_as_a_slot_frees() {
    let mut engine = started(42, GameMode::Single);
    // Fill the field away from the stationary player.
    let spots = [
        Vec2::new(200.0, 200.0),
        Vec2::new(200.0, 880.0),
        Vec2::new(1720.0, 200.0),
    ];
    for &pos in &spots {
        world_setup::spawn_powerup_crate(engine.world_mut(), pos, PowerupKind::Shield);
    }

    let cadence = ticks_from_ms(POWERUP_SPAWN_FREQUENCY_MS);
    while engine.time().tick <= cadence {
        engine.tick();
    }
    let on_field = engine.world().query::<&PowerupCrate>().iter().count();
    assert_eq!(on_field, MAX_POWERUPS, "Full field blocks the spawn");

    let first = engine
        .world()
        .query::<&PowerupCrate>()
        .iter()
        .map(|(entity, _)| entity)
        .next()
        .unwrap();
    engine.world_mut().despawn(first).unwrap();
    engine.tick();

    let on_field = engine.world().query::<&PowerupCrate>().iter().count();
    assert_eq!(
        on_field, MAX_POWERUPS,
        "Freed slot refills without waiting out another cadence"
    );
}

// ---- Scoring and game over ----

#[test]
fn test_score_formula() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    {
        let mut progress = engine.world_mut().get::<&mut Progress>(entity).unwrap();
        progress.level = 3;
        progress.xp = 120;
    }

    let snap = engine.tick();
    assert_eq!(
        snap.score.score,
        SCORE_PER_WAVE + 3 * SCORE_PER_LEVEL + 120
    );
}

#[test]
fn test_game_over_when_all_players_dead() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Health>(entity).unwrap().hp = 0.0;

    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert!(snap.audio_events.iter().any(|e| matches!(
        e,
        AudioEvent::GameOver {
            score: 1500,
            wave: 1
        }
    )));

    // Dead player still on the field for the explosion beat, but frozen.
    let tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick);
}

#[test]
fn test_coop_survives_one_player_down() {
    let mut engine = started(42, GameMode::Coop);
    let p1 = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Health>(p1).unwrap().hp = 0.0;

    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_restart_returns_to_menu() {
    let mut engine = started(42, GameMode::Single);
    let entity = player_entity(&engine, PlayerSlot::P1);
    engine.world_mut().get::<&mut Health>(entity).unwrap().hp = 0.0;
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::GameOver);

    engine.queue_command(PlayerCommand::Restart);
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Menu);
    assert!(snap.tanks.is_empty());

    // A new match starts clean from the menu.
    engine.queue_command(PlayerCommand::StartGame {
        mode: GameMode::Single,
    });
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(snap.wave, 1);
    assert_eq!(snap.players.len(), 1);
    assert_eq!(snap.players[0].level, 1);
}

// ---- Snapshot ----

#[test]
fn test_snapshot_orders_players_first() {
    let mut engine = started(42, GameMode::Coop);
    for _ in 0..30 {
        engine.tick();
    }
    let snap = engine.tick();

    assert!(snap.tanks.len() >= 2);
    assert_eq!(snap.tanks[0].slot, Some(PlayerSlot::P1));
    assert_eq!(snap.tanks[1].slot, Some(PlayerSlot::P2));
    for tank in &snap.tanks[2..] {
        assert_eq!(tank.kind, TankKind::Enemy);
    }
}

#[test]
fn test_snapshot_reports_trails() {
    let mut engine = started(42, GameMode::Single);
    world_setup::clear_obstacles(engine.world_mut());
    hold_input(&mut engine, PlayerSlot::P1, 1, 0, false);
    for _ in 0..120 {
        engine.tick();
    }
    let snap = engine.tick();

    let player = snap
        .tanks
        .iter()
        .find(|t| t.slot == Some(PlayerSlot::P1))
        .unwrap();
    assert!(
        player.trail.len() >= 2,
        "Moving tank should lay trail points"
    );
    assert!(player.trail.len() <= MAX_TRAIL_POINTS);
}
