//! Game engine — the core of the simulation.
//!
//! `GameEngine` owns the hecs ECS world, processes player commands,
//! runs all systems at a fixed tick rate, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic
//! testing: the same seed and command sequence always yield identical
//! snapshots.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use treadline_core::commands::{InputState, PlayerCommand};
use treadline_core::components::{Health, PlayerTag};
use treadline_core::enums::{AlertLevel, EnemyStat, GameMode, GamePhase, PlayerSlot};
use treadline_core::events::{Alert, AudioEvent};
use treadline_core::state::GameStateSnapshot;
use treadline_core::types::SimTime;

use crate::match_state::{EnemyUpgradeState, PowerupSpawner, ScoreState, WaveState};
use crate::systems;
use crate::systems::control::seat_index;
use crate::systems::waves::WaveStatus;
use crate::world_setup;

/// Configuration for starting a new engine.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The simulation engine. Owns the ECS world and all match state.
pub struct GameEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    mode: GameMode,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    audio_events: Vec<AudioEvent>,
    alerts: Vec<Alert>,
    inputs: [InputState; 2],
    wave: WaveState,
    upgrades: EnemyUpgradeState,
    pending_level_ups: VecDeque<PlayerSlot>,
    pending_upgrade_notice: Option<(EnemyStat, u32)>,
    powerup_spawner: PowerupSpawner,
    score: ScoreState,
}

impl GameEngine {
    /// Create a new engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            mode: GameMode::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
            alerts: Vec::new(),
            inputs: [InputState::default(); 2],
            wave: WaveState::default(),
            upgrades: EnemyUpgradeState::default(),
            pending_level_ups: VecDeque::new(),
            pending_upgrade_notice: None,
            powerup_spawner: PowerupSpawner::default(),
            score: ScoreState::default(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Playing {
            self.run_systems();
            self.time.advance();
        }

        let audio_events = std::mem::take(&mut self.audio_events);
        let alerts = std::mem::take(&mut self.alerts);
        // Pending level-ups accrue silently mid-wave; the seat choosing
        // is only surfaced once the wave break reaches the LevelUp phase.
        let choosing = match self.phase {
            GamePhase::LevelUp => self.pending_level_ups.front().copied(),
            _ => None,
        };
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.mode,
            self.wave.wave,
            choosing,
            &self.upgrades,
            alerts,
            audio_events,
            &self.score,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a mutable reference to the ECS world (for tests).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get a read-only reference to the wave state.
    #[cfg(test)]
    pub fn wave_state(&self) -> &WaveState {
        &self.wave
    }

    /// Get a mutable reference to the wave state (for tests).
    #[cfg(test)]
    pub fn wave_state_mut(&mut self) -> &mut WaveState {
        &mut self.wave
    }

    /// Get a mutable reference to the enemy upgrade scheduler (for tests).
    #[cfg(test)]
    pub fn upgrades_mut(&mut self) -> &mut EnemyUpgradeState {
        &mut self.upgrades
    }

    /// Get a read-only reference to the score state.
    #[cfg(test)]
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame { mode } => {
                if matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
                    self.start_match(mode);
                }
            }
            PlayerCommand::Restart => {
                if self.phase == GamePhase::GameOver {
                    self.world = World::new();
                    self.phase = GamePhase::Menu;
                }
            }
            PlayerCommand::SetInput { slot, input } => {
                self.inputs[seat_index(slot)] = input;
            }
            PlayerCommand::ChooseUpgrade { stat } => {
                if self.phase != GamePhase::LevelUp {
                    return;
                }
                // A pick on a maxed stat is a no-op; the level-up stays
                // open and the menu re-prompts.
                let Some(&slot) = self.pending_level_ups.front() else {
                    return;
                };
                if systems::progression::apply_upgrade(&mut self.world, slot, stat) {
                    self.pending_level_ups.pop_front();
                }
                if self.pending_level_ups.is_empty() {
                    self.finish_wave_break();
                }
            }
            PlayerCommand::AcknowledgeUpgradeWarning => {
                if self.phase == GamePhase::EnemyUpgradeWarning {
                    self.advance_wave();
                }
            }
        }
    }

    /// Reset all match state and begin wave 1.
    fn start_match(&mut self, mode: GameMode) {
        self.world = World::new();
        self.time = SimTime::default();
        self.mode = mode;
        self.inputs = [InputState::default(); 2];
        self.despawn_buffer.clear();
        self.audio_events.clear();
        self.alerts.clear();
        self.pending_level_ups.clear();
        self.pending_upgrade_notice = None;
        self.score = ScoreState::default();
        self.powerup_spawner = PowerupSpawner::default();
        self.upgrades = EnemyUpgradeState::new(&mut self.rng);

        world_setup::setup_match(&mut self.world, mode);
        self.wave = WaveState {
            wave: 1,
            pending: VecDeque::new(),
        };
        world_setup::generate_obstacles(&mut self.world, &mut self.rng, self.wave.wave);
        systems::waves::schedule(&mut self.wave, &mut self.rng, self.mode, self.time.tick);

        self.push_alert(AlertLevel::Info, format!("Wave {} incoming", self.wave.wave));
        self.phase = GamePhase::Playing;
    }

    /// Move to the next wave: fresh obstacle field, staggered spawns.
    fn advance_wave(&mut self) {
        self.wave.wave += 1;
        world_setup::clear_obstacles(&mut self.world);
        world_setup::generate_obstacles(&mut self.world, &mut self.rng, self.wave.wave);
        systems::waves::schedule(&mut self.wave, &mut self.rng, self.mode, self.time.tick);
        self.push_alert(AlertLevel::Info, format!("Wave {} incoming", self.wave.wave));
        self.phase = GamePhase::Playing;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Wave spawning and clear detection
        let status = systems::waves::run(
            &mut self.world,
            &mut self.wave,
            &mut self.upgrades,
            &mut self.rng,
            self.mode,
            self.time.tick,
            &mut self.audio_events,
        );
        // 2. Player input bridge + enemy navigation
        systems::control::run(&mut self.world, &mut self.rng, &self.inputs);
        // 3. Tank movement
        systems::movement::run(&mut self.world, self.time.tick);
        // 4. Fire control (cooldowns, weapon mods, projectile spawn)
        systems::fire_control::run(&mut self.world, self.time.tick, &mut self.audio_events);
        // 5. Projectile flight (homing steer, advance, retire)
        systems::projectiles::run(&mut self.world);
        // 6. Hit resolution
        systems::combat::run(
            &mut self.world,
            self.time.tick,
            &mut self.audio_events,
            &mut self.score,
        );
        // 7. Powerup lifecycle
        systems::powerups::run(
            &mut self.world,
            &mut self.rng,
            &mut self.powerup_spawner,
            self.time.tick,
            &mut self.audio_events,
        );
        // 8. XP and level-ups
        let leveled = systems::progression::run(&mut self.world, &mut self.audio_events);
        self.pending_level_ups.extend(leveled);
        // 9. Trail history
        systems::movement::update_history(&mut self.world);
        // 10. Cleanup (destroyed enemies)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        self.resolve_phase(status);
    }

    /// Apply end-of-tick phase transitions, in priority order.
    fn resolve_phase(&mut self, status: WaveStatus) {
        if self.all_players_dead() {
            let score = systems::snapshot::compute_score(&self.world, self.wave.wave);
            self.audio_events.push(AudioEvent::GameOver {
                score,
                wave: self.wave.wave,
            });
            self.push_alert(AlertLevel::Critical, format!("Game over, score {score}"));
            self.phase = GamePhase::GameOver;
            return;
        }

        if let WaveStatus::Cleared { upgraded } = status {
            self.push_alert(AlertLevel::Info, format!("Wave {} cleared", self.wave.wave));
            self.pending_upgrade_notice = upgraded;
            self.finish_wave_break();
        }
    }

    /// Advance the wave break: stat picks accrued during the wave come
    /// first, then the enemy upgrade notice, then the next wave.
    fn finish_wave_break(&mut self) {
        if !self.pending_level_ups.is_empty() {
            self.phase = GamePhase::LevelUp;
            return;
        }
        match self.pending_upgrade_notice.take() {
            Some((stat, percent)) => {
                self.push_alert(
                    AlertLevel::Warning,
                    format!("Enemy forces upgraded: {stat:?} +{percent}%"),
                );
                self.phase = GamePhase::EnemyUpgradeWarning;
            }
            None => self.advance_wave(),
        }
    }

    fn all_players_dead(&mut self) -> bool {
        self.world
            .query_mut::<(&PlayerTag, &Health)>()
            .into_iter()
            .all(|(_, (_, health))| health.hp <= 0.0)
    }

    fn push_alert(&mut self, level: AlertLevel, message: String) {
        self.alerts.push(Alert {
            level,
            message,
            tick: self.time.tick,
        });
    }
}
