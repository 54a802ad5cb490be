//! Session state
//!
//! Everything a single run owns: the player, active obstacles, road scroll,
//! wave timer, score/progress and the seeded RNG. Only `tick` and the
//! methods here mutate it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{ObstacleCar, PlayerCar};
use super::progress::{Progress, ProgressDisplay};
use super::road::Road;
use super::spawner::WaveSpawner;
use crate::config::{CarColor, FALLBACK_LEVEL, GameConfig, LevelLength};

/// Tick driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverState {
    /// Not on the playing screen; ticks are ignored
    Stopped,
    /// Playing screen visible, frozen until the start command
    NotStarted,
    /// Simulation advancing every tick
    Running,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: GameConfig,
    pub(crate) rng: Pcg32,
    pub(crate) seed: u64,
    pub(crate) level: u32,
    pub(crate) player_color: CarColor,
    pub(crate) player: PlayerCar,
    /// Active obstacles in spawn order
    pub(crate) obstacles: Vec<ObstacleCar>,
    pub(crate) road: Road,
    pub(crate) spawner: WaveSpawner,
    pub(crate) progress: Progress,
    pub(crate) driver: DriverState,
    /// Start command received this run
    pub(crate) started: bool,
    /// Ticks processed while running
    pub(crate) time_ticks: u64,
}

impl Session {
    /// Create a stopped session prepared for level 1. An invalid config is
    /// replaced by the defaults.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.validated_or_default();
        let player_color = config.default_player_color;
        let player = PlayerCar::new(&config, player_color);
        let progress = Progress::new(config.level_length(FALLBACK_LEVEL));
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            level: FALLBACK_LEVEL,
            player_color,
            player,
            obstacles: Vec::new(),
            road: Road::new(),
            spawner: WaveSpawner::default(),
            progress,
            driver: DriverState::Stopped,
            started: false,
            time_ticks: 0,
            config,
        }
    }

    /// Prepare a fresh run of `level` (0 is infinite mode).
    ///
    /// Unknown level ids keep their id but use the fallback level's length.
    /// Leaves the driver waiting for the start command.
    pub fn reset_game(&mut self, level: u32) {
        self.level = level;
        self.player.reset(&self.config, self.player_color);
        self.obstacles.clear();
        self.road.reset();
        self.spawner.reset(0);
        self.progress = Progress::new(self.config.level_length(level));
        self.time_ticks = 0;
        self.started = false;
        self.driver = DriverState::NotStarted;
        log::info!(
            "Session reset: level {} ({:?})",
            level,
            self.progress.level_length
        );
    }

    /// Begin the run. Anchors the score and wave clocks at `now_ms`.
    /// Returns false unless the session was waiting to start.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.driver != DriverState::NotStarted {
            return false;
        }
        self.progress.start(now_ms);
        self.spawner.reset(now_ms);
        self.driver = DriverState::Running;
        self.started = true;
        log::info!("Session started at {}ms (level {})", now_ms, self.level);
        true
    }

    /// Halt ticking. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.driver != DriverState::Stopped {
            log::debug!("Tick driver stopped after {} ticks", self.time_ticks);
        }
        self.driver = DriverState::Stopped;
    }

    /// Lane change; only honored while running
    pub fn move_left(&mut self) -> bool {
        self.driver == DriverState::Running && self.player.move_left(&self.config)
    }

    /// Lane change; only honored while running
    pub fn move_right(&mut self) -> bool {
        self.driver == DriverState::Running && self.player.move_right(&self.config)
    }

    /// Body color used on the next reset
    pub fn set_player_color(&mut self, color: CarColor) {
        self.player_color = color;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_length(&self) -> LevelLength {
        self.progress.level_length
    }

    pub fn player(&self) -> &PlayerCar {
        &self.player
    }

    pub fn obstacles(&self) -> &[ObstacleCar] {
        &self.obstacles
    }

    pub fn road_offset(&self) -> i32 {
        self.road.offset()
    }

    pub fn score(&self) -> u64 {
        self.progress.score
    }

    pub fn distance(&self) -> u64 {
        self.progress.distance
    }

    pub fn progress_display(&self) -> ProgressDisplay {
        self.progress.display()
    }

    pub fn driver(&self) -> DriverState {
        self.driver
    }

    /// Whether the player has issued the start command this run
    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
