//! Lane Dash - a lane-dodging driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, scoring, tick)
//! - `screen`: Screen state machine and input routing
//! - `config`: Data-driven game configuration
//! - `timestep`: Fixed-interval tick scheduling for hosts
//! - `autopilot`: Demo driver that dodges obstacles on its own

pub mod autopilot;
pub mod config;
pub mod screen;
pub mod sim;
pub mod timestep;

pub use config::{CarColor, ConfigError, GameConfig, LevelLength};
pub use screen::{Command, Controller, GameEvent, ScreenMode, Snapshot};
pub use timestep::FixedTimestep;

/// Default configuration constants
pub mod consts {
    /// Play-field dimensions
    pub const FIELD_WIDTH: i32 = 800;
    pub const FIELD_HEIGHT: i32 = 600;

    /// Grass strip on each side of the road, as a divisor of the field width
    pub const ROAD_MARGIN_DIVISOR: i32 = 6;
    pub const NUM_LANES: usize = 3;

    /// Car sprite footprint (player and obstacles share it)
    pub const CAR_WIDTH: i32 = 60;
    pub const CAR_HEIGHT: i32 = 100;
    /// Inset applied on every side before collision testing
    pub const HITBOX_MARGIN: i32 = 5;
    /// Gap between the player's sprite and the bottom edge
    pub const PLAYER_BOTTOM_GAP: i32 = 50;

    /// Milliseconds between simulation ticks (~50 Hz)
    pub const TICK_INTERVAL_MS: u64 = 20;
    /// Road and obstacle scroll per tick
    pub const BASE_SCROLL_SPEED: i32 = 6;

    pub const SCORE_INTERVAL_MS: u64 = 5000;
    pub const SCORE_PER_INTERVAL: u64 = 10;

    pub const OBSTACLE_SPAWN_INTERVAL_MS: u64 = 1000;
    pub const MIN_LANES_FREE_IN_WAVE: usize = 1;

    /// Level 1 distance; later levels scale from it
    pub const BASE_LEVEL_LENGTH: u32 = 5000;

    pub const SPLASH_DURATION_MS: u64 = 3000;
    /// Upper bound on catch-up ticks per host frame
    pub const MAX_CATCHUP_TICKS: u32 = 8;
    /// Undrained controller events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 256;
}
