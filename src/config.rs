//! Game configuration
//!
//! One authoritative structure for every tuning value the core consumes.
//! Loaded from JSON when a file is supplied, otherwise built from `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Body colors for player and obstacle cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CarColor {
    #[default]
    Red,
    Green,
    Blue,
    Magenta,
    Yellow,
    Cyan,
    Black,
}

impl CarColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarColor::Red => "Red",
            CarColor::Green => "Green",
            CarColor::Blue => "Blue",
            CarColor::Magenta => "Magenta",
            CarColor::Yellow => "Yellow",
            CarColor::Cyan => "Cyan",
            CarColor::Black => "Black",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(CarColor::Red),
            "green" => Some(CarColor::Green),
            "blue" => Some(CarColor::Blue),
            "magenta" | "pink" => Some(CarColor::Magenta),
            "yellow" => Some(CarColor::Yellow),
            "cyan" => Some(CarColor::Cyan),
            "black" => Some(CarColor::Black),
            _ => None,
        }
    }
}

/// Distance target for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelLength {
    Finite(u32),
    /// Endless run, victory never fires
    Infinite,
}

impl LevelLength {
    pub fn is_infinite(&self) -> bool {
        matches!(self, LevelLength::Infinite)
    }

    /// True once `progress` has covered the whole level (ties count)
    pub fn reached_by(&self, progress: u64) -> bool {
        match self {
            LevelLength::Finite(len) => progress >= u64::from(*len),
            LevelLength::Infinite => false,
        }
    }
}

/// Default level table. Index 0 is reserved for infinite mode.
pub fn default_levels() -> Vec<LevelLength> {
    vec![
        LevelLength::Infinite,
        LevelLength::Finite(BASE_LEVEL_LENGTH),
        LevelLength::Finite(BASE_LEVEL_LENGTH * 3 / 2),
        LevelLength::Finite(BASE_LEVEL_LENGTH * 2),
    ]
}

/// Level id used when a requested id is not in the table
pub const FALLBACK_LEVEL: u32 = 1;

/// Everything the simulation and screen controller read at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Geometry ===
    pub field_width: i32,
    pub field_height: i32,
    /// Road starts at `field_width / road_margin_divisor`
    pub road_margin_divisor: i32,
    pub lane_count: usize,
    pub car_width: i32,
    pub car_height: i32,
    pub hitbox_margin: i32,
    pub player_bottom_gap: i32,

    // === Timing ===
    pub tick_interval_ms: u64,
    pub scroll_speed: i32,
    pub score_interval_ms: u64,
    pub score_increment: u64,
    pub spawn_interval_ms: u64,
    pub min_free_lanes: usize,
    pub splash_duration_ms: u64,

    // === Content ===
    pub levels: Vec<LevelLength>,
    pub obstacle_palette: Vec<CarColor>,
    /// Colors offered on the customize screen
    pub player_palette: Vec<CarColor>,
    pub default_player_color: CarColor,

    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            road_margin_divisor: ROAD_MARGIN_DIVISOR,
            lane_count: NUM_LANES,
            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            hitbox_margin: HITBOX_MARGIN,
            player_bottom_gap: PLAYER_BOTTOM_GAP,

            tick_interval_ms: TICK_INTERVAL_MS,
            scroll_speed: BASE_SCROLL_SPEED,
            score_interval_ms: SCORE_INTERVAL_MS,
            score_increment: SCORE_PER_INTERVAL,
            spawn_interval_ms: OBSTACLE_SPAWN_INTERVAL_MS,
            min_free_lanes: MIN_LANES_FREE_IN_WAVE,
            splash_duration_ms: SPLASH_DURATION_MS,

            levels: default_levels(),
            obstacle_palette: vec![
                CarColor::Green,
                CarColor::Blue,
                CarColor::Magenta,
                CarColor::Yellow,
                CarColor::Cyan,
                CarColor::Black,
                CarColor::Red,
            ],
            player_palette: vec![
                CarColor::Black,
                CarColor::Red,
                CarColor::Yellow,
                CarColor::Cyan,
                CarColor::Magenta,
            ],
            default_player_color: CarColor::Red,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from disk, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using default config", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.field_width <= 0 || self.field_height <= 0 {
            return invalid("field dimensions must be positive");
        }
        if self.road_margin_divisor <= 2 {
            return invalid("road_margin_divisor must be greater than 2");
        }
        let inset = self.hitbox_margin.saturating_mul(2);
        if self.hitbox_margin < 0 || self.car_width <= inset || self.car_height <= inset {
            return invalid("hitbox margin must leave a non-empty hitbox");
        }
        if self.lane_count == 0 {
            return invalid("lane_count must be at least 1");
        }
        let Ok(lanes) = i32::try_from(self.lane_count) else {
            return invalid("lane_count is out of range");
        };
        if self.road_width() / lanes < self.car_width {
            return invalid("lanes are narrower than a car");
        }
        let fits = self
            .car_height
            .checked_add(self.player_bottom_gap)
            .is_some_and(|h| h <= self.field_height);
        if self.player_bottom_gap < 0 || !fits {
            return invalid("player car must fit inside the field");
        }
        if self.tick_interval_ms == 0 || self.score_interval_ms == 0 {
            return invalid("tick and score intervals must be non-zero");
        }
        // Faster than a car length per tick and obstacles skip over the player
        if self.scroll_speed <= 0 || self.scroll_speed >= self.car_height {
            return invalid("scroll_speed must be positive and below car_height");
        }
        if self.levels.first() != Some(&LevelLength::Infinite) {
            return invalid("level 0 must be infinite mode");
        }
        if self.levels.get(FALLBACK_LEVEL as usize).is_none() {
            return invalid("level table needs at least one finite level");
        }
        if self.obstacle_palette.is_empty() || self.player_palette.is_empty() {
            return invalid("color palettes must not be empty");
        }
        Ok(())
    }

    /// This config if it validates, otherwise the defaults
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("{}; using default config", e);
                Self::default()
            }
        }
    }

    /// Left edge of the road
    #[inline]
    pub fn road_x(&self) -> i32 {
        self.field_width / self.road_margin_divisor
    }

    #[inline]
    pub fn road_width(&self) -> i32 {
        self.field_width - 2 * self.road_x()
    }

    #[inline]
    pub fn lane_width(&self) -> i32 {
        let lanes = i32::try_from(self.lane_count.max(1)).unwrap_or(i32::MAX);
        self.road_width() / lanes
    }

    /// Sprite x for a car centered in `lane`
    #[inline]
    pub fn lane_x(&self, lane: usize) -> i32 {
        let lane_width = self.lane_width();
        let lane = i32::try_from(lane).unwrap_or(i32::MAX);
        self.road_x()
            .saturating_add(lane.saturating_mul(lane_width))
            .saturating_add(lane_width / 2 - self.car_width / 2)
    }

    /// Fixed sprite y of the player car
    #[inline]
    pub fn player_y(&self) -> i32 {
        self.field_height - self.car_height - self.player_bottom_gap
    }

    /// Middle lane (left-of-center for even lane counts)
    #[inline]
    pub fn middle_lane(&self) -> usize {
        self.lane_count / 2
    }

    /// Distance target for `level`, falling back to level 1 for unknown ids
    pub fn level_length(&self, level: u32) -> LevelLength {
        match self.levels.get(level as usize) {
            Some(length) => *length,
            None => {
                log::warn!(
                    "Invalid level {}; using length of level {}",
                    level,
                    FALLBACK_LEVEL
                );
                self.levels
                    .get(FALLBACK_LEVEL as usize)
                    .copied()
                    .unwrap_or(LevelLength::Finite(BASE_LEVEL_LENGTH))
            }
        }
    }

    /// Number of selectable finite levels (ids 1..=n)
    pub fn finite_level_count(&self) -> u32 {
        self.levels.len().saturating_sub(1) as u32
    }
}
