//! Player and obstacle cars
//!
//! Plain mutable records. Positions are sprite top-left corners in field
//! pixels; y grows downward. The x of any car is always `lane_x(lane)`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::{CarColor, GameConfig};

/// Axis-aligned collision rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hitbox {
    pub min: IVec2,
    pub size: IVec2,
}

impl Hitbox {
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Hitbox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// Anything with a car-sized sprite on the road
pub trait Vehicle {
    /// Sprite top-left corner
    fn pos(&self) -> IVec2;

    /// Collision bounds: the sprite inset by the hitbox margin on every side
    fn bounds(&self, config: &GameConfig) -> Hitbox {
        let margin = config.hitbox_margin;
        Hitbox::new(
            self.pos() + IVec2::splat(margin),
            IVec2::new(
                config.car_width - 2 * margin,
                config.car_height - 2 * margin,
            ),
        )
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCar {
    pub pos: IVec2,
    pub lane: usize,
    pub color: CarColor,
}

impl PlayerCar {
    pub fn new(config: &GameConfig, color: CarColor) -> Self {
        let lane = config.middle_lane();
        Self {
            pos: IVec2::new(config.lane_x(lane), config.player_y()),
            lane,
            color,
        }
    }

    /// Back to the middle lane near the bottom edge, with a new body color
    pub fn reset(&mut self, config: &GameConfig, color: CarColor) {
        *self = Self::new(config, color);
    }

    /// Shift one lane left. Returns false (and does nothing) at the left edge.
    pub fn move_left(&mut self, config: &GameConfig) -> bool {
        if self.lane == 0 {
            return false;
        }
        self.set_lane(self.lane - 1, config);
        true
    }

    /// Shift one lane right. Returns false (and does nothing) at the right edge.
    pub fn move_right(&mut self, config: &GameConfig) -> bool {
        if self.lane + 1 >= config.lane_count {
            return false;
        }
        self.set_lane(self.lane + 1, config);
        true
    }

    fn set_lane(&mut self, lane: usize, config: &GameConfig) {
        self.lane = lane;
        self.pos.x = config.lane_x(lane);
    }
}

impl Vehicle for PlayerCar {
    fn pos(&self) -> IVec2 {
        self.pos
    }
}

/// An oncoming car. Never changes lane; only moves down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCar {
    pub pos: IVec2,
    pub lane: usize,
    pub color: CarColor,
}

impl ObstacleCar {
    /// New obstacle in `lane`, fully hidden above the top edge
    pub fn spawn(config: &GameConfig, lane: usize, color: CarColor) -> Self {
        Self {
            pos: IVec2::new(config.lane_x(lane), -config.car_height),
            lane,
            color,
        }
    }

    /// Scroll toward the player. Off-screen removal is the caller's job.
    #[inline]
    pub fn advance(&mut self, speed: i32) {
        self.pos.y = self.pos.y.saturating_add(speed);
    }
}

impl Vehicle for ObstacleCar {
    fn pos(&self) -> IVec2 {
        self.pos
    }
}
