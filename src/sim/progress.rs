//! Score and distance tracking
//!
//! Score ticks up on elapsed play time; progress grows by the scroll speed
//! every tick and is compared against the level length for victory.

use serde::{Deserialize, Serialize};

use crate::config::LevelLength;

/// What the HUD shows next to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressDisplay {
    /// Percent of the level covered, capped at 100
    Percent(u8),
    Infinite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub score: u64,
    /// Distance covered this session
    pub distance: u64,
    pub level_length: LevelLength,
    /// Start of the scoring interval currently accruing
    last_scored_ms: u64,
}

impl Progress {
    pub fn new(level_length: LevelLength) -> Self {
        Self {
            score: 0,
            distance: 0,
            level_length,
            last_scored_ms: 0,
        }
    }

    /// Anchor the score clock when play begins
    pub fn start(&mut self, now_ms: u64) {
        self.last_scored_ms = now_ms;
    }

    pub fn last_scored_ms(&self) -> u64 {
        self.last_scored_ms
    }

    /// Award one increment per whole interval elapsed.
    ///
    /// The anchor moves forward by exact interval boundaries rather than to
    /// `now_ms`, so late ticks do not accumulate drift.
    pub fn update_score(&mut self, now_ms: u64, interval_ms: u64, increment: u64) -> u64 {
        if interval_ms == 0 {
            return 0;
        }
        let elapsed = now_ms.saturating_sub(self.last_scored_ms);
        let intervals = elapsed / interval_ms;
        if intervals > 0 {
            self.last_scored_ms += intervals * interval_ms;
            self.score = self.score.saturating_add(intervals * increment);
        }
        intervals
    }

    /// Add one tick's worth of distance. Negative speeds are ignored.
    pub fn advance(&mut self, speed: i32) {
        self.distance = self.distance.saturating_add(speed.max(0) as u64);
    }

    pub fn level_complete(&self) -> bool {
        self.level_length.reached_by(self.distance)
    }

    pub fn display(&self) -> ProgressDisplay {
        match self.level_length {
            LevelLength::Infinite => ProgressDisplay::Infinite,
            LevelLength::Finite(0) => ProgressDisplay::Percent(100),
            LevelLength::Finite(len) => {
                let percent = (self.distance * 100 / u64::from(len)).min(100);
                ProgressDisplay::Percent(percent as u8)
            }
        }
    }
}
