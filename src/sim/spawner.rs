//! Obstacle waves
//!
//! Every `spawn_interval_ms` a wave blocks a random subset of lanes, always
//! leaving at least `min_free_lanes` open. Obstacles that scroll past the
//! bottom edge are purged.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::entity::ObstacleCar;
use crate::config::GameConfig;

/// Pick the lanes one wave will block.
///
/// Draws the wave size uniformly from `1..=lane_count - min_free_lanes`, then
/// samples that many distinct lanes with a partial Fisher-Yates shuffle.
/// Returns an empty list when no lane may be blocked.
pub fn choose_wave_lanes<R: Rng + ?Sized>(
    lane_count: usize,
    min_free_lanes: usize,
    rng: &mut R,
) -> Vec<usize> {
    let max_blocked = lane_count.saturating_sub(min_free_lanes);
    if max_blocked == 0 {
        return Vec::new();
    }
    let lanes_to_block = rng.random_range(1..=max_blocked);

    let mut lanes: Vec<usize> = (0..lane_count).collect();
    let (chosen, _) = lanes.partial_shuffle(rng, lanes_to_block);
    chosen.to_vec()
}

/// Build one wave of obstacles, one per chosen lane
pub fn generate_wave<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Vec<ObstacleCar> {
    choose_wave_lanes(config.lane_count, config.min_free_lanes, rng)
        .into_iter()
        .map(|lane| {
            let color = config
                .obstacle_palette
                .choose(rng)
                .copied()
                .unwrap_or_default();
            ObstacleCar::spawn(config, lane, color)
        })
        .collect()
}

/// Wave timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveSpawner {
    last_spawn_ms: u64,
}

impl WaveSpawner {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_spawn_ms: now_ms,
        }
    }

    /// Restart the interval from `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        self.last_spawn_ms = now_ms;
    }

    pub fn last_spawn_ms(&self) -> u64 {
        self.last_spawn_ms
    }

    /// Spawn a wave if the interval has elapsed.
    ///
    /// The timer restarts from `now_ms` whenever the interval elapses, even if
    /// the wave turns out empty.
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<Vec<ObstacleCar>> {
        if now_ms.saturating_sub(self.last_spawn_ms) < config.spawn_interval_ms {
            return None;
        }
        self.last_spawn_ms = now_ms;

        let wave = generate_wave(config, rng);
        if wave.is_empty() {
            log::debug!(
                "Wave skipped: {} lanes with {} required free",
                config.lane_count,
                config.min_free_lanes
            );
            return None;
        }
        log::debug!(
            "Wave at {}ms blocks lanes {:?}",
            now_ms,
            wave.iter().map(|o| o.lane).collect::<Vec<_>>()
        );
        Some(wave)
    }
}

/// Drop every obstacle whose y is past the bottom edge. Returns how many went.
pub fn purge_offscreen(obstacles: &mut Vec<ObstacleCar>, field_height: i32) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.pos.y <= field_height);
    before - obstacles.len()
}
