//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Wall-clock time is passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod progress;
pub mod road;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{any_collision, first_collision};
pub use entity::{Hitbox, ObstacleCar, PlayerCar, Vehicle};
pub use progress::{Progress, ProgressDisplay};
pub use road::Road;
pub use spawner::{WaveSpawner, choose_wave_lanes, generate_wave, purge_offscreen};
pub use state::{DriverState, Session};
pub use tick::{TickOutcome, tick};
