//! Fixed-interval simulation tick
//!
//! Advances a running session by one step. Step order is fixed:
//! road, obstacles, wave spawn, purge, collision, score/progress, victory.

use super::collision::first_collision;
use super::spawner::purge_offscreen;
use super::state::{DriverState, Session};

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session not running; nothing changed
    Idle,
    /// Advanced one step, run continues
    Continue,
    /// Player hit an obstacle; driver stopped
    Defeat { score: u64 },
    /// Level distance reached; driver stopped
    Victory { score: u64 },
}

/// Advance the session by one tick at wall-clock time `now_ms`
pub fn tick(session: &mut Session, now_ms: u64) -> TickOutcome {
    if session.driver != DriverState::Running {
        return TickOutcome::Idle;
    }
    session.time_ticks += 1;

    let speed = session.config.scroll_speed;
    let height = session.config.field_height;

    session.road.advance(speed, height);
    for obstacle in &mut session.obstacles {
        obstacle.advance(speed);
    }

    if let Some(wave) = session
        .spawner
        .try_spawn(now_ms, &session.config, &mut session.rng)
    {
        session.obstacles.extend(wave);
    }

    purge_offscreen(&mut session.obstacles, height);

    if let Some(hit) = first_collision(&session.player, &session.obstacles, &session.config) {
        session.stop();
        let score = session.progress.score;
        log::info!(
            "Crash in lane {} with obstacle #{} after {} ticks, score {}",
            session.player.lane,
            hit,
            session.time_ticks,
            score
        );
        return TickOutcome::Defeat { score };
    }

    session.progress.update_score(
        now_ms,
        session.config.score_interval_ms,
        session.config.score_increment,
    );
    session.progress.advance(speed);

    if session.progress.level_complete() {
        session.stop();
        let score = session.progress.score;
        log::info!(
            "Level {} complete after {} ticks, score {}",
            session.level,
            session.time_ticks,
            score
        );
        return TickOutcome::Victory { score };
    }

    TickOutcome::Continue
}
