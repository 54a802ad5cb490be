//! Demo driver
//!
//! Picks lane changes for attract mode and the headless binary. Issues at
//! most one lane change per call, like a player pressing a key between ticks.

use crate::screen::Command;
use crate::sim::{DriverState, Session};

/// Distance above the player's sprite where oncoming cars count as threats
fn lookahead(session: &Session) -> i32 {
    let config = session.config();
    config.car_height + 4 * config.scroll_speed
}

/// True if `lane` has an obstacle inside the danger band around the player
fn lane_threatened(session: &Session, lane: usize) -> bool {
    let config = session.config();
    let player_y = session.player().pos.y;
    let band_top = player_y - lookahead(session);
    let band_bottom = player_y + config.car_height;
    session
        .obstacles()
        .iter()
        .filter(|o| o.lane == lane)
        .any(|o| o.pos.y + config.car_height > band_top && o.pos.y < band_bottom)
}

/// True if moving into `lane` now would overlap an obstacle on the next tick
fn lane_blocked_now(session: &Session, lane: usize) -> bool {
    let config = session.config();
    let player_y = session.player().pos.y;
    let reach = config.car_height - 2 * config.hitbox_margin;
    session
        .obstacles()
        .iter()
        .filter(|o| o.lane == lane)
        .any(|o| (o.pos.y + config.scroll_speed - player_y).abs() < reach)
}

fn step_toward(from: usize, to: usize) -> Command {
    if to < from {
        Command::MoveLeft
    } else {
        Command::MoveRight
    }
}

/// Suggest the next lane change, if any
pub fn choose_move(session: &Session) -> Option<Command> {
    if session.driver() != DriverState::Running {
        return None;
    }
    let lane = session.player().lane;
    if !lane_threatened(session, lane) {
        return None;
    }

    let config = session.config();
    let middle = config.middle_lane();

    // Nearest open lane; ties go toward the middle to keep options on both sides
    let target = (0..config.lane_count)
        .filter(|&l| l != lane && !lane_threatened(session, l))
        .min_by_key(|&l| (l.abs_diff(lane), l.abs_diff(middle)));

    let Some(target) = target else {
        log::debug!("Autopilot boxed in at lane {}", lane);
        return None;
    };

    let next = if target < lane { lane - 1 } else { lane + 1 };
    if next != target && lane_blocked_now(session, next) {
        // Wait for the lane in between to clear
        return None;
    }
    Some(step_toward(lane, target))
}
