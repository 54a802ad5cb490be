//! Lane Dash entry point
//!
//! Headless native host: runs one autopiloted session on a virtual clock and
//! logs what happens. Usage: `lane-dash [level] [config.json]`

use lane_dash::autopilot::choose_move;
use lane_dash::sim::TickOutcome;
use lane_dash::{Command, Controller, FixedTimestep, GameConfig, GameEvent, ScreenMode};

/// Safety cap on simulated time (10 minutes)
const MAX_RUN_MS: u64 = 10 * 60 * 1000;

fn main() {
    env_logger::init();
    log::info!("Lane Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(arg) => arg.parse::<u32>().unwrap_or_else(|_| {
            log::warn!("Level '{}' is not a number; playing level 1", arg);
            1
        }),
        None => 1,
    };
    let config = match args.next() {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };

    let mut step = FixedTimestep::new(config.tick_interval_ms);
    let tick_ms = step.interval_ms();
    let mut controller = Controller::new(config, 0);
    let mut now: u64 = 0;
    step.advance(now);

    controller.handle(Command::SkipSplash, now);
    if level == 0 {
        controller.handle(Command::StartInfinite, now);
    } else {
        controller.handle(Command::OpenLevels, now);
        controller.handle(Command::SelectLevel(level), now);
    }
    controller.handle(Command::StartPlaying, now);

    while controller.mode() == ScreenMode::Playing && now < MAX_RUN_MS {
        now += tick_ms;
        for _ in 0..step.advance(now) {
            if let Some(command) = choose_move(controller.session()) {
                controller.handle(command, now);
            }
            if controller.update(now) != TickOutcome::Continue {
                break;
            }
        }
        for event in controller.drain_events() {
            log::debug!("Event: {:?}", event);
            match event {
                GameEvent::Victory { score } => println!("Victory! Final score: {}", score),
                GameEvent::Defeat { score } => println!("Crashed. Final score: {}", score),
                _ => {}
            }
        }
    }

    if controller.mode() == ScreenMode::Playing {
        let snapshot = controller.snapshot();
        println!(
            "Stopped after {}s with score {} ({:?})",
            now / 1000,
            snapshot.score,
            snapshot.progress
        );
    }

    match serde_json::to_string(&controller.snapshot()) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
}
