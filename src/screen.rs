//! Screen state machine
//!
//! Exactly one `ScreenMode` is active. Input commands are routed through a
//! single dispatch table (`route`) keyed on the active mode; commands with no
//! entry for the current mode are ignored. Entering `Playing` always resets
//! the session, and leaving it always stops the tick driver.

use serde::{Deserialize, Serialize};

use crate::config::{CarColor, GameConfig};
use crate::consts::MAX_PENDING_EVENTS;
use crate::sim::{ObstacleCar, PlayerCar, ProgressDisplay, Session, TickOutcome, tick};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenMode {
    Splash,
    Menu,
    LevelSelect,
    Customize,
    Playing,
    Victory,
    Defeat,
}

impl ScreenMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenMode::Splash => "Splash",
            ScreenMode::Menu => "Menu",
            ScreenMode::LevelSelect => "LevelSelect",
            ScreenMode::Customize => "Customize",
            ScreenMode::Playing => "Playing",
            ScreenMode::Victory => "Victory",
            ScreenMode::Defeat => "Defeat",
        }
    }
}

/// Input commands from the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Leave the splash screen before its timer runs out
    SkipSplash,
    OpenLevels,
    OpenCustomize,
    /// Play level 0 (endless)
    StartInfinite,
    /// Hover/highlight a level on the level select screen
    HighlightLevel(u32),
    SelectLevel(u32),
    SelectColor(CarColor),
    /// Cycle to the next color in the player palette
    NextColor,
    ReturnToMenu,
    Retry,
    Exit,
    /// Unfreeze the playing screen
    StartPlaying,
    MoveLeft,
    MoveRight,
}

/// Signals for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScreenEntered(ScreenMode),
    SessionStarted { level: u32 },
    Defeat { score: u64 },
    Victory { score: u64 },
    ColorChanged(CarColor),
    QuitRequested,
}

/// What a routed command does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Goto(ScreenMode),
    Play(u32),
    Replay,
    Highlight(u32),
    PickColor(CarColor),
    CycleColor,
    Start,
    MoveLeft,
    MoveRight,
    Quit,
}

/// Dispatch table: (active mode, command) -> action
fn route(mode: ScreenMode, command: Command) -> Option<Action> {
    use Command as C;
    use ScreenMode as M;

    let action = match (mode, command) {
        (M::Splash, C::SkipSplash) => Action::Goto(M::Menu),

        (M::Menu, C::OpenLevels) => Action::Goto(M::LevelSelect),
        (M::Menu, C::OpenCustomize) => Action::Goto(M::Customize),
        (M::Menu, C::StartInfinite) => Action::Play(0),
        (M::Menu, C::Exit) => Action::Quit,

        (M::LevelSelect, C::HighlightLevel(level)) => Action::Highlight(level),
        (M::LevelSelect, C::SelectLevel(level)) => Action::Play(level),

        (M::Customize, C::SelectColor(color)) => Action::PickColor(color),
        (M::Customize, C::NextColor) => Action::CycleColor,

        (M::LevelSelect | M::Customize | M::Victory | M::Defeat, C::ReturnToMenu) => {
            Action::Goto(M::Menu)
        }
        (M::Defeat, C::Retry) => Action::Replay,

        (M::Playing, C::StartPlaying) => Action::Start,
        (M::Playing, C::MoveLeft) => Action::MoveLeft,
        (M::Playing, C::MoveRight) => Action::MoveRight,

        _ => return None,
    };
    Some(action)
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: ScreenMode,
    pub player: PlayerCar,
    pub obstacles: Vec<ObstacleCar>,
    pub road_offset: i32,
    pub score: u64,
    pub progress: ProgressDisplay,
    pub started: bool,
    pub level: u32,
    pub final_score: Option<u64>,
    pub selected_color: CarColor,
    pub highlighted_level: Option<u32>,
}

/// Owns the session and the active screen
#[derive(Debug, Clone)]
pub struct Controller {
    mode: ScreenMode,
    mode_entered_ms: u64,
    session: Session,
    selected_color: CarColor,
    highlighted_level: Option<u32>,
    /// Score of the last finished run, shown on Victory/Defeat
    final_score: Option<u64>,
    /// Pending signals, oldest first. Capped at `MAX_PENDING_EVENTS`; hosts
    /// that never call `drain_events` only lose the oldest entries.
    events: Vec<GameEvent>,
    quit_requested: bool,
}

impl Controller {
    /// Start on the splash screen at `now_ms`. An invalid config is replaced
    /// by the defaults.
    pub fn new(config: GameConfig, now_ms: u64) -> Self {
        let config = config.validated_or_default();
        let seed = config.seed.unwrap_or_else(rand::random);
        let selected_color = config.default_player_color;
        log::info!("Controller created (seed {})", seed);
        Self {
            mode: ScreenMode::Splash,
            mode_entered_ms: now_ms,
            session: Session::new(config, seed),
            selected_color,
            highlighted_level: None,
            final_score: None,
            events: vec![GameEvent::ScreenEntered(ScreenMode::Splash)],
            quit_requested: false,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        self.session.config()
    }

    pub fn selected_color(&self) -> CarColor {
        self.selected_color
    }

    pub fn highlighted_level(&self) -> Option<u32> {
        self.highlighted_level
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Take all events emitted since the last call (at most
    /// `MAX_PENDING_EVENTS`; older ones are dropped)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply an input command. Returns false if the active screen ignores it.
    pub fn handle(&mut self, command: Command, now_ms: u64) -> bool {
        let Some(action) = route(self.mode, command) else {
            log::debug!("Ignoring {:?} on {}", command, self.mode.as_str());
            return false;
        };

        match action {
            Action::Goto(mode) => {
                self.enter(mode, now_ms);
                true
            }
            Action::Play(level) => {
                self.play(level, now_ms);
                true
            }
            Action::Replay => {
                let level = self.session.level();
                self.play(level, now_ms);
                true
            }
            Action::Highlight(level) => {
                self.highlighted_level = Some(level);
                true
            }
            Action::PickColor(color) => self.pick_color(color),
            Action::CycleColor => {
                let palette = &self.session.config().player_palette;
                let next = palette
                    .iter()
                    .position(|c| *c == self.selected_color)
                    .map(|i| palette[(i + 1) % palette.len()])
                    .or_else(|| palette.first().copied());
                match next {
                    Some(color) => self.pick_color(color),
                    None => false,
                }
            }
            Action::Start => {
                let started = self.session.start(now_ms);
                if started {
                    self.emit(GameEvent::SessionStarted {
                        level: self.session.level(),
                    });
                }
                started
            }
            Action::MoveLeft => self.session.move_left(),
            Action::MoveRight => self.session.move_right(),
            Action::Quit => {
                log::info!("Quit requested from menu");
                self.quit_requested = true;
                self.emit(GameEvent::QuitRequested);
                true
            }
        }
    }

    /// Advance timers and run one simulation tick if a run is in progress
    pub fn update(&mut self, now_ms: u64) -> TickOutcome {
        match self.mode {
            ScreenMode::Splash => {
                let elapsed = now_ms.saturating_sub(self.mode_entered_ms);
                if elapsed >= self.session.config().splash_duration_ms {
                    self.enter(ScreenMode::Menu, now_ms);
                }
                TickOutcome::Idle
            }
            ScreenMode::Playing => {
                let outcome = tick(&mut self.session, now_ms);
                match outcome {
                    TickOutcome::Defeat { score } => {
                        self.final_score = Some(score);
                        self.emit(GameEvent::Defeat { score });
                        self.enter(ScreenMode::Defeat, now_ms);
                    }
                    TickOutcome::Victory { score } => {
                        self.final_score = Some(score);
                        self.emit(GameEvent::Victory { score });
                        self.enter(ScreenMode::Victory, now_ms);
                    }
                    TickOutcome::Idle | TickOutcome::Continue => {}
                }
                outcome
            }
            _ => TickOutcome::Idle,
        }
    }

    /// Everything a renderer reads for the current frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            player: self.session.player().clone(),
            obstacles: self.session.obstacles().to_vec(),
            road_offset: self.session.road_offset(),
            score: self.session.score(),
            progress: self.session.progress_display(),
            started: self.session.has_started(),
            level: self.session.level(),
            final_score: self.final_score,
            selected_color: self.selected_color,
            highlighted_level: self.highlighted_level,
        }
    }

    fn play(&mut self, level: u32, now_ms: u64) {
        self.final_score = None;
        self.session.set_player_color(self.selected_color);
        self.session.reset_game(level);
        self.enter(ScreenMode::Playing, now_ms);
    }

    fn pick_color(&mut self, color: CarColor) -> bool {
        if !self.session.config().player_palette.contains(&color) {
            log::warn!(
                "Color {} is not offered; keeping {}",
                color.as_str(),
                self.selected_color.as_str()
            );
            return false;
        }
        self.selected_color = color;
        self.emit(GameEvent::ColorChanged(color));
        true
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.remove(0);
            log::debug!("Event queue full; dropping {:?}", dropped);
        }
        self.events.push(event);
    }

    fn enter(&mut self, mode: ScreenMode, now_ms: u64) {
        if mode != ScreenMode::Playing {
            self.session.stop();
        }
        if mode == ScreenMode::LevelSelect {
            self.highlighted_level = None;
        }
        log::info!("Screen {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        self.mode_entered_ms = now_ms;
        self.emit(GameEvent::ScreenEntered(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelLength;
    use crate::sim::DriverState;

    fn quiet_config() -> GameConfig {
        GameConfig {
            min_free_lanes: 3,
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn at_menu(config: GameConfig) -> Controller {
        let mut controller = Controller::new(config, 0);
        assert!(controller.handle(Command::SkipSplash, 0));
        controller.drain_events();
        controller
    }

    #[test]
    fn test_splash_timer_goes_to_menu() {
        let mut controller = Controller::new(quiet_config(), 1_000);
        assert_eq!(controller.mode(), ScreenMode::Splash);
        controller.update(3_999);
        assert_eq!(controller.mode(), ScreenMode::Splash);
        controller.update(4_000);
        assert_eq!(controller.mode(), ScreenMode::Menu);
        assert_eq!(
            controller.drain_events(),
            vec![
                GameEvent::ScreenEntered(ScreenMode::Splash),
                GameEvent::ScreenEntered(ScreenMode::Menu),
            ]
        );
    }

    #[test]
    fn test_menu_navigation() {
        let mut controller = at_menu(quiet_config());

        assert!(controller.handle(Command::OpenCustomize, 0));
        assert_eq!(controller.mode(), ScreenMode::Customize);
        assert!(controller.handle(Command::ReturnToMenu, 0));

        assert!(controller.handle(Command::OpenLevels, 0));
        assert_eq!(controller.mode(), ScreenMode::LevelSelect);
        assert!(controller.handle(Command::ReturnToMenu, 0));
        assert_eq!(controller.mode(), ScreenMode::Menu);
    }

    #[test]
    fn test_unrouted_commands_ignored() {
        let mut controller = at_menu(quiet_config());
        assert!(!controller.handle(Command::Retry, 0));
        assert!(!controller.handle(Command::MoveLeft, 0));
        assert!(!controller.handle(Command::SelectLevel(1), 0));
        assert_eq!(controller.mode(), ScreenMode::Menu);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_select_level_enters_frozen_playing() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::OpenLevels, 0);
        assert!(controller.handle(Command::SelectLevel(2), 0));

        assert_eq!(controller.mode(), ScreenMode::Playing);
        assert_eq!(controller.session().driver(), DriverState::NotStarted);
        assert_eq!(controller.session().level_length(), LevelLength::Finite(7500));
        assert!(!controller.snapshot().started);

        // Frozen until the start command
        controller.update(20);
        assert_eq!(controller.session().distance(), 0);

        assert!(controller.handle(Command::StartPlaying, 20));
        controller.update(40);
        assert_eq!(controller.session().distance(), 6);
        assert!(controller.snapshot().started);
    }

    #[test]
    fn test_infinite_mode_from_menu() {
        let mut controller = at_menu(quiet_config());
        assert!(controller.handle(Command::StartInfinite, 0));
        assert_eq!(controller.mode(), ScreenMode::Playing);
        assert_eq!(controller.session().level(), 0);
        assert_eq!(controller.snapshot().progress, ProgressDisplay::Infinite);
    }

    #[test]
    fn test_invalid_level_still_plays() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::OpenLevels, 0);
        assert!(controller.handle(Command::SelectLevel(17), 0));
        assert_eq!(controller.mode(), ScreenMode::Playing);
        assert_eq!(controller.session().level_length(), LevelLength::Finite(5000));
    }

    #[test]
    fn test_defeat_then_retry_same_level() {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        let mut controller = at_menu(config);
        controller.handle(Command::OpenLevels, 0);
        controller.handle(Command::SelectLevel(3), 0);
        controller.handle(Command::StartPlaying, 0);
        controller.drain_events();

        // Sitting still eventually meets an obstacle
        let mut now = 0;
        while controller.mode() == ScreenMode::Playing {
            now += 20;
            controller.update(now);
            assert!(now < 600_000, "player should crash eventually");
        }
        assert_eq!(controller.mode(), ScreenMode::Defeat);
        assert_eq!(controller.session().driver(), DriverState::Stopped);

        let events = controller.drain_events();
        let defeats = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Defeat { .. }))
            .count();
        assert_eq!(defeats, 1);
        assert_eq!(events.last(), Some(&GameEvent::ScreenEntered(ScreenMode::Defeat)));
        assert!(controller.final_score().is_some());

        // Further updates do nothing on the defeat screen
        assert_eq!(controller.update(now + 20), TickOutcome::Idle);

        assert!(controller.handle(Command::Retry, now));
        assert_eq!(controller.mode(), ScreenMode::Playing);
        assert_eq!(controller.session().level(), 3);
        assert_eq!(controller.session().score(), 0);
        assert!(controller.session().obstacles().is_empty());
        assert_eq!(controller.final_score(), None);
    }

    #[test]
    fn test_victory_then_menu() {
        let config = GameConfig {
            levels: vec![LevelLength::Infinite, LevelLength::Finite(60)],
            ..quiet_config()
        };
        let mut controller = at_menu(config);
        controller.handle(Command::OpenLevels, 0);
        controller.handle(Command::SelectLevel(1), 0);
        controller.handle(Command::StartPlaying, 0);

        for n in 1..10u64 {
            assert_eq!(controller.update(n * 20), TickOutcome::Continue);
        }
        assert_eq!(controller.update(200), TickOutcome::Victory { score: 0 });
        assert_eq!(controller.mode(), ScreenMode::Victory);
        assert_eq!(controller.final_score(), Some(0));

        // No retry from the victory screen
        assert!(!controller.handle(Command::Retry, 220));
        assert!(controller.handle(Command::ReturnToMenu, 220));
        assert_eq!(controller.mode(), ScreenMode::Menu);
    }

    #[test]
    fn test_customize_color_applies_to_next_run() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::OpenCustomize, 0);

        assert!(!controller.handle(Command::SelectColor(CarColor::Green), 0));
        assert!(controller.handle(Command::SelectColor(CarColor::Cyan), 0));
        assert!(controller.handle(Command::NextColor, 0));
        assert_eq!(controller.selected_color(), CarColor::Magenta);
        assert!(controller.handle(Command::NextColor, 0));
        assert_eq!(controller.selected_color(), CarColor::Black);

        controller.handle(Command::ReturnToMenu, 0);
        controller.handle(Command::StartInfinite, 0);
        assert_eq!(controller.session().player().color, CarColor::Black);
    }

    #[test]
    fn test_level_select_clears_highlight() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::OpenLevels, 0);
        controller.handle(Command::HighlightLevel(2), 0);
        assert_eq!(controller.highlighted_level(), Some(2));
        controller.handle(Command::ReturnToMenu, 0);
        controller.handle(Command::OpenLevels, 0);
        assert_eq!(controller.highlighted_level(), None);
    }

    #[test]
    fn test_exit_requests_quit() {
        let mut controller = at_menu(quiet_config());
        assert!(controller.handle(Command::Exit, 0));
        assert!(controller.quit_requested());
        assert_eq!(controller.drain_events(), vec![GameEvent::QuitRequested]);
    }

    #[test]
    fn test_lane_moves_need_started_session() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::StartInfinite, 0);
        assert!(!controller.handle(Command::MoveLeft, 0));
        controller.handle(Command::StartPlaying, 0);
        assert!(controller.handle(Command::MoveLeft, 0));
        assert!(!controller.handle(Command::MoveLeft, 0));
        assert_eq!(controller.snapshot().player.lane, 0);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = GameConfig {
            road_margin_divisor: 0,
            seed: Some(5),
            ..GameConfig::default()
        };
        let mut controller = Controller::new(config, 0);
        assert_eq!(controller.config(), &GameConfig::default());
        controller.handle(Command::SkipSplash, 0);
        controller.handle(Command::StartInfinite, 0);
        controller.handle(Command::StartPlaying, 0);
        assert_eq!(controller.update(20), TickOutcome::Continue);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut controller = at_menu(quiet_config());
        controller.handle(Command::OpenCustomize, 0);
        for _ in 0..MAX_PENDING_EVENTS + 10 {
            controller.handle(Command::NextColor, 0);
        }
        let events = controller.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(
            events
                .iter()
                .all(|e| matches!(e, GameEvent::ColorChanged(_)))
        );
    }
}
