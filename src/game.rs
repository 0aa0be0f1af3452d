//! Frame-level orchestration
//!
//! `Game` owns the simulation state and the host-facing pieces around it:
//! keyboard state, frame clock, the score reporter and the fault screen.
//! Each frame it clamps the elapsed time, ticks the simulation with an input
//! snapshot, forwards game-over results to the reporter, rolls the input
//! state and finally hands a snapshot to the renderer.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::platform::{FrameClock, InputHandler, Key};
use crate::renderer::{RenderSnapshot, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// Result of one finished game, in the leaderboard's wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub player_id: String,
    pub score: u64,
    pub food_count: u32,
    /// Seconds played
    pub game_time: f64,
}

/// Receives finished games
///
/// Failures are logged by the caller and never affect gameplay.
pub trait ScoreReporter {
    fn submit(&mut self, report: &ScoreReport) -> Result<(), ReportError>;
}

pub struct Game {
    settings: Settings,
    state: GameState,
    input: InputHandler,
    clock: FrameClock,
    reporter: Option<Box<dyn ScoreReporter>>,
    player_id: Option<String>,
    /// Events produced by the most recent frame
    events: Vec<GameEvent>,
    /// Set when a frame failed; ticking stops until `restart`
    fault: Option<String>,
    /// Focus was lost while playing; pause on the next tick
    pause_requested: bool,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let state = GameState::new(&settings);
        let clock = FrameClock::new(settings.max_frame_delta_ms);
        let player_id = settings.player_id.clone();
        log::info!(
            "New game: {}x{} arena, {} boundary",
            settings.world_width,
            settings.world_height,
            settings.boundary_policy.as_str()
        );
        Self {
            settings,
            state,
            input: InputHandler::new(),
            clock,
            reporter: None,
            player_id,
            events: Vec::new(),
            fault: None,
            pause_requested: false,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ScoreReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Scores are only reported while a player is set
    pub fn set_player(&mut self, player_id: Option<String>) {
        self.player_id = player_id;
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Forward a DOM-style key code
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        self.input.key_event(code, pressed);
    }

    /// Window blur: drop held keys and pause a running game
    pub fn on_focus_lost(&mut self) {
        self.input.on_focus_lost();
        if self.state.phase == GamePhase::Playing {
            self.pause_requested = true;
            log::info!("Auto-paused (focus lost)");
        }
    }

    /// Run one display frame stamped `now_ms`
    pub fn frame(&mut self, now_ms: f64, renderer: &mut dyn Renderer) {
        let delta = self.clock.advance(now_ms);
        self.step(delta);
        self.draw(renderer);
    }

    /// Advance the simulation by `delta_ms` without drawing
    pub fn step(&mut self, delta_ms: f64) {
        self.events.clear();

        if self.fault.is_some() {
            if self.input.is_key_just_pressed(Key::R) {
                self.restart();
            }
            self.input.update();
            return;
        }

        let mut snapshot = self.input.snapshot();
        if std::mem::take(&mut self.pause_requested) && self.state.phase == GamePhase::Playing {
            snapshot.space = true;
        }

        tick(&mut self.state, &snapshot, delta_ms, &mut self.events);

        let finished: Vec<_> = self
            .events
            .iter()
            .filter_map(|event| match event {
                GameEvent::GameOver {
                    score,
                    food_count,
                    game_time_secs,
                } => Some((*score, *food_count, *game_time_secs)),
                _ => None,
            })
            .collect();
        for (score, food_count, game_time) in finished {
            self.report_score(score, food_count, game_time);
        }

        // Always last: input for this tick has been consumed
        self.input.update();
    }

    fn report_score(&mut self, score: u64, food_count: u32, game_time: f64) {
        let Some(player_id) = self.player_id.clone() else {
            log::debug!("No player set, score {score} not reported");
            return;
        };
        let Some(reporter) = self.reporter.as_mut() else {
            return;
        };
        let report = ScoreReport {
            player_id,
            score,
            food_count,
            game_time,
        };
        if let Err(e) = reporter.submit(&report) {
            log::warn!("Failed to submit score {score}: {e}");
        }
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        let snapshot = self.snapshot();
        if let Err(e) = renderer.render(&snapshot) {
            if self.fault.is_none() {
                log::error!("Frame failed, game halted: {e}");
                self.fault = Some(e.to_string());
            } else {
                log::debug!("Fault screen could not be drawn: {e}");
            }
        }
    }

    /// Leave the fault screen (or abandon the current game) for a fresh one
    pub fn restart(&mut self) {
        if let Some(fault) = self.fault.take() {
            log::info!("Restarting after fault: {fault}");
        }
        self.state = GameState::new(&self.settings);
        self.clock.reset();
        self.pause_requested = false;
        self.events.clear();
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            fault: self.fault.clone(),
            fps: self.clock.fps(),
            ..RenderSnapshot::capture(&self.state)
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
