//! Worm Arena - a continuous-space snake game core
//!
//! Core modules:
//! - `sim`: Simulation (vector math, collisions, worm, food, game state)
//! - `game`: Frame loop orchestration and score reporting
//! - `renderer`: Rendering port and an ASCII renderer
//! - `platform`: Keyboard state and frame timing
//! - `persistence`: JSON save/load
//! - `settings` / `highscores`: Configuration and the local leaderboard

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{DomainError, PersistenceError, RenderError, ReportError};
pub use game::{Game, ScoreReport, ScoreReporter};
pub use highscores::{HighScores, LocalLeaderboard};
pub use settings::{BoundaryPolicy, Settings};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions in pixels
    pub const WORLD_WIDTH: f64 = 800.0;
    pub const WORLD_HEIGHT: f64 = 600.0;

    /// Longest frame the simulation will advance in one step (30 FPS floor)
    pub const MAX_FRAME_DELTA_MS: f64 = 1000.0 / 30.0;

    /// Slack added to every overlap test, in pixels
    pub const COLLISION_TOLERANCE: f64 = 0.1;
    /// Segments next to the head that can never collide with it
    pub const SELF_COLLISION_SKIP: usize = 3;

    /// Segments added per food eaten
    pub const GROWTH_RATE: usize = 3;
    /// After a wrap, segments further than this many spacings from their
    /// leader are pulled back behind it
    pub const WRAP_RECONCILE_FACTOR: f64 = 3.0;
    /// Worm speed multiplier while the debug toggle is on
    pub const DEBUG_SPEED_MULTIPLIER: f64 = 2.0;

    /// Random positions tried before a food spawn gives up on clearance
    pub const MAX_SPAWN_ATTEMPTS: usize = 50;
}
