//! Game state and phase machine types
//!
//! Everything one game needs to advance lives in `GameState`; `tick` is the
//! only code that mutates it during play.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionDetector, Rect};
use super::food::{FoodConfig, FoodKind, FoodManager};
use super::vector::Vector2D;
use super::worm::Worm;
use crate::settings::{BoundaryPolicy, Settings};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first directional input
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen until space is pressed again
    Paused,
    /// The worm died; only reset leaves this phase
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// Why a worm died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    SelfCollision,
    Boundary,
}

/// Something that happened during a tick, for the shell to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    FoodEaten { id: u32, kind: FoodKind, value: u32 },
    WormDied { cause: DeathCause },
    /// Emitted exactly once per game, on entering `GameOver`
    GameOver {
        score: u64,
        food_count: u32,
        game_time_secs: f64,
    },
    Reset,
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Base RNG seed for food placement
    pub seed: u64,
    pub phase: GamePhase,
    /// Sum of eaten food values; the authoritative score
    pub score: u64,
    /// Number of food items eaten
    pub food_count: u32,
    /// Milliseconds spent in `Playing`
    pub elapsed_ms: f64,
    /// Cosmetic flash after eating (1.0 fades to 0.0)
    pub flash: f64,
    pub worm: Worm,
    pub food: FoodManager,
    pub bounds: Rect,
    pub boundary_policy: BoundaryPolicy,
    /// Games started so far (advances the food seed on reset)
    pub games_played: u32,
    /// Guards the single `GameOver` event per game
    pub game_over_emitted: bool,
}

impl GameState {
    /// Fresh state in the `Menu` phase
    pub fn new(settings: &Settings) -> Self {
        let bounds = Rect::from_size(settings.world_width, settings.world_height);
        let detector =
            CollisionDetector::new(settings.collision_tolerance, settings.use_spatial_grid);
        let worm = Worm::new(spawn_point(&bounds), settings.worm).with_detector(detector);
        let food = FoodManager::new(settings.food, bounds, Pcg32::seed_from_u64(settings.seed));

        let mut state = Self {
            seed: settings.seed,
            phase: GamePhase::Menu,
            score: 0,
            food_count: 0,
            elapsed_ms: 0.0,
            flash: 0.0,
            worm,
            food,
            bounds,
            boundary_policy: settings.boundary_policy,
            games_played: 0,
            game_over_emitted: false,
        };
        state.food.reset(state.worm.segments());
        state
    }

    /// Start over: new worm, fresh food, zeroed score
    ///
    /// Each reset reseeds the food RNG from the base seed and game count so
    /// runs stay reproducible.
    pub fn reset_game(&mut self) {
        self.games_played += 1;
        self.score = 0;
        self.food_count = 0;
        self.elapsed_ms = 0.0;
        self.flash = 0.0;
        self.game_over_emitted = false;
        self.worm.reset();

        let config: FoodConfig = *self.food.config();
        let seed = self.seed.wrapping_add(u64::from(self.games_played));
        self.food = FoodManager::new(config, self.bounds, Pcg32::seed_from_u64(seed));
        self.food.reset(self.worm.segments());
        log::info!("Game reset (game #{})", self.games_played + 1);
    }

    /// Seconds spent playing
    pub fn game_time_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Worm spawn point: a third of the way across, vertically centred
pub fn spawn_point(bounds: &Rect) -> Vector2D {
    Vector2D::new(
        bounds.min.x + bounds.width() / 3.0,
        bounds.min.y + bounds.height() / 2.0,
    )
}

/// Flash duration in milliseconds
pub const FLASH_DURATION_MS: f64 = 300.0;
