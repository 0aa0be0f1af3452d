//! Game settings
//!
//! Everything tunable about a session, persisted as JSON next to the
//! leaderboard. Missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{COLLISION_TOLERANCE, MAX_FRAME_DELTA_MS, WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::PersistenceError;
use crate::persistence;
use crate::sim::food::FoodConfig;
use crate::sim::worm::WormConfig;

/// What happens when the worm's head reaches the arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryPolicy {
    /// The worm dies
    #[default]
    Death,
    /// The head reappears on the opposite edge
    Wrap,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Death => "Death",
            BoundaryPolicy::Wrap => "Wrap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "death" | "walls" => Some(BoundaryPolicy::Death),
            "wrap" | "wraparound" => Some(BoundaryPolicy::Wrap),
            _ => None,
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// False for NaN as well
fn non_negative(value: f64) -> bool {
    value >= 0.0
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub world_width: f64,
    pub world_height: f64,
    pub boundary_policy: BoundaryPolicy,

    // === Simulation ===
    pub worm: WormConfig,
    pub food: FoodConfig,
    /// Added to radius sums in every circle test
    pub collision_tolerance: f64,
    /// Broad-phase self-collision through a spatial grid
    pub use_spatial_grid: bool,
    /// Food placement seed
    pub seed: u64,

    // === Frame loop ===
    /// Longest step a single frame may integrate (ms)
    pub max_frame_delta_ms: f64,

    // === Player ===
    /// Scores are only reported when a player is set
    pub player_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            boundary_policy: BoundaryPolicy::Death,

            worm: WormConfig::default(),
            food: FoodConfig::default(),
            collision_tolerance: COLLISION_TOLERANCE,
            use_spatial_grid: false,
            seed: 0x5eed,

            max_frame_delta_ms: MAX_FRAME_DELTA_MS,

            player_id: None,
        }
    }
}

impl Settings {
    /// Settings with the given boundary policy and defaults elsewhere
    pub fn with_policy(policy: BoundaryPolicy) -> Self {
        Self {
            boundary_policy: policy,
            ..Self::default()
        }
    }

    /// Replace out-of-range values with usable ones, logging each fix
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(positive(self.world_width) && positive(self.world_height)) {
            log::warn!(
                "Invalid arena {}x{}, using {}x{}",
                self.world_width,
                self.world_height,
                defaults.world_width,
                defaults.world_height
            );
            self.world_width = defaults.world_width;
            self.world_height = defaults.world_height;
        }
        if !positive(self.max_frame_delta_ms) {
            log::warn!(
                "Invalid max_frame_delta_ms {}, using {}",
                self.max_frame_delta_ms,
                defaults.max_frame_delta_ms
            );
            self.max_frame_delta_ms = defaults.max_frame_delta_ms;
        }
        if !non_negative(self.collision_tolerance) {
            log::warn!("Invalid collision_tolerance {}, using 0", self.collision_tolerance);
            self.collision_tolerance = 0.0;
        }
        if !non_negative(self.food.spawn_interval_ms) {
            log::warn!(
                "Invalid food spawn interval {}, using {}",
                self.food.spawn_interval_ms,
                defaults.food.spawn_interval_ms
            );
            self.food.spawn_interval_ms = defaults.food.spawn_interval_ms;
        }
        self.worm = self.worm.sanitized();
        self
    }

    /// Load from `path`, falling back to defaults if it is missing or invalid
    ///
    /// Values that parse but are out of range are repaired by `sanitized`.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match persistence::load_json(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                Self::sanitized(settings)
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
