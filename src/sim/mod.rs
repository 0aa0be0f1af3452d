//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, reads the
//! keyboard or touches the clock:
//! - Time arrives as a millisecond delta
//! - Randomness comes from seeded RNGs
//! - Input arrives as an `InputState` snapshot

pub mod collision;
pub mod food;
pub mod math;
pub mod spatial;
pub mod state;
pub mod tick;
pub mod vector;
pub mod worm;

pub use collision::{CollisionDetector, CollisionResult, Rect};
pub use food::{Food, FoodConfig, FoodKind, FoodManager};
pub use spatial::SpatialGrid;
pub use state::{DeathCause, FLASH_DURATION_MS, GameEvent, GamePhase, GameState, spawn_point};
pub use tick::{InputState, tick};
pub use vector::Vector2D;
pub use worm::{Worm, WormConfig};
