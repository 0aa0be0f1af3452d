//! Rendering port
//!
//! The game hands renderers a read-only snapshot once per frame. Renderers
//! never see or mutate `GameState` itself.

pub mod text;

use serde::Serialize;

use crate::error::RenderError;
use crate::sim::{FoodKind, GamePhase, GameState, Vector2D};

pub use text::TextRenderer;

/// Anything that can draw a frame
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot) -> Result<(), RenderError>;
}

/// Worm as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WormView {
    pub segments: Vec<Vector2D>,
    pub radius: f64,
    pub direction: Vector2D,
    pub alive: bool,
}

/// Active food item as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    pub id: u32,
    pub kind: FoodKind,
    pub position: Vector2D,
    pub effective_radius: f64,
    pub rotation: f64,
    /// 0xRRGGBB
    pub color: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub food_count: u32,
    pub game_time_secs: f64,
    /// Eat flash intensity, 0..=1
    pub flash: f64,
    pub world_width: f64,
    pub world_height: f64,
    pub worm: WormView,
    pub food: Vec<FoodView>,
    /// Set when the frame loop stopped on an error
    pub fault: Option<String>,
    pub fps: u32,
}

impl RenderSnapshot {
    /// Copy the drawable parts of `state`
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            food_count: state.food_count,
            game_time_secs: state.game_time_secs(),
            flash: state.flash,
            world_width: state.bounds.width(),
            world_height: state.bounds.height(),
            worm: WormView {
                segments: state.worm.segments().to_vec(),
                radius: state.worm.radius(),
                direction: state.worm.direction(),
                alive: state.worm.is_alive(),
            },
            food: state
                .food
                .foods()
                .iter()
                .filter(|f| f.is_active())
                .map(|f| FoodView {
                    id: f.id,
                    kind: f.kind(),
                    position: f.position(),
                    effective_radius: f.effective_radius(),
                    rotation: f.rotation(),
                    color: f.kind().color(),
                })
                .collect(),
            fault: None,
            fps: 0,
        }
    }
}
