//! Platform abstraction layer
//!
//! Handles the host-facing edges of the game:
//! - Keyboard state and edge detection
//! - Frame time and delta clamping

pub mod input;
pub mod time;

pub use input::{InputHandler, Key};
pub use time::FrameClock;
