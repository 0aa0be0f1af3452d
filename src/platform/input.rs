//! Keyboard state tracking with edge detection
//!
//! Raw key events update the current key set as they arrive. `update` rolls
//! current into previous and must run exactly once per tick, after the tick
//! has consumed its input; that ordering is what makes "just pressed" true on
//! the first tick a key is held and false afterwards.

use std::collections::HashSet;

use crate::sim::{InputState, Vector2D};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
    R,
    /// Debug speed toggle
    Backquote,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "KeyW" => Some(Key::W),
            "KeyA" => Some(Key::A),
            "KeyS" => Some(Key::S),
            "KeyD" => Some(Key::D),
            "Space" => Some(Key::Space),
            "KeyR" => Some(Key::R),
            "Backquote" => Some(Key::Backquote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    current: HashSet<Key>,
    previous: HashSet<Key>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.current.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.current.remove(&key);
    }

    /// Forward a DOM key code; unknown codes are ignored
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        match (Key::from_code(code), pressed) {
            (Some(key), true) => self.key_down(key),
            (Some(key), false) => self.key_up(key),
            (None, _) => {}
        }
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.current.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }

    pub fn is_key_just_released(&self, key: Key) -> bool {
        !self.current.contains(&key) && self.previous.contains(&key)
    }

    fn any_pressed(&self, keys: [Key; 2]) -> bool {
        keys.iter().any(|k| self.is_key_pressed(*k))
    }

    /// Snapshot for the current tick
    pub fn snapshot(&self) -> InputState {
        InputState {
            up: self.any_pressed([Key::ArrowUp, Key::W]),
            down: self.any_pressed([Key::ArrowDown, Key::S]),
            left: self.any_pressed([Key::ArrowLeft, Key::A]),
            right: self.any_pressed([Key::ArrowRight, Key::D]),
            space: self.is_key_just_pressed(Key::Space),
            reset: self.is_key_just_pressed(Key::R),
            debug_speed: self.is_key_just_pressed(Key::Backquote),
        }
    }

    /// Normalized sum of the held directional keys
    pub fn direction_vector(&self) -> Vector2D {
        self.snapshot().direction()
    }

    /// Roll current state into previous; call once per tick, last
    pub fn update(&mut self) {
        self.previous.clone_from(&self.current);
    }

    /// Forget every key
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }

    /// Window lost focus; key-ups for held keys will never arrive
    pub fn on_focus_lost(&mut self) {
        self.clear();
    }
}
