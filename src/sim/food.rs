//! Food items and their spawning policy
//!
//! A food item is created inactive, becomes active when spawned and inactive
//! again when eaten. `FoodManager` owns every item, drops eaten ones and tops
//! the arena back up on a timer.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::math;
use super::vector::Vector2D;
use crate::consts::MAX_SPAWN_ATTEMPTS;

/// Animation clock wraps at this many seconds
const ANIMATION_PERIOD_SECS: f64 = TAU;
/// Pulse amplitude around a scale of 1.0
const PULSE_AMPLITUDE: f64 = 0.1;
/// Pulse angular frequency (rad/s)
const PULSE_FREQUENCY: f64 = 2.0;
/// Required clearance, as a multiple of the food radius
const CLEARANCE_FACTOR: f64 = 4.0;

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FoodKind {
    #[default]
    Normal,
    Bonus,
    Speed,
}

impl FoodKind {
    pub fn radius(self) -> f64 {
        match self {
            FoodKind::Normal => 8.0,
            FoodKind::Bonus => 12.0,
            FoodKind::Speed => 6.0,
        }
    }

    /// Points awarded when eaten
    pub fn value(self) -> u32 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Bonus => 50,
            FoodKind::Speed => 20,
        }
    }

    /// Spin rate in rad/s
    pub fn rotation_rate(self) -> f64 {
        match self {
            FoodKind::Normal => 0.0,
            FoodKind::Bonus => PI,
            FoodKind::Speed => TAU,
        }
    }

    /// Fill color hint for renderers (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            FoodKind::Normal => 0xff4444,
            FoodKind::Bonus => 0xffd700,
            FoodKind::Speed => 0x44aaff,
        }
    }

    /// Weighted pick: 80% normal, 15% bonus, 5% speed
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match math::random_int(rng, 0, 99) {
            0..=79 => FoodKind::Normal,
            80..=94 => FoodKind::Bonus,
            _ => FoodKind::Speed,
        }
    }
}

/// A single food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: u32,
    kind: FoodKind,
    position: Vector2D,
    radius: f64,
    value: u32,
    active: bool,
    /// Seconds, wraps at `ANIMATION_PERIOD_SECS`
    animation_time: f64,
    pulse_scale: f64,
    rotation: f64,
}

impl Food {
    /// New inactive food of the given kind
    pub fn new(id: u32, kind: FoodKind) -> Self {
        Self {
            id,
            kind,
            position: Vector2D::ZERO,
            radius: kind.radius(),
            value: kind.value(),
            active: false,
            animation_time: 0.0,
            pulse_scale: 1.0,
            rotation: 0.0,
        }
    }

    /// New inactive food of a randomly picked kind
    pub fn create_random<R: Rng + ?Sized>(id: u32, rng: &mut R) -> Self {
        Self::new(id, FoodKind::random(rng))
    }

    /// Place the food somewhere in `bounds` away from `existing` positions
    ///
    /// Tries `MAX_SPAWN_ATTEMPTS` positions. If none has enough clearance the
    /// last one is used anyway, so spawning always succeeds.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: &Rect, existing: &[Vector2D]) {
        let clearance = self.radius * CLEARANCE_FACTOR;
        let clearance_sq = clearance * clearance;
        let mut candidate = self.position;

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            candidate = self.sample_position(rng, bounds);
            if existing
                .iter()
                .all(|p| p.distance_squared(candidate) > clearance_sq)
            {
                break;
            }
        }

        self.spawn_at(candidate);
    }

    fn sample_position<R: Rng + ?Sized>(&self, rng: &mut R, bounds: &Rect) -> Vector2D {
        // Keep the whole circle inside the arena when there is room for it
        let inset = self.radius.min(bounds.width() / 2.0).min(bounds.height() / 2.0).max(0.0);
        Vector2D::new(
            math::random(rng, bounds.min.x + inset, bounds.max.x - inset),
            math::random(rng, bounds.min.y + inset, bounds.max.y - inset),
        )
    }

    /// Activate at an explicit position
    pub fn spawn_at(&mut self, position: Vector2D) {
        self.position = position;
        self.active = true;
        self.animation_time = 0.0;
        self.pulse_scale = 1.0;
        self.rotation = 0.0;
    }

    /// Advance the pulse and spin animation (`delta_ms` in milliseconds)
    pub fn update(&mut self, delta_ms: f64) {
        if !self.active {
            return;
        }
        let dt = delta_ms / 1000.0;
        self.animation_time = math::wrap(self.animation_time + dt, 0.0, ANIMATION_PERIOD_SECS);
        self.pulse_scale = 1.0 + PULSE_AMPLITUDE * (self.animation_time * PULSE_FREQUENCY).sin();

        let rate = self.kind.rotation_rate();
        if rate != 0.0 {
            self.rotation = math::wrap(self.rotation + rate * dt, 0.0, TAU);
        }
    }

    /// Deactivate and return the points awarded
    pub fn consume(&mut self) -> u32 {
        self.active = false;
        self.value
    }

    /// Radius including the pulse; collision tests use this one
    #[inline]
    pub fn effective_radius(&self) -> f64 {
        self.radius * self.pulse_scale
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn kind(&self) -> FoodKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Vector2D {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    pub fn pulse_scale(&self) -> f64 {
        self.pulse_scale
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

/// Food manager tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Upper bound on simultaneously active food
    pub max_food_count: usize,
    /// Milliseconds between timed spawns
    pub spawn_interval_ms: f64,
    /// Food placed immediately on reset
    pub initial_food: usize,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            max_food_count: 5,
            spawn_interval_ms: 2000.0,
            initial_food: 3,
        }
    }
}

/// Owns the food collection and decides when new food appears
#[derive(Debug, Clone)]
pub struct FoodManager {
    config: FoodConfig,
    bounds: Rect,
    foods: Vec<Food>,
    spawn_timer: f64,
    rng: Pcg32,
    next_id: u32,
}

impl FoodManager {
    pub fn new(config: FoodConfig, bounds: Rect, rng: Pcg32) -> Self {
        Self {
            config,
            bounds,
            foods: Vec::with_capacity(config.max_food_count),
            spawn_timer: 0.0,
            rng,
            next_id: 1,
        }
    }

    fn next_food_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Drop eaten food, animate the rest and run the spawn timer
    ///
    /// `worm_segments` are kept clear of new food.
    pub fn update(&mut self, delta_ms: f64, worm_segments: &[Vector2D]) {
        self.foods.retain(Food::is_active);

        for food in &mut self.foods {
            food.update(delta_ms);
        }

        if self.active_count() >= self.config.max_food_count {
            self.spawn_timer = 0.0;
            return;
        }

        self.spawn_timer += delta_ms;
        if self.spawn_timer >= self.config.spawn_interval_ms {
            self.spawn_timer = 0.0;
            self.force_spawn(worm_segments);
        }
    }

    /// Spawn one random food immediately, ignoring the timer
    ///
    /// Returns the new food's id, or `None` when already at capacity.
    pub fn force_spawn(&mut self, worm_segments: &[Vector2D]) -> Option<u32> {
        if self.active_count() >= self.config.max_food_count {
            return None;
        }
        let mut existing = self.active_positions();
        existing.extend_from_slice(worm_segments);

        let id = self.next_food_id();
        let mut food = Food::create_random(id, &mut self.rng);
        food.spawn(&mut self.rng, &self.bounds, &existing);
        log::debug!(
            "Spawned {:?} food #{} at ({:.1}, {:.1})",
            food.kind(),
            id,
            food.position().x,
            food.position().y
        );
        self.foods.push(food);
        Some(id)
    }

    /// Add an already-built food (activating it where it stands if needed)
    ///
    /// Returns the assigned id, or `None` when at capacity.
    pub fn insert(&mut self, mut food: Food) -> Option<u32> {
        if self.active_count() >= self.config.max_food_count {
            return None;
        }
        if !food.is_active() {
            food.spawn_at(food.position());
        }
        let id = self.next_food_id();
        food.id = id;
        self.foods.push(food);
        Some(id)
    }

    /// Remove all food and seed the initial batch
    pub fn reset(&mut self, worm_segments: &[Vector2D]) {
        self.foods.clear();
        self.spawn_timer = 0.0;
        for _ in 0..self.config.initial_food {
            if self.force_spawn(worm_segments).is_none() {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.foods.clear();
        self.spawn_timer = 0.0;
    }

    pub fn active_count(&self) -> usize {
        self.foods.iter().filter(|f| f.is_active()).count()
    }

    pub fn active_positions(&self) -> Vec<Vector2D> {
        self.foods
            .iter()
            .filter(|f| f.is_active())
            .map(Food::position)
            .collect()
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn foods_mut(&mut self) -> &mut [Food] {
        &mut self.foods
    }

    pub fn get(&self, id: u32) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn config(&self) -> &FoodConfig {
        &self.config
    }
}
