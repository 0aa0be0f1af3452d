//! The worm: a chain of circles steered through open space
//!
//! The head moves along a heading that turns toward the requested heading at
//! a bounded rate. Every other segment follows its leader on a one-sided
//! spring: it is pulled in when it drifts beyond the segment spacing and left
//! alone otherwise, so segments never push each other apart.

use serde::{Deserialize, Serialize};

use super::collision::CollisionDetector;
use super::math::angle_distance;
use super::vector::Vector2D;
use crate::consts::{GROWTH_RATE, SELF_COLLISION_SKIP, WRAP_RECONCILE_FACTOR};

/// Dot product against the reversed heading above which a turn is refused
const REVERSAL_THRESHOLD: f64 = 0.8;
/// Points per grown segment for `Worm::score`
const POINTS_PER_SEGMENT: u32 = 10;

/// Worm tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WormConfig {
    /// Head speed (px/s)
    pub speed: f64,
    /// Maximum heading change (rad/s)
    pub turning_speed: f64,
    /// Radius of every body circle
    pub radius: f64,
    /// Segments at spawn, head included
    pub initial_length: usize,
    /// Segments added per `grow`
    pub growth_rate: usize,
}

impl Default for WormConfig {
    fn default() -> Self {
        Self {
            speed: 150.0,
            turning_speed: 5.0,
            radius: 8.0,
            initial_length: 5,
            growth_rate: GROWTH_RATE,
        }
    }
}

impl WormConfig {
    /// Copy with negative (or NaN) speeds and radius clamped to zero
    pub fn sanitized(self) -> Self {
        let clean = Self {
            speed: self.speed.max(0.0),
            turning_speed: self.turning_speed.max(0.0),
            radius: self.radius.max(0.0),
            ..self
        };
        if clean != self {
            log::warn!("Worm config out of range, using {clean:?}");
        }
        clean
    }
}

#[derive(Debug, Clone)]
pub struct Worm {
    config: WormConfig,
    detector: CollisionDetector,
    start: Vector2D,
    /// `segments[0]` is the head
    segments: Vec<Vector2D>,
    /// Current heading (unit)
    direction: Vector2D,
    /// Requested heading (unit)
    target_direction: Vector2D,
    speed_multiplier: f64,
    alive: bool,
}

impl Worm {
    /// Spawn at `start` heading right, with the body laid out behind the head
    pub fn new(start: Vector2D, config: WormConfig) -> Self {
        let mut worm = Self {
            config: config.sanitized(),
            detector: CollisionDetector::default(),
            start,
            segments: Vec::new(),
            direction: Vector2D::RIGHT,
            target_direction: Vector2D::RIGHT,
            speed_multiplier: 1.0,
            alive: true,
        };
        worm.reset();
        worm
    }

    /// Use `detector` for self-collision checks
    pub fn with_detector(mut self, detector: CollisionDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Back to the spawn layout, alive, heading right
    pub fn reset(&mut self) {
        let length = self.config.initial_length.max(1);
        let spacing = self.segment_spacing();
        self.direction = Vector2D::RIGHT;
        self.target_direction = Vector2D::RIGHT;
        self.speed_multiplier = 1.0;
        self.alive = true;
        let (start, behind) = (self.start, -self.direction);
        self.segments.clear();
        self.segments
            .extend((0..length).map(|i| start + behind * (spacing * i as f64)));
    }

    /// Advance by `delta_ms` milliseconds
    pub fn update(&mut self, delta_ms: f64) {
        if !self.alive {
            return;
        }
        // Clocks running backwards must not move the worm
        let dt = delta_ms.max(0.0) / 1000.0;

        self.steer(dt);

        let velocity = self.direction * (self.speed() * dt);
        self.segments[0] += velocity;

        self.follow_leaders();
        self.check_self_collision();
    }

    /// Rotate the heading toward the target, limited by the turning speed
    fn steer(&mut self, dt: f64) {
        if self.direction.approx_eq(self.target_direction, 1e-12) {
            return;
        }
        let current = self.direction.angle();
        let delta = angle_distance(current, self.target_direction.angle());
        let max_turn = (self.config.turning_speed * dt).max(0.0);
        let turn = delta.clamp(-max_turn, max_turn);
        self.direction = if turn == delta {
            self.target_direction
        } else {
            Vector2D::from_angle(current + turn, 1.0)
        };
    }

    fn follow_leaders(&mut self) {
        let spacing = self.segment_spacing();
        for i in 1..self.segments.len() {
            let leader = self.segments[i - 1];
            let offset = self.segments[i] - leader;
            if offset.magnitude() > spacing {
                self.segments[i] = leader + offset.normalize() * spacing;
            }
        }
    }

    /// Request a new heading
    ///
    /// Near-reversals onto the neck and zero vectors are refused. Accepted
    /// requests only change the target; `update` does the turning.
    pub fn turn(&mut self, new_direction: Vector2D) -> bool {
        let requested = new_direction.normalize();
        if requested.is_zero() {
            return false;
        }
        if requested.dot(-self.direction) > REVERSAL_THRESHOLD {
            return false;
        }
        self.target_direction = requested;
        true
    }

    /// Append `growth_rate` segments behind the tail
    pub fn grow(&mut self) {
        let spacing = self.segment_spacing();
        let count = self.segments.len();
        let tail = self.segments[count - 1];
        let trailing = if count >= 2 {
            (tail - self.segments[count - 2]).normalize()
        } else {
            Vector2D::ZERO
        };
        let trailing = if trailing.is_zero() {
            -self.direction
        } else {
            trailing
        };
        self.segments.extend(
            (1..=self.config.growth_rate).map(|k| tail + trailing * (spacing * k as f64)),
        );
    }

    /// Collision queries this worm uses
    pub fn detector(&self) -> CollisionDetector {
        self.detector
    }

    /// Head against body; a hit kills the worm
    pub fn check_self_collision(&mut self) -> bool {
        if self.segments.len() <= SELF_COLLISION_SKIP {
            return false;
        }
        if self.detector.snake_self_collision(self).hit {
            self.alive = false;
            return true;
        }
        false
    }

    /// Head circle crossing an arena edge; a hit kills the worm
    pub fn check_boundary_collision(&mut self, width: f64, height: f64) -> bool {
        let head = self.head();
        let r = self.config.radius;
        let crossed =
            head.x - r < 0.0 || head.x + r > width || head.y - r < 0.0 || head.y + r > height;
        if crossed {
            self.alive = false;
        }
        crossed
    }

    /// Move the head to the opposite edge after it leaves the arena
    ///
    /// Segments left stretched across the seam (farther than
    /// `WRAP_RECONCILE_FACTOR` spacings from their leader) are pulled to one
    /// spacing behind it. Returns true when the head wrapped.
    pub fn wrap_around_bounds(&mut self, width: f64, height: f64) -> bool {
        let head = &mut self.segments[0];
        let mut wrapped = false;
        if head.x < 0.0 {
            head.x = width;
            wrapped = true;
        } else if head.x > width {
            head.x = 0.0;
            wrapped = true;
        }
        if head.y < 0.0 {
            head.y = height;
            wrapped = true;
        } else if head.y > height {
            head.y = 0.0;
            wrapped = true;
        }

        let spacing = self.segment_spacing();
        let limit = spacing * WRAP_RECONCILE_FACTOR;
        for i in 1..self.segments.len() {
            let leader = self.segments[i - 1];
            if self.segments[i].distance(leader) > limit {
                self.segments[i] = leader - self.direction * spacing;
            }
        }
        wrapped
    }

    /// Length-derived score; informational, the game's food score is authoritative
    pub fn score(&self) -> u32 {
        let grown = self.segments.len().saturating_sub(self.config.initial_length);
        grown as u32 * POINTS_PER_SEGMENT
    }

    /// Scale the configured speed (debug speed toggle)
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    #[inline]
    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    #[inline]
    pub fn head(&self) -> Vector2D {
        self.segments[0]
    }

    #[inline]
    pub fn segments(&self) -> &[Vector2D] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn direction(&self) -> Vector2D {
        self.direction
    }

    #[inline]
    pub fn target_direction(&self) -> Vector2D {
        self.target_direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.config.speed * self.speed_multiplier
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    #[inline]
    pub fn segment_spacing(&self) -> f64 {
        self.config.radius * 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn config(&self) -> &WormConfig {
        &self.config
    }
}
