//! Collision detection for circles, segments and the arena rectangle
//!
//! The worm is a chain of circles and food items are circles, so almost
//! everything reduces to circle tests. All queries are pure; results are
//! returned by value and never stored.

use serde::{Deserialize, Serialize};

use super::food::Food;
use super::math::{clamp, closest_point_on_segment};
use super::spatial::SpatialGrid;
use super::vector::Vector2D;
use super::worm::Worm;
use crate::consts::{COLLISION_TOLERANCE, SELF_COLLISION_SKIP};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl Rect {
    pub fn new(min: Vector2D, max: Vector2D) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Vector2D::ZERO, Vector2D::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vector2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp_point(&self, p: Vector2D) -> Vector2D {
        Vector2D::new(
            clamp(p.x, self.min.x, self.max.x),
            clamp(p.y, self.min.y, self.max.y),
        )
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point
    pub point: Option<Vector2D>,
    /// Contact normal (see each query for its orientation)
    pub normal: Option<Vector2D>,
    /// Distance measured by the query (centre distance, edge distance, ...)
    pub distance: Option<f64>,
    /// Time of impact for swept queries
    pub time: Option<f64>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }

    fn contact(point: Vector2D, normal: Vector2D, distance: f64) -> Self {
        Self {
            hit: true,
            point: Some(point),
            normal: Some(normal),
            distance: Some(distance),
            time: None,
        }
    }
}

/// Stateless collision queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    /// Added to every radius sum so that touching counts as colliding
    pub tolerance: f64,
    /// Route self-collision through a spatial grid broad phase
    pub use_spatial_grid: bool,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self {
            tolerance: COLLISION_TOLERANCE,
            use_spatial_grid: false,
        }
    }
}

impl CollisionDetector {
    pub fn new(tolerance: f64, use_spatial_grid: bool) -> Self {
        Self {
            tolerance,
            use_spatial_grid,
        }
    }

    /// Two circles overlap (or touch within tolerance)
    ///
    /// The contact point lies on circle 1's boundary, the normal points from
    /// c1 toward c2 and `distance` is the centre distance.
    pub fn circle_to_circle(
        &self,
        c1: Vector2D,
        r1: f64,
        c2: Vector2D,
        r2: f64,
    ) -> CollisionResult {
        let distance = c1.distance(c2);
        if distance > r1 + r2 + self.tolerance {
            return CollisionResult::miss();
        }
        let normal = (c2 - c1).normalize();
        CollisionResult::contact(c1 + normal * r1, normal, distance)
    }

    /// Point within `threshold` of the segment `start..end`
    ///
    /// The normal points from the closest point on the segment toward `point`.
    pub fn point_to_line_segment(
        &self,
        point: Vector2D,
        start: Vector2D,
        end: Vector2D,
        threshold: f64,
    ) -> CollisionResult {
        let closest = closest_point_on_segment(point, start, end);
        let distance = point.distance(closest);
        if distance > threshold {
            return CollisionResult::miss();
        }
        CollisionResult::contact(closest, (point - closest).normalize(), distance)
    }

    /// Circle overlapping a rectangle (solid, axis-aligned)
    ///
    /// The normal points from the closest rectangle point toward the circle.
    pub fn circle_to_rectangle(
        &self,
        center: Vector2D,
        radius: f64,
        rect: &Rect,
    ) -> CollisionResult {
        let closest = rect.clamp_point(center);
        let distance = center.distance(closest);
        if distance > radius + self.tolerance {
            return CollisionResult::miss();
        }
        CollisionResult::contact(closest, (center - closest).normalize(), distance)
    }

    /// Swept circle test over one frame
    ///
    /// Velocities are displacement per unit of `delta`. Solves
    /// `|d + v t| = r1 + r2` for the earliest `t` in `[0, delta]`; the contact
    /// point and normal are taken at that time.
    #[allow(clippy::too_many_arguments)]
    pub fn moving_circle_to_circle(
        &self,
        c1: Vector2D,
        v1: Vector2D,
        r1: f64,
        c2: Vector2D,
        v2: Vector2D,
        r2: f64,
        delta: f64,
    ) -> CollisionResult {
        let d = c1 - c2;
        let v = v1 - v2;
        let reach = r1 + r2 + self.tolerance;

        let a = v.dot(v);
        let b = 2.0 * d.dot(v);
        let c = d.dot(d) - reach * reach;

        let time = if c <= 0.0 {
            // Already overlapping at the start of the frame
            0.0
        } else {
            if a == 0.0 {
                return CollisionResult::miss();
            }
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return CollisionResult::miss();
            }
            let sqrt_disc = discriminant.sqrt();
            let t1 = (-b - sqrt_disc) / (2.0 * a);
            let t2 = (-b + sqrt_disc) / (2.0 * a);
            if (0.0..=delta).contains(&t1) {
                t1
            } else if (0.0..=delta).contains(&t2) {
                t2
            } else {
                return CollisionResult::miss();
            }
        };

        let p1 = c1 + v1 * time;
        let p2 = c2 + v2 * time;
        let normal = (p2 - p1).normalize();
        CollisionResult {
            time: Some(time),
            ..CollisionResult::contact(p1 + normal * r1, normal, p1.distance(p2))
        }
    }

    /// Head against its own body, skipping the neck
    ///
    /// Segments before `SELF_COLLISION_SKIP` can never be reached by the head
    /// without folding the neck, so they are not tested.
    pub fn snake_self_collision(&self, worm: &Worm) -> CollisionResult {
        let segments = worm.segments();
        if segments.len() <= SELF_COLLISION_SKIP {
            return CollisionResult::miss();
        }
        let head = segments[0];
        let radius = worm.radius();

        if self.use_spatial_grid {
            let reach = radius * 2.0 + self.tolerance;
            let mut grid = SpatialGrid::new(head, reach.max(1.0));
            for (index, &segment) in segments.iter().enumerate().skip(SELF_COLLISION_SKIP) {
                grid.insert(segment, index);
            }
            let mut candidates = grid.query(head, reach);
            // Report the same segment the linear scan would
            candidates.sort_by_key(|(_, index)| **index);
            return candidates
                .into_iter()
                .map(|(segment, _)| self.circle_to_circle(head, radius, segment, radius))
                .find(|result| result.hit)
                .unwrap_or_else(CollisionResult::miss);
        }

        segments[SELF_COLLISION_SKIP..]
            .iter()
            .map(|&segment| self.circle_to_circle(head, radius, segment, radius))
            .find(|result| result.hit)
            .unwrap_or_else(CollisionResult::miss)
    }

    /// Worm head against a food item (pulsing radius)
    pub fn snake_to_food(&self, worm: &Worm, food: &Food) -> CollisionResult {
        if !food.is_active() {
            return CollisionResult::miss();
        }
        self.circle_to_circle(worm.head(), worm.radius(), food.position(), food.effective_radius())
    }

    /// Worm head circle crossing any edge of the arena
    ///
    /// The contact point is on the crossed edge, the normal points back into
    /// the arena and `distance` is the signed distance from the head centre to
    /// that edge (negative once the centre is outside).
    pub fn snake_to_boundary(&self, worm: &Worm, bounds: &Rect) -> CollisionResult {
        let head = worm.head();
        let radius = worm.radius();

        let edges = [
            (head.x - bounds.min.x, Vector2D::RIGHT, Vector2D::new(bounds.min.x, head.y)),
            (bounds.max.x - head.x, Vector2D::LEFT, Vector2D::new(bounds.max.x, head.y)),
            (head.y - bounds.min.y, Vector2D::DOWN, Vector2D::new(head.x, bounds.min.y)),
            (bounds.max.y - head.y, Vector2D::UP, Vector2D::new(head.x, bounds.max.y)),
        ];

        edges
            .into_iter()
            .filter(|(distance, _, _)| *distance < radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, normal, point)| CollisionResult::contact(point, normal, distance))
            .unwrap_or_else(CollisionResult::miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::food::FoodKind;
    use crate::sim::worm::WormConfig;

    fn detector() -> CollisionDetector {
        CollisionDetector::default()
    }

    #[test]
    fn test_circle_to_circle() {
        let d = detector();
        let result = d.circle_to_circle(Vector2D::ZERO, 5.0, Vector2D::new(8.0, 0.0), 5.0);
        assert!(result.hit);
        assert_eq!(result.normal, Some(Vector2D::RIGHT));
        assert_eq!(result.point, Some(Vector2D::new(5.0, 0.0)));
        assert_eq!(result.distance, Some(8.0));

        let result = d.circle_to_circle(Vector2D::ZERO, 5.0, Vector2D::new(11.0, 0.0), 5.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_touching_circles_collide() {
        let d = detector();
        let result = d.circle_to_circle(Vector2D::ZERO, 5.0, Vector2D::new(10.0, 0.0), 5.0);
        assert!(result.hit);
        let result = d.circle_to_circle(Vector2D::ZERO, 5.0, Vector2D::new(10.05, 0.0), 5.0);
        assert!(result.hit, "gap inside tolerance still counts");
    }

    #[test]
    fn test_point_to_line_segment() {
        let d = detector();
        let a = Vector2D::new(0.0, 0.0);
        let b = Vector2D::new(10.0, 0.0);
        let result = d.point_to_line_segment(Vector2D::new(4.0, 2.0), a, b, 3.0);
        assert!(result.hit);
        assert_eq!(result.point, Some(Vector2D::new(4.0, 0.0)));
        assert_eq!(result.normal, Some(Vector2D::DOWN));

        let result = d.point_to_line_segment(Vector2D::new(14.0, 0.0), a, b, 3.0);
        assert!(!result.hit, "distance is clamped to the segment extent");
    }

    #[test]
    fn test_circle_to_rectangle() {
        let d = detector();
        let rect = Rect::from_size(10.0, 10.0);
        let result = d.circle_to_rectangle(Vector2D::new(13.0, 5.0), 4.0, &rect);
        assert!(result.hit);
        assert_eq!(result.point, Some(Vector2D::new(10.0, 5.0)));

        let result = d.circle_to_rectangle(Vector2D::new(15.0, 15.0), 4.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_moving_circles_head_on() {
        let d = CollisionDetector::new(0.0, false);
        // Gap of 10 closed at 20 units per second
        let result = d.moving_circle_to_circle(
            Vector2D::ZERO,
            Vector2D::new(10.0, 0.0),
            5.0,
            Vector2D::new(20.0, 0.0),
            Vector2D::new(-10.0, 0.0),
            5.0,
            1.0,
        );
        assert!(result.hit);
        assert!((result.time.unwrap_or(-1.0) - 0.5).abs() < 1e-9);
        assert!(result.point.unwrap_or_default().approx_eq(Vector2D::new(10.0, 0.0), 1e-9));
    }

    #[test]
    fn test_moving_circles_outside_window_and_parallel() {
        let d = CollisionDetector::new(0.0, false);
        let late = d.moving_circle_to_circle(
            Vector2D::ZERO,
            Vector2D::new(1.0, 0.0),
            5.0,
            Vector2D::new(100.0, 0.0),
            Vector2D::ZERO,
            5.0,
            1.0,
        );
        assert!(!late.hit);

        let parallel = d.moving_circle_to_circle(
            Vector2D::ZERO,
            Vector2D::new(10.0, 0.0),
            5.0,
            Vector2D::new(0.0, 50.0),
            Vector2D::new(10.0, 0.0),
            5.0,
            10.0,
        );
        assert!(!parallel.hit);

        let passing = d.moving_circle_to_circle(
            Vector2D::ZERO,
            Vector2D::new(100.0, 0.0),
            5.0,
            Vector2D::new(50.0, 30.0),
            Vector2D::ZERO,
            5.0,
            1.0,
        );
        assert!(!passing.hit, "negative discriminant");
    }

    #[test]
    fn test_moving_circles_already_overlapping() {
        let d = detector();
        let result = d.moving_circle_to_circle(
            Vector2D::ZERO,
            Vector2D::ZERO,
            5.0,
            Vector2D::new(3.0, 0.0),
            Vector2D::ZERO,
            5.0,
            1.0,
        );
        assert!(result.hit);
        assert_eq!(result.time, Some(0.0));
    }

    #[test]
    fn test_snake_to_boundary() {
        let d = detector();
        let bounds = Rect::from_size(200.0, 200.0);
        let worm = Worm::new(Vector2D::new(100.0, 100.0), WormConfig::default());
        assert!(!d.snake_to_boundary(&worm, &bounds).hit);

        let worm = Worm::new(Vector2D::new(195.0, 100.0), WormConfig::default());
        let result = d.snake_to_boundary(&worm, &bounds);
        assert!(result.hit);
        assert_eq!(result.normal, Some(Vector2D::LEFT));
        assert_eq!(result.point, Some(Vector2D::new(200.0, 100.0)));
    }

    #[test]
    fn test_snake_to_food_uses_active_flag() {
        let d = detector();
        let worm = Worm::new(Vector2D::new(100.0, 100.0), WormConfig::default());
        let mut food = Food::new(1, FoodKind::Normal);
        food.spawn_at(Vector2D::new(110.0, 100.0));
        assert!(d.snake_to_food(&worm, &food).hit);
        food.consume();
        assert!(!d.snake_to_food(&worm, &food).hit);
    }

    #[test]
    fn test_self_collision_grid_matches_linear_scan() {
        let linear = CollisionDetector::new(COLLISION_TOLERANCE, false);
        let gridded = CollisionDetector::new(COLLISION_TOLERANCE, true);

        let config = WormConfig::default();
        let mut worm = Worm::new(Vector2D::new(300.0, 300.0), config);
        for _ in 0..4 {
            worm.grow();
        }
        // Curl the worm by steering it in a circle without letting it die
        let mut results = Vec::new();
        for step in 0..200 {
            let heading = Vector2D::from_angle(step as f64 * 0.3, 1.0);
            worm.turn(heading);
            worm.update(16.0);
            results.push((linear.snake_self_collision(&worm), gridded.snake_self_collision(&worm)));
            if !worm.is_alive() {
                break;
            }
        }
        for (a, b) in results {
            assert_eq!(a, b);
        }
    }
}
