//! Scalar helpers shared by the movement and collision code

use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::vector::Vector2D;

#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Remap `value` from `[in_min, in_max]` onto `[out_min, out_max]`
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Uniform float in `[min, max)`; degenerate ranges return `min`
pub fn random<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform integer in `[min, max]`
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Wrap `value` into `[min, max)`
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    let wrapped = min + (value - min).rem_euclid(range);
    // rem_euclid can round up to exactly `range` for tiny negative inputs
    if wrapped >= max { min } else { wrapped }
}

/// Heading of the line from `from` to `to`
#[inline]
pub fn angle_between(from: Vector2D, to: Vector2D) -> f64 {
    (to - from).angle()
}

/// Shortest signed rotation taking angle `from` to angle `to`, in (-π, π]
pub fn angle_distance(from: f64, to: f64) -> f64 {
    let delta = wrap(to - from, -PI, PI);
    if delta <= -PI { delta + TAU } else { delta }
}

/// Hermite smoothstep of `x` between the two edges
pub fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// -1, 0 or 1
#[inline]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Closest point to `point` on segment `start..end`
pub fn closest_point_on_segment(point: Vector2D, start: Vector2D, end: Vector2D) -> Vector2D {
    let line = end - start;
    let len_sq = line.magnitude_squared();
    if len_sq == 0.0 {
        return start;
    }
    let t = clamp((point - start).dot(line) / len_sq, 0.0, 1.0);
    start + line * t
}

/// Distance from `point` to the segment `start..end`, clamped to its extent
pub fn point_to_line_distance(point: Vector2D, start: Vector2D, end: Vector2D) -> f64 {
    point.distance(closest_point_on_segment(point, start, end))
}
