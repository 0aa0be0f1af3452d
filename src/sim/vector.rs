//! 2D vector value type
//!
//! Every position, heading and velocity in the simulation is a `Vector2D`.
//! The arithmetic is delegated to `glam::DVec2`; this wrapper adds the
//! zero-safe and fallible operations the simulation relies on.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Immutable 2D vector (f64 components)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };
    pub const RIGHT: Vector2D = Vector2D { x: 1.0, y: 0.0 };
    pub const LEFT: Vector2D = Vector2D { x: -1.0, y: 0.0 };
    /// Screen space: y grows downward
    pub const UP: Vector2D = Vector2D { x: 0.0, y: -1.0 };
    pub const DOWN: Vector2D = Vector2D { x: 0.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of length `magnitude` pointing at `angle` radians
    pub fn from_angle(angle: f64, magnitude: f64) -> Self {
        (DVec2::from_angle(angle) * magnitude).into()
    }

    #[inline]
    fn as_dvec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        (self.as_dvec() * factor).into()
    }

    /// Divide both components by `divisor`
    pub fn divide(self, divisor: f64) -> Result<Self, DomainError> {
        if divisor == 0.0 {
            return Err(DomainError::DivisionByZero);
        }
        Ok((self.as_dvec() / divisor).into())
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.as_dvec().length()
    }

    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.as_dvec().length_squared()
    }

    /// Unit vector in the same direction, or zero for the zero vector
    pub fn normalize(self) -> Self {
        self.as_dvec().normalize_or_zero().into()
    }

    #[inline]
    pub fn distance(self, other: Vector2D) -> f64 {
        self.as_dvec().distance(other.as_dvec())
    }

    #[inline]
    pub fn distance_squared(self, other: Vector2D) -> f64 {
        self.as_dvec().distance_squared(other.as_dvec())
    }

    #[inline]
    pub fn dot(self, other: Vector2D) -> f64 {
        self.as_dvec().dot(other.as_dvec())
    }

    /// Heading in radians, (-π, π]
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate counter-clockwise (in y-up terms) by `angle` radians
    pub fn rotate(self, angle: f64) -> Self {
        DVec2::from_angle(angle).rotate(self.as_dvec()).into()
    }

    /// Linear interpolation; `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(self, other: Vector2D, t: f64) -> Self {
        self.as_dvec().lerp(other.as_dvec(), t).into()
    }

    /// Component-wise equality within `tolerance`
    pub fn approx_eq(self, other: Vector2D, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<DVec2> for Vector2D {
    #[inline]
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vector2D> for DVec2 {
    #[inline]
    fn from(v: Vector2D) -> Self {
        v.as_dvec()
    }
}

impl Add for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn add(self, rhs: Vector2D) -> Vector2D {
        (self.as_dvec() + rhs.as_dvec()).into()
    }
}

impl AddAssign for Vector2D {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2D) {
        *self = *self + rhs;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn sub(self, rhs: Vector2D) -> Vector2D {
        (self.as_dvec() - rhs.as_dvec()).into()
    }
}

impl SubAssign for Vector2D {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector2D) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn mul(self, rhs: f64) -> Vector2D {
        self.scale(rhs)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}
