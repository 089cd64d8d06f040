// Geometry primitives shared by the simulation: vectors and axis-aligned boxes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / norm, self.y / norm)
    }

    /// Shrinks the vector to `max` length if it is longer; shorter vectors pass through.
    pub fn clamp_length(self, max: f64) -> Self {
        let norm = self.norm();
        if norm > max && norm > 0.0 {
            self * (max / norm)
        } else {
            self
        }
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).norm()
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2};{:.2}", self.x, self.y)
    }
}

/// Axis-aligned rectangle used for hitboxes, tiles and camera views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl Range {
    /// Builds a range from two opposite corners in any order.
    pub fn new(a: Vector2D, b: Vector2D) -> Self {
        Self {
            min: Vector2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin(origin: Vector2D, width: f64, height: f64) -> Self {
        Self::new(origin, origin + Vector2D::new(width, height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Vector2D) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn translated(&self, delta: Vector2D) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        let pad = Vector2D::new(margin, margin);
        Self::new(self.min - pad, self.max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_zero_vector_is_a_no_op() {
        assert_eq!(Vector2D::ZERO.normalized(), Vector2D::ZERO);
        let unit = Vector2D::new(3.0, 4.0).normalized();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
        assert!((unit.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn clamp_length_only_shrinks() {
        let long = Vector2D::new(1.0, 1.0).clamp_length(1.0);
        assert!((long.norm() - 1.0).abs() < 1e-12);
        let short = Vector2D::new(0.5, 0.0).clamp_length(1.0);
        assert_eq!(short, Vector2D::new(0.5, 0.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Range::from_origin(Vector2D::ZERO, 1.0, 1.0);
        let b = Range::from_origin(Vector2D::new(1.0, 0.0), 1.0, 1.0);
        let c = Range::from_origin(Vector2D::new(0.5, 0.5), 1.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn containment_is_inclusive() {
        let r = Range::new(Vector2D::new(2.0, 2.0), Vector2D::ZERO);
        assert_eq!(r.min, Vector2D::ZERO);
        assert!(r.contains(Vector2D::new(2.0, 0.0)));
        assert!(!r.contains(Vector2D::new(2.1, 0.0)));
        assert!(r.contains_range(&Range::from_origin(Vector2D::new(1.0, 1.0), 1.0, 1.0)));
        assert!(!r.contains_range(&Range::from_origin(Vector2D::new(1.5, 1.0), 1.0, 1.0)));
    }

    #[test]
    fn expanded_and_translated_keep_shape() {
        let r = Range::from_origin(Vector2D::new(1.0, 1.0), 2.0, 4.0);
        let moved = r.translated(Vector2D::new(-1.0, 2.0));
        assert_eq!(moved.min, Vector2D::new(0.0, 3.0));
        assert_eq!(moved.width(), 2.0);
        let grown = r.expanded(0.5);
        assert_eq!(grown.width(), 3.0);
        assert_eq!(grown.center(), r.center());
    }
}
