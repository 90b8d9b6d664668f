// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use echo_math::Vec2;

use super::slab_interval;

/// Axis-aligned bounding box in the plane.
///
/// A fresh box is empty (`min = +∞`, `max = −∞`) and only becomes populated
/// through points, unions, or a factory; [`Aabb2::reset`] returns it to empty.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    min: Vec2,
    max: Vec2,
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb2 {
    /// The empty box (identity element of [`Aabb2::union`]).
    pub const fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Box spanning two arbitrary corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Smallest box containing `points`; empty when `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut out = Self::empty();
        out.add_points(points);
        out
    }

    /// Bounds of a circle.
    pub fn from_circle(center: Vec2, radius: f64) -> Self {
        let r = Vec2::new(radius.abs(), radius.abs());
        Self {
            min: center - r,
            max: center + r,
        }
    }

    /// Bounds of an ellipse with semi-axes `rx`, `ry` rotated by `rotation`
    /// radians counter-clockwise.
    pub fn from_ellipse(center: Vec2, rx: f64, ry: f64, rotation: f64) -> Self {
        let (s, c) = rotation.sin_cos();
        let hx = ((rx * c).powi(2) + (ry * s).powi(2)).sqrt();
        let hy = ((rx * s).powi(2) + (ry * c).powi(2)).sqrt();
        let h = Vec2::new(hx, hy);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Box from an origin corner and a (possibly negative) width and height.
    pub fn from_rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    /// Minimum corner.
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner.
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Returns `true` while the box holds no points.
    pub fn is_empty(&self) -> bool {
        self.min.x() > self.max.x() || self.min.y() > self.max.y()
    }

    /// Center point (meaningless for an empty box).
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis; zero for an empty box.
    pub fn size(&self) -> Vec2 {
        if self.is_empty() {
            return Vec2::ZERO;
        }
        self.max - self.min
    }

    /// Returns the box to the empty state.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Grows the box to include `p`.
    pub fn add_point(&mut self, p: Vec2) {
        self.min = self.min.min(&p);
        self.max = self.max.max(&p);
    }

    /// Grows the box to include every point.
    pub fn add_points(&mut self, points: &[Vec2]) {
        for p in points {
            self.add_point(*p);
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x() >= self.min.x()
            && p.x() <= self.max.x()
            && p.y() >= self.min.y()
            && p.y() <= self.max.y()
    }

    /// Returns `true` if the boxes overlap; touching edges count.
    pub fn overlaps_aabb(&self, other: &Self) -> bool {
        self.max.x() >= other.min.x()
            && other.max.x() >= self.min.x()
            && self.max.y() >= other.min.y()
            && other.max.y() >= self.min.y()
    }

    /// Parameter interval `(t0, t1)` of segment `a → b` inside the box.
    pub fn segment_intersections(&self, a: Vec2, b: Vec2) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        slab_interval(a.to_array(), b.to_array(), self.min.to_array(), self.max.to_array())
    }

    /// Returns `true` if any part of segment `a → b` lies in the box.
    pub fn overlaps_segment(&self, a: Vec2, b: Vec2) -> bool {
        self.segment_intersections(a, b).is_some()
    }

    /// Box shifted by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Box grown by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        let m = Vec2::new(margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }
}
