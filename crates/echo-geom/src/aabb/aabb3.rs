// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use echo_math::{MathError, Matrix, Vec3};

use super::slab_interval;
use crate::cone::Cone;
use crate::polygon::{Circle3d, Ellipse3d, Polygon3d, Shape};
use crate::sphere::Sphere;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - A populated box has `min[axis] <= max[axis]` on every axis.
/// - The empty box holds `min = +∞`, `max = −∞`; it is the identity of
///   [`Aabb3::union`], contains nothing, and overlaps nothing.
///
/// Transitions: empty → populated via factories, [`Aabb3::add_point`], or
/// [`Aabb3::union`]; back to empty only through [`Aabb3::reset`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb3 {
    min: Vec3,
    max: Vec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb3 {
    /// The empty box.
    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(f64::INFINITY),
            max: Vec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Box spanning two arbitrary corners.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Box centered at `center` with half-extents `half`.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing `points`; empty when `points` is empty.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut out = Self::empty();
        out.add_points(points);
        out
    }

    /// Cube of half-size `radius` around the sphere center.
    pub fn from_sphere(sphere: &Sphere) -> Self {
        Self::from_center_half_extents(sphere.center(), Vec3::splat(sphere.radius()))
    }

    /// Exact bounds of a disk.
    pub fn from_circle3d(circle: &Circle3d) -> Self {
        Self::from_disk(circle.center(), circle.normal(), circle.radius())
    }

    /// Exact bounds of an ellipse: per axis `sqrt(a_i² + b_i²)` for the
    /// semi-axis vectors `a`, `b`.
    pub fn from_ellipse3d(ellipse: &Ellipse3d) -> Self {
        let a = ellipse.major_axis();
        let b = ellipse.minor_axis();
        let half = Vec3::new(a.x().hypot(b.x()), a.y().hypot(b.y()), a.z().hypot(b.z()));
        Self::from_center_half_extents(ellipse.center(), half)
    }

    /// Bounds of a polygon's vertices.
    pub fn from_polygon(polygon: &Polygon3d) -> Self {
        Self::from_points(polygon.points())
    }

    /// Apex, base center, and the base disk, unioned.
    pub fn from_cone(cone: &Cone) -> Self {
        let mut out = Self::from_disk(cone.base_center(), cone.direction(), cone.radius());
        out.add_point(cone.origin());
        out.add_point(cone.base_center());
        out
    }

    /// Bounds of any shape, using the closed forms for conics.
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Polygon(p) => Self::from_polygon(p),
            Shape::Ellipse(e) => Self::from_ellipse3d(e),
            Shape::Circle(c) => Self::from_circle3d(c),
            Shape::Triangle(t) => Self::from_points(t.points()),
            Shape::Quad(q) => Self::from_points(q.points()),
            Shape::Multi(m) => m.aabb(),
        }
    }

    pub(crate) fn from_disk(center: Vec3, normal: Vec3, radius: f64) -> Self {
        let r = radius.abs();
        let extent = |n: f64| r * (1.0 - n * n).max(0.0).sqrt();
        let half = Vec3::new(extent(normal.x()), extent(normal.y()), extent(normal.z()));
        Self::from_center_half_extents(center, half)
    }

    /// Minimum corner.
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner.
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns `true` while the box holds no points.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min.component(axis) > self.max.component(axis))
    }

    /// Center point (meaningless for an empty box).
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis; zero for an empty box.
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    /// Half of [`Aabb3::size`].
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Returns the box to the empty state.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Grows the box to include `p`.
    pub fn add_point(&mut self, p: Vec3) {
        self.min = self.min.min(&p);
        self.max = self.max.max(&p);
    }

    /// Grows the box to include every point.
    pub fn add_points(&mut self, points: &[Vec3]) {
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
    pub fn contains_point(&self, p: Vec3) -> bool {
        (0..3).all(|axis| {
            let v = p.component(axis);
            v >= self.min.component(axis) && v <= self.max.component(axis)
        })
    }

    /// Returns `true` if the boxes overlap; touching faces count.
    pub fn overlaps_aabb(&self, other: &Self) -> bool {
        (0..3).all(|axis| {
            self.max.component(axis) >= other.min.component(axis)
                && other.max.component(axis) >= self.min.component(axis)
        })
    }

    /// Parameter interval `(t0, t1)` of segment `a → b` inside the box.
    pub fn segment_intersections(&self, a: Vec3, b: Vec3) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        slab_interval(a.to_array(), b.to_array(), self.min.to_array(), self.max.to_array())
    }

    /// Returns `true` if any part of segment `a → b` lies in the box.
    pub fn overlaps_segment(&self, a: Vec3, b: Vec3) -> bool {
        self.segment_intersections(a, b).is_some()
    }

    /// Box shifted by `offset`.
    pub fn translate(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Box grown by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        let m = Vec3::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// The eight corners; bit 0/1/2 of the index selects max x/y/z.
    pub fn vertices(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        core::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x() } else { hi.x() },
                if i & 2 == 0 { lo.y() } else { hi.y() },
                if i & 4 == 0 { lo.z() } else { hi.z() },
            )
        })
    }

    /// The twelve edges as corner pairs.
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        const PAIRS: [(usize, usize); 12] = [
            (0, 1),
            (2, 3),
            (4, 5),
            (6, 7),
            (0, 2),
            (1, 3),
            (4, 6),
            (5, 7),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let v = self.vertices();
        PAIRS.map(|(a, b)| (v[a], v[b]))
    }

    /// Bounds of this box after transforming its corners by `mat` (4×4).
    ///
    /// The empty box stays empty.
    pub fn transformed(&self, mat: &Matrix) -> Result<Self, MathError> {
        if self.is_empty() {
            return Ok(*self);
        }
        let mut out = Self::empty();
        for corner in self.vertices() {
            out.add_point(mat.transform_point3(corner)?);
        }
        Ok(out)
    }

    /// Point of the box closest to `p`.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.max(&self.min).min(&self.max)
    }
}
