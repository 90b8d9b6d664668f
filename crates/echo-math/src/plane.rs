// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::error::MathError;
use crate::matrix::Matrix;
use crate::ray::Ray;
use crate::tolerance::{Tolerance, EPSILON};
use crate::vec2::Vec2;
use crate::vec3::Vec3;

/// Which side of a plane a point lies on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    /// Positive half-space (along the normal).
    Front,
    /// Negative half-space.
    Back,
    /// Within tolerance of the plane.
    On,
}

/// Oriented plane through `point` with unit `normal`.
///
/// Invariant: `|normal| == 1` within tolerance; the constructors and
/// [`Plane::set_normal`] normalise their input and reject zero vectors.
///
/// The in-plane basis `(u, v)` returned by [`Plane::basis`] satisfies
/// `u × v = normal`, so counter-clockwise 2D outlines map to polygons whose
/// right-hand normal equals the plane normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    /// The `z = 0` plane facing +Z.
    pub const XY: Self = Self {
        point: Vec3::ZERO,
        normal: Vec3::UNIT_Z,
    };

    /// Creates a plane; `normal` is normalised.
    pub fn new(point: Vec3, normal: Vec3) -> Result<Self, MathError> {
        let normal = normal.try_normalize().ok_or(MathError::DegenerateVector)?;
        Ok(Self { point, normal })
    }

    /// Plane through three points with normal `(b − a) × (c − a)`.
    ///
    /// Collinear or coincident points yield [`MathError::DegenerateVector`].
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Result<Self, MathError> {
        Self::new(a, (b - a).cross(&(c - a)))
    }

    /// Horizontal plane at height `z` facing +Z.
    pub fn horizontal(z: f64) -> Self {
        Self {
            point: Vec3::new(0.0, 0.0, z),
            normal: Vec3::UNIT_Z,
        }
    }

    /// Reference point on the plane.
    pub const fn point(&self) -> Vec3 {
        self.point
    }

    /// Unit normal.
    pub const fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Moves the reference point.
    pub fn set_point(&mut self, point: Vec3) {
        self.point = point;
    }

    /// Replaces the normal (normalised).
    pub fn set_normal(&mut self, normal: Vec3) -> Result<(), MathError> {
        self.normal = normal.try_normalize().ok_or(MathError::DegenerateVector)?;
        Ok(())
    }

    /// Same plane with the normal flipped.
    pub fn flipped(&self) -> Self {
        Self {
            point: self.point,
            normal: -self.normal,
        }
    }

    /// Signed distance from the plane (positive on the normal side).
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        (p - self.point).dot(&self.normal)
    }

    /// Classifies `p` against the plane with tolerance `eps`.
    pub fn classify(&self, p: Vec3, eps: f64) -> Side {
        let d = self.signed_distance(p);
        if d > eps {
            Side::Front
        } else if d < -eps {
            Side::Back
        } else {
            Side::On
        }
    }

    /// Returns `true` when `p` is within `EPSILON` of the plane.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.signed_distance(p).abs() <= EPSILON
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project_point(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Ray parameter where `ray` meets the plane, or `None` when parallel.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f64> {
        let denom = self.normal.dot(&ray.direction);
        if denom.abs() <= Tolerance::DEFAULT.parallel * ray.direction.length() {
            return None;
        }
        Some((self.point - ray.origin).dot(&self.normal) / denom)
    }

    /// Point where segment `a → b` crosses the plane, if it does.
    pub fn segment_intersection(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let ray = Ray::from_segment(a, b);
        let t = self.ray_intersection(&ray)?;
        (-EPSILON..=1.0 + EPSILON).contains(&t).then(|| ray.at(t))
    }

    /// Line shared by two planes, or `None` when they are parallel.
    ///
    /// The returned ray's direction is `self.normal × other.normal` (unit).
    pub fn intersect_plane(&self, other: &Self) -> Option<Ray> {
        let dir = self.normal.cross(&other.normal);
        let denom = dir.length_squared();
        if denom <= EPSILON * EPSILON {
            return None;
        }
        let d1 = self.normal.dot(&self.point);
        let d2 = other.normal.dot(&other.point);
        // Point on both planes closest to the origin.
        let origin = (other.normal.cross(&dir) * d1 + dir.cross(&self.normal) * d2) / denom;
        Some(Ray::new(origin, dir.normalize()))
    }

    /// Orthonormal in-plane axes `(u, v)` with `u × v = normal`.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let u = self.normal.any_perpendicular();
        let v = self.normal.cross(&u);
        (u, v)
    }

    /// Coordinates of `p` in the plane basis, relative to [`Plane::point`].
    ///
    /// The off-plane component is discarded.
    pub fn to_2d(&self, p: Vec3) -> Vec2 {
        let (u, v) = self.basis();
        let d = p - self.point;
        Vec2::new(d.dot(&u), d.dot(&v))
    }

    /// Inverse of [`Plane::to_2d`] for points on the plane.
    pub fn to_3d(&self, p: Vec2) -> Vec3 {
        let (u, v) = self.basis();
        self.point + u * p.x() + v * p.y()
    }

    /// 4×4 matrices mapping world points into plane coordinates and back.
    ///
    /// `to_2d` sends a point to `(u, v, signed distance)`; `from_2d` is its
    /// exact inverse. Both agree with [`Plane::to_2d`]/[`Plane::to_3d`].
    pub fn conversion_matrices(&self) -> (Matrix, Matrix) {
        let (u, v) = self.basis();
        let n = self.normal;
        let o = self.point;
        let to_2d = Matrix::from_rows(&[
            [u.x(), u.y(), u.z(), -u.dot(&o)],
            [v.x(), v.y(), v.z(), -v.dot(&o)],
            [n.x(), n.y(), n.z(), -n.dot(&o)],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let from_2d = Matrix::from_rows(&[
            [u.x(), v.x(), n.x(), o.x()],
            [u.y(), v.y(), n.y(), o.y()],
            [u.z(), v.z(), n.z(), o.z()],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        (to_2d, from_2d)
    }
}
