// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::f64::consts::TAU;
use std::ops::RangeInclusive;

use echo_math::{Matrix, Plane, Ray, Tolerance, Vec3};

use super::ellipse::fan;
use super::{Polygon3d, Triangle3d};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Planar disk.
///
/// `radius` and `radius_squared` are kept consistent by the paired setters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle3d {
    plane: Plane,
    radius: f64,
    radius_squared: f64,
}

impl Circle3d {
    /// Creates a disk centered at `center` facing `normal`.
    pub fn new(center: Vec3, normal: Vec3, radius: f64) -> Result<Self, GeomError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeomError::InvalidShape {
                reason: "circle radius must be finite and non-negative",
            });
        }
        Ok(Self::from_plane(Plane::new(center, normal)?, radius))
    }

    /// Disk centered at the plane's reference point.
    pub fn from_plane(plane: Plane, radius: f64) -> Self {
        let radius = radius.abs();
        Self {
            plane,
            radius,
            radius_squared: radius * radius,
        }
    }

    /// Center point.
    pub const fn center(&self) -> Vec3 {
        self.plane.point()
    }

    /// Moves the center.
    pub fn set_center(&mut self, center: Vec3) {
        self.plane.set_point(center);
    }

    /// Unit normal.
    pub const fn normal(&self) -> Vec3 {
        self.plane.normal()
    }

    /// Re-orients the disk.
    pub fn set_normal(&mut self, normal: Vec3) -> Result<(), GeomError> {
        self.plane.set_normal(normal)?;
        Ok(())
    }

    /// Supporting plane through the center.
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// Radius.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Squared radius.
    pub const fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    /// Sets the radius (absolute value) and its square.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.abs();
        self.radius_squared = self.radius * self.radius;
    }

    /// Sets the squared radius (absolute value) and the radius.
    pub fn set_radius_squared(&mut self, radius_squared: f64) {
        self.radius_squared = radius_squared.abs();
        self.radius = self.radius_squared.sqrt();
    }

    /// Closed-form bounds.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_circle3d(self)
    }

    /// Containment for a point on the disk plane (boundary inclusive).
    pub fn contains_planar_point(&self, p: Vec3) -> bool {
        let r = self.radius + Tolerance::DEFAULT.linear;
        p.distance_squared(&self.center()) <= r * r
    }

    /// Ray parameter of the hit, if it lies in `t_range`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let t = self.plane.ray_intersection(ray)?;
        if !t_range.contains(&t) {
            return None;
        }
        self.contains_planar_point(ray.at(t)).then_some(t)
    }

    /// Returns `true` if the two disks share a point.
    ///
    /// Coplanar disks compare center distance; otherwise both disks are cut
    /// by the planes' common line and the two chords must overlap.
    pub fn overlaps_circle(&self, other: &Self) -> bool {
        let tol = Tolerance::default();
        let Some(line) = self.plane.intersect_plane(&other.plane) else {
            if self.plane.signed_distance(other.center()).abs() > tol.linear {
                return false;
            }
            let reach = self.radius + other.radius + tol.linear;
            return self.center().distance_squared(&other.center()) <= reach * reach;
        };
        let (Some(a), Some(b)) = (self.chord(&line), other.chord(&line)) else {
            return false;
        };
        a.0 <= b.1 + tol.linear && b.0 <= a.1 + tol.linear
    }

    /// Parameter interval where a unit-direction line crosses the disk.
    fn chord(&self, line: &Ray) -> Option<(f64, f64)> {
        let s = (self.center() - line.origin).dot(&line.direction);
        let d2 = line.at(s).distance_squared(&self.center());
        if d2 > self.radius_squared + Tolerance::DEFAULT.linear {
            return None;
        }
        let half = (self.radius_squared - d2).max(0.0).sqrt();
        Some((s - half, s + half))
    }

    /// Point at angle `theta` in the plane basis.
    pub fn point_at(&self, theta: f64) -> Vec3 {
        let (u, v) = self.plane.basis();
        let (s, c) = theta.sin_cos();
        self.center() + (u * c + v * s) * self.radius
    }

    /// Inscribed polygon with `segments` vertices (at least 3).
    #[allow(clippy::cast_precision_loss)]
    pub fn to_polygon(&self, segments: usize) -> Polygon3d {
        let n = segments.max(3);
        Polygon3d::new(
            (0..n)
                .map(|k| self.point_at(TAU * k as f64 / n as f64))
                .collect(),
        )
    }

    /// Fan triangulation around the center, wound with the disk normal.
    pub fn triangulate(&self, segments: usize) -> Vec<Triangle3d> {
        fan(self.center(), self.to_polygon(segments).points())
    }

    /// Moves the disk by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.set_center(self.center() + offset);
    }

    /// Transforms the disk, assuming `mat` is a similarity (rotation,
    /// translation, uniform scale).
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let (u, v) = self.plane.basis();
        let c = self.center();
        let center = mat.transform_point3(c)?;
        let du = mat.transform_point3(c + u * self.radius)? - center;
        let dv = mat.transform_point3(c + v * self.radius)? - center;
        let plane = Plane::new(center, du.cross(&dv))?;
        *self = Self::from_plane(plane, du.length());
        Ok(())
    }
}

impl Bounded for Circle3d {
    fn aabb(&self) -> Aabb3 {
        Circle3d::aabb(self)
    }
}
