// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::f64::consts::TAU;
use std::ops::RangeInclusive;

use echo_math::{Matrix, Plane, Ray, Tolerance, Vec3};

use super::{Polygon3d, Triangle3d};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Planar ellipse defined by a center and two orthogonal semi-axis vectors.
///
/// The defining frame is `[center, center + major, center + minor]`; its
/// normal `major × minor` orients the ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipse3d {
    center: Vec3,
    major: Vec3,
    minor: Vec3,
    plane: Plane,
}

impl Ellipse3d {
    /// Creates an ellipse from semi-axis vectors.
    ///
    /// Fails when an axis is zero or the axes are not orthogonal.
    pub fn new(center: Vec3, major: Vec3, minor: Vec3) -> Result<Self, GeomError> {
        let tol = Tolerance::default();
        let (a, b) = (major.length(), minor.length());
        if a <= tol.linear || b <= tol.linear {
            return Err(GeomError::InvalidShape {
                reason: "ellipse axis has zero length",
            });
        }
        if major.dot(&minor).abs() > tol.linear * a * b {
            return Err(GeomError::InvalidShape {
                reason: "ellipse axes are not orthogonal",
            });
        }
        let plane = Plane::new(center, major.cross(&minor))?;
        Ok(Self {
            center,
            major,
            minor,
            plane,
        })
    }

    /// Creates an ellipse from its frame points.
    pub fn from_frame(center: Vec3, major_end: Vec3, minor_end: Vec3) -> Result<Self, GeomError> {
        Self::new(center, major_end - center, minor_end - center)
    }

    /// Center point.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Semi-major axis vector.
    pub const fn major_axis(&self) -> Vec3 {
        self.major
    }

    /// Semi-minor axis vector.
    pub const fn minor_axis(&self) -> Vec3 {
        self.minor
    }

    /// `[center, center + major, center + minor]`.
    pub fn frame(&self) -> [Vec3; 3] {
        [self.center, self.center + self.major, self.center + self.minor]
    }

    /// Length of the major semi-axis.
    pub fn radius_x(&self) -> f64 {
        self.major.length()
    }

    /// Length of the minor semi-axis.
    pub fn radius_y(&self) -> f64 {
        self.minor.length()
    }

    /// Supporting plane (normal `major × minor`).
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// Closed-form bounds.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_ellipse3d(self)
    }

    /// Exact containment for a point on the ellipse plane (boundary inclusive).
    pub fn contains_planar_point(&self, p: Vec3) -> bool {
        let d = p - self.center;
        let x = d.dot(&self.major) / self.major.length_squared();
        let y = d.dot(&self.minor) / self.minor.length_squared();
        x * x + y * y <= 1.0 + Tolerance::DEFAULT.linear
    }

    /// Ray parameter of the hit, if it lies in `t_range`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let t = self.plane.ray_intersection(ray)?;
        if !t_range.contains(&t) {
            return None;
        }
        self.contains_planar_point(ray.at(t)).then_some(t)
    }

    /// Point at angle `theta` (radians from the major axis toward the minor).
    pub fn point_at(&self, theta: f64) -> Vec3 {
        let (s, c) = theta.sin_cos();
        self.center + self.major * c + self.minor * s
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

    /// Fan triangulation around the center, wound with the ellipse normal.
    pub fn triangulate(&self, segments: usize) -> Vec<Triangle3d> {
        fan(self.center, self.to_polygon(segments).points())
    }

    /// Moves the ellipse by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
        self.plane.set_point(self.center);
    }

    /// Transforms the frame points; fails if the image is no longer an
    /// orthogonal frame (e.g. under shear).
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let [c, a, b] = self.frame();
        *self = Self::from_frame(
            mat.transform_point3(c)?,
            mat.transform_point3(a)?,
            mat.transform_point3(b)?,
        )?;
        Ok(())
    }
}

pub(super) fn fan(center: Vec3, outline: &[Vec3]) -> Vec<Triangle3d> {
    let n = outline.len();
    outline
        .iter()
        .enumerate()
        .map(|(i, a)| Triangle3d::new(center, *a, outline[(i + 1) % n]))
        .collect()
}

impl Bounded for Ellipse3d {
    fn aabb(&self) -> Aabb3 {
        Ellipse3d::aabb(self)
    }
}
