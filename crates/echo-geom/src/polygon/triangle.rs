// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::ops::RangeInclusive;

use echo_math::{Matrix, Ray, Tolerance, Vec3};

use super::Polygon3d;
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Barycentric slack so hits on shared edges are not lost to rounding.
const BARY_EPS: f64 = 1e-9;

/// Triangle with a fixed vertex triple; normal `(b − a) × (c − a)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle3d {
    points: [Vec3; 3],
}

impl Triangle3d {
    /// Creates a triangle.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { points: [a, b, c] }
    }

    /// The three vertices.
    pub const fn points(&self) -> &[Vec3; 3] {
        &self.points
    }

    /// Unnormalised normal; its length is twice the area.
    pub fn raw_normal(&self) -> Vec3 {
        let [a, b, c] = self.points;
        (b - a).cross(&(c - a))
    }

    /// Unit normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        self.raw_normal().normalize()
    }

    /// Unit normal, or `None` for a degenerate triangle.
    pub fn try_normal(&self) -> Option<Vec3> {
        self.raw_normal().try_normalize()
    }

    /// Area.
    pub fn area(&self) -> f64 {
        self.raw_normal().length() * 0.5
    }

    /// Bounds of the vertices.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_points(&self.points)
    }

    /// Same triangle as a general polygon.
    pub fn as_polygon(&self) -> Polygon3d {
        Polygon3d::new(self.points.to_vec())
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Transforms every vertex by a 4×4 matrix.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let [a, b, c] = self.points;
        self.points = [
            mat.transform_point3(a)?,
            mat.transform_point3(b)?,
            mat.transform_point3(c)?,
        ];
        Ok(())
    }

    /// Keeps the part with `z <= cutoff` (or `>=`); may come back as a quad.
    pub fn clip_z(&self, cutoff: f64, keep_less_than: bool) -> Polygon3d {
        self.as_polygon().clip_z(cutoff, keep_less_than)
    }

    /// Two-sided Möller–Trumbore ray test.
    ///
    /// Returns the ray parameter when the hit lies in `t_range`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let [a, b, c] = self.points;
        let e1 = b - a;
        let e2 = c - a;
        let pvec = ray.direction.cross(&e2);
        let det = e1.dot(&pvec);
        let scale = e1.length() * e2.length() * ray.direction.length();
        if det.abs() <= Tolerance::DEFAULT.parallel * scale {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.origin - a;
        let u = tvec.dot(&pvec) * inv_det;
        if !(-BARY_EPS..=1.0 + BARY_EPS).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(&e1);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < -BARY_EPS || u + v > 1.0 + BARY_EPS {
            return None;
        }
        let t = e2.dot(&qvec) * inv_det;
        t_range.contains(&t).then_some(t)
    }
}

impl Bounded for Triangle3d {
    fn aabb(&self) -> Aabb3 {
        Triangle3d::aabb(self)
    }
}
