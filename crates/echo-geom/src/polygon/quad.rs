// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::ops::RangeInclusive;

use echo_math::{Matrix, Ray, Tolerance, Vec3};

use super::{Polygon3d, Triangle3d};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

const BARY_EPS: f64 = 1e-9;

/// Convex planar quadrilateral `v00, v10, v11, v01` (in loop order).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad3d {
    points: [Vec3; 4],
}

impl Quad3d {
    /// Creates a quad from its loop-ordered corners.
    pub const fn new(v00: Vec3, v10: Vec3, v11: Vec3, v01: Vec3) -> Self {
        Self {
            points: [v00, v10, v11, v01],
        }
    }

    /// The four corners in loop order.
    pub const fn points(&self) -> &[Vec3; 4] {
        &self.points
    }

    /// Unit normal of the first corner's triangle, or `None` if degenerate.
    pub fn try_normal(&self) -> Option<Vec3> {
        let [a, b, _, d] = self.points;
        (b - a).cross(&(d - a)).try_normalize()
    }

    /// Bounds of the corners.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_points(&self.points)
    }

    /// Same quad as a general polygon.
    pub fn as_polygon(&self) -> Polygon3d {
        Polygon3d::new(self.points.to_vec())
    }

    /// Splits along the `v00–v11` diagonal.
    pub fn triangulate(&self) -> [Triangle3d; 2] {
        let [a, b, c, d] = self.points;
        [Triangle3d::new(a, b, c), Triangle3d::new(a, c, d)]
    }

    /// Moves every corner by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Transforms every corner by a 4×4 matrix.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let mut out = self.points;
        for p in &mut out {
            *p = mat.transform_point3(*p)?;
        }
        self.points = out;
        Ok(())
    }

    /// Two-sided Lagae–Dutré ray/quad test.
    ///
    /// The hit is first tested against triangle `v00, v10, v01`; points past
    /// its diagonal are confirmed from the opposite corner `v11`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let [v00, v10, v11, v01] = self.points;
        let dir = ray.direction;
        let parallel = Tolerance::DEFAULT.parallel;

        let e01 = v10 - v00;
        let e03 = v01 - v00;
        let p = dir.cross(&e03);
        let det = e01.dot(&p);
        if det.abs() <= parallel * e01.length() * e03.length() * dir.length() {
            return None;
        }
        let t_vec = ray.origin - v00;
        let alpha = t_vec.dot(&p) / det;
        if alpha < -BARY_EPS {
            return None;
        }
        let q = t_vec.cross(&e01);
        let beta = dir.dot(&q) / det;
        if beta < -BARY_EPS {
            return None;
        }

        if alpha + beta > 1.0 {
            let e23 = v01 - v11;
            let e21 = v10 - v11;
            let p2 = dir.cross(&e21);
            let det2 = e23.dot(&p2);
            if det2.abs() <= parallel * e23.length() * e21.length() * dir.length() {
                return None;
            }
            let t2 = ray.origin - v11;
            let alpha2 = t2.dot(&p2) / det2;
            if alpha2 < -BARY_EPS {
                return None;
            }
            let q2 = t2.cross(&e23);
            let beta2 = dir.dot(&q2) / det2;
            if beta2 < -BARY_EPS {
                return None;
            }
        }

        let t = e03.dot(&q) / det;
        t_range.contains(&t).then_some(t)
    }
}

impl Bounded for Quad3d {
    fn aabb(&self) -> Aabb3 {
        Quad3d::aabb(self)
    }
}
