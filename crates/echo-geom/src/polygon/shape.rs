// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::ops::RangeInclusive;

use echo_math::{Plane, Ray};

use super::{
    Circle3d, Ellipse3d, Polygon3d, Polygons3d, Quad3d, Triangle3d, DEFAULT_SEGMENTS,
};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Closed union over the planar shape family.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// General polygon.
    Polygon(Polygon3d),
    /// Ellipse.
    Ellipse(Ellipse3d),
    /// Disk.
    Circle(Circle3d),
    /// Triangle.
    Triangle(Triangle3d),
    /// Convex quad.
    Quad(Quad3d),
    /// Outer loops and holes.
    Multi(Polygons3d),
}

impl Shape {
    /// Bounds, using closed forms for conics.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_shape(self)
    }

    /// Supporting plane; a multi-polygon reports its first outer loop's.
    pub fn plane(&self) -> Result<Plane, GeomError> {
        match self {
            Self::Polygon(p) => p.plane(),
            Self::Ellipse(e) => Ok(e.plane()),
            Self::Circle(c) => Ok(c.plane()),
            Self::Triangle(t) => {
                let [a, b, c] = *t.points();
                Ok(Plane::from_points(a, b, c)?)
            }
            Self::Quad(q) => {
                let [a, b, _, d] = *q.points();
                Ok(Plane::from_points(a, b, d)?)
            }
            Self::Multi(m) => m
                .outers()
                .next()
                .ok_or(GeomError::InvalidShape {
                    reason: "multi-polygon has no outer loop",
                })?
                .plane(),
        }
    }

    /// Ray parameter of the nearest hit within `t_range`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        match self {
            Self::Polygon(p) => p.intersect_ray(ray, t_range),
            Self::Ellipse(e) => e.intersect_ray(ray, t_range),
            Self::Circle(c) => c.intersect_ray(ray, t_range),
            Self::Triangle(t) => t.intersect_ray(ray, t_range),
            Self::Quad(q) => q.intersect_ray(ray, t_range),
            Self::Multi(m) => m.intersect_ray(ray, t_range),
        }
    }

    /// Triangle list covering the shape; conics use [`DEFAULT_SEGMENTS`].
    pub fn triangulate(&self) -> Result<Vec<Triangle3d>, GeomError> {
        match self {
            Self::Polygon(p) => p.triangulate(),
            Self::Ellipse(e) => Ok(e.triangulate(DEFAULT_SEGMENTS)),
            Self::Circle(c) => Ok(c.triangulate(DEFAULT_SEGMENTS)),
            Self::Triangle(t) => Ok(vec![*t]),
            Self::Quad(q) => Ok(q.triangulate().to_vec()),
            Self::Multi(m) => m.triangulate(),
        }
    }

    /// Outline as a general polygon; a multi-polygon yields its first outer
    /// loop.
    pub fn to_polygon(&self) -> Result<Polygon3d, GeomError> {
        match self {
            Self::Polygon(p) => Ok(p.clone()),
            Self::Ellipse(e) => Ok(e.to_polygon(DEFAULT_SEGMENTS)),
            Self::Circle(c) => Ok(c.to_polygon(DEFAULT_SEGMENTS)),
            Self::Triangle(t) => Ok(t.as_polygon()),
            Self::Quad(q) => Ok(q.as_polygon()),
            Self::Multi(m) => m.outers().next().cloned().ok_or(GeomError::InvalidShape {
                reason: "multi-polygon has no outer loop",
            }),
        }
    }
}

impl Bounded for Shape {
    fn aabb(&self) -> Aabb3 {
        Shape::aabb(self)
    }
}

impl From<Polygon3d> for Shape {
    fn from(value: Polygon3d) -> Self {
        Self::Polygon(value)
    }
}

impl From<Ellipse3d> for Shape {
    fn from(value: Ellipse3d) -> Self {
        Self::Ellipse(value)
    }
}

impl From<Circle3d> for Shape {
    fn from(value: Circle3d) -> Self {
        Self::Circle(value)
    }
}

impl From<Triangle3d> for Shape {
    fn from(value: Triangle3d) -> Self {
        Self::Triangle(value)
    }
}

impl From<Quad3d> for Shape {
    fn from(value: Quad3d) -> Self {
        Self::Quad(value)
    }
}

impl From<Polygons3d> for Shape {
    fn from(value: Polygons3d) -> Self {
        Self::Multi(value)
    }
}
