// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::ops::RangeInclusive;

use echo_math::{Matrix, Ray, Tolerance, Vec3};

use super::{triangulate_loops, Polygon3d, Triangle3d};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Flat set of outer loops and holes.
///
/// No nesting is tracked: each member carries its own hole flag, and ray
/// hits count outer loops as `+1` and holes as `−1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygons3d {
    polygons: Vec<Polygon3d>,
}

impl Polygons3d {
    /// Wraps a list of loops.
    pub fn new(polygons: Vec<Polygon3d>) -> Self {
        Self { polygons }
    }

    /// Adds a loop.
    pub fn push(&mut self, polygon: Polygon3d) {
        self.polygons.push(polygon);
    }

    /// All loops.
    pub fn polygons(&self) -> &[Polygon3d] {
        &self.polygons
    }

    /// Iterates every loop.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon3d> {
        self.polygons.iter()
    }

    /// Number of loops.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns `true` with no loops.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Loops that add area.
    pub fn outers(&self) -> impl Iterator<Item = &Polygon3d> + '_ {
        self.polygons.iter().filter(|p| !p.is_hole())
    }

    /// Loops that subtract area.
    pub fn holes(&self) -> impl Iterator<Item = &Polygon3d> + '_ {
        self.polygons.iter().filter(|p| p.is_hole())
    }

    /// Union of the outer loops' bounds.
    pub fn aabb(&self) -> Aabb3 {
        self.outers()
            .fold(Aabb3::empty(), |acc, p| acc.union(&p.aabb()))
    }

    /// Nearest outer-loop hit, provided the net hit count is positive.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let mut net = 0_i32;
        let mut nearest: Option<f64> = None;
        for polygon in &self.polygons {
            let Some(t) = polygon.intersect_ray(ray, t_range.clone()) else {
                continue;
            };
            if polygon.is_hole() {
                net -= 1;
            } else {
                net += 1;
                nearest = Some(nearest.map_or(t, |n| n.min(t)));
            }
        }
        if net > 0 {
            nearest
        } else {
            None
        }
    }

    /// Triangulates each outer loop together with the holes whose first
    /// vertex lies inside it.
    pub fn triangulate(&self) -> Result<Vec<Triangle3d>, GeomError> {
        let linear = Tolerance::DEFAULT.linear;
        let mut out = Vec::new();
        for outer in self.outers() {
            let plane = outer.plane()?;
            let holes: Vec<&[Vec3]> = self
                .holes()
                .filter(|hole| {
                    hole.points().first().is_some_and(|first| {
                        plane.signed_distance(*first).abs() <= linear
                            && outer.contains_planar_point(*first)
                    })
                })
                .map(Polygon3d::points)
                .collect();
            out.extend(triangulate_loops(&plane, outer.points(), &holes)?);
        }
        Ok(out)
    }

    /// Clips every loop at height `cutoff`, dropping loops that vanish.
    pub fn clip_z(&self, cutoff: f64, keep_less_than: bool) -> Self {
        Self::new(
            self.polygons
                .iter()
                .map(|p| p.clip_z(cutoff, keep_less_than))
                .filter(|p| p.len() >= 3)
                .collect(),
        )
    }

    /// Moves every loop by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for polygon in &mut self.polygons {
            polygon.translate(offset);
        }
    }

    /// Transforms every loop by a 4×4 matrix; all or nothing.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let mut polygons = self.polygons.clone();
        for polygon in &mut polygons {
            polygon.transform(mat)?;
        }
        self.polygons = polygons;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Polygons3d {
    type Item = &'a Polygon3d;
    type IntoIter = std::slice::Iter<'a, Polygon3d>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl Bounded for Polygons3d {
    fn aabb(&self) -> Aabb3 {
        Polygons3d::aabb(self)
    }
}
