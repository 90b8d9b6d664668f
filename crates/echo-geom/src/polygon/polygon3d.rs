// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::cell::OnceCell;
use std::ops::RangeInclusive;

use echo_math::{Matrix, Plane, Ray, Tolerance, Vec2, Vec3, EPSILON};
use tracing::debug;

use super::{point_in_outline, project_points, signed_area2, triangulate_loops, Triangle3d};
use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;

/// Derived state, rebuilt lazily after every mutation.
#[derive(Debug, Clone, Default)]
struct Derived {
    aabb: OnceCell<Aabb3>,
    plane: OnceCell<Result<Plane, GeomError>>,
    centroid: OnceCell<Result<Vec3, GeomError>>,
    planar: OnceCell<Result<Vec<Vec2>, GeomError>>,
    /// Linear tolerance of the last clean pass that left the points as is.
    cleaned_at: Option<f64>,
}

/// Ordered loop of coplanar points.
///
/// The winding defines orientation: the fitted plane's normal is
/// `(p1 − p0) × (p2 − p0)`. Operations that need the plane assume the first
/// three points are not collinear; call [`Polygon3d::clean`] first when they
/// might be.
///
/// Derived values are cached per instance and the cache is dropped wholesale
/// by every `&mut self` method, so a stale read is impossible.
#[derive(Debug, Clone, Default)]
pub struct Polygon3d {
    points: Vec<Vec3>,
    is_hole: bool,
    cache: Derived,
}

impl PartialEq for Polygon3d {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.is_hole == other.is_hole
    }
}

impl Polygon3d {
    /// Creates an outer (non-hole) polygon.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            is_hole: false,
            cache: Derived::default(),
        }
    }

    /// Builder-style hole flag.
    pub fn with_hole(mut self, is_hole: bool) -> Self {
        self.is_hole = is_hole;
        self
    }

    /// Lifts a 2D outline to height `z`.
    pub fn from_2d_points(points: &[Vec2], z: f64) -> Self {
        Self::new(points.iter().map(|p| Vec3::new(p.x(), p.y(), z)).collect())
    }

    /// The vertex loop.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Vertex count.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` for a polygon with no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this loop subtracts from a multi-polygon.
    pub const fn is_hole(&self) -> bool {
        self.is_hole
    }

    /// Sets the hole flag.
    pub fn set_hole(&mut self, is_hole: bool) {
        self.is_hole = is_hole;
    }

    /// Closed edge loop `(p[i], p[i + 1])`, wrapping to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        self.points
            .iter()
            .enumerate()
            .map(move |(i, a)| (*a, self.points[(i + 1) % n]))
    }

    fn invalidate(&mut self) {
        self.cache = Derived::default();
    }

    /// Replaces every vertex.
    pub fn set_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
        self.invalidate();
    }

    /// Replaces one vertex.
    pub fn set_point(&mut self, index: usize, point: Vec3) -> Result<(), GeomError> {
        let slot = self.points.get_mut(index).ok_or(GeomError::InvalidShape {
            reason: "vertex index out of range",
        })?;
        *slot = point;
        self.invalidate();
        Ok(())
    }

    /// Appends a vertex.
    pub fn push_point(&mut self, point: Vec3) {
        self.points.push(point);
        self.invalidate();
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            *p += offset;
        }
        self.invalidate();
    }

    /// Scales every vertex about `center`.
    pub fn scale_about(&mut self, center: Vec3, factor: f64) {
        for p in &mut self.points {
            *p = center + (*p - center) * factor;
        }
        self.invalidate();
    }

    /// Transforms every vertex by a 4×4 matrix.
    ///
    /// On error the polygon is left unchanged.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let points = self
            .points
            .iter()
            .map(|p| mat.transform_point3(*p))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_points(points);
        Ok(())
    }

    /// Flips the winding (and therefore the plane normal).
    pub fn reverse_orientation(&mut self) {
        self.points.reverse();
        self.invalidate();
    }

    /// Bounds of the vertices.
    pub fn aabb(&self) -> Aabb3 {
        *self.cache.aabb.get_or_init(|| Aabb3::from_points(&self.points))
    }

    /// Plane through the first three vertices.
    pub fn plane(&self) -> Result<Plane, GeomError> {
        self.cache
            .plane
            .get_or_init(|| {
                let [a, b, c, ..] = self.points[..] else {
                    return Err(GeomError::InvalidShape {
                        reason: "polygon needs at least three points",
                    });
                };
                Plane::from_points(a, b, c).map_err(|_| GeomError::InvalidShape {
                    reason: "first three points are collinear",
                })
            })
            .clone()
    }

    /// Unit face normal for separating-axis tests.
    ///
    /// Falls back to Newell's normal when the first three points are
    /// collinear, so the face axis survives a redundant leading vertex.
    pub(crate) fn face_normal(&self) -> Option<Vec3> {
        if let Ok(plane) = self.plane() {
            return Some(plane.normal());
        }
        let newell = self.edges().fold(Vec3::ZERO, |acc, (a, b)| {
            acc + Vec3::new(
                (a.y() - b.y()) * (a.z() + b.z()),
                (a.z() - b.z()) * (a.x() + b.x()),
                (a.x() - b.x()) * (a.y() + b.y()),
            )
        });
        let len = newell.length();
        (len > 0.0).then(|| newell / len)
    }

    fn planar(&self) -> Result<&[Vec2], GeomError> {
        let planar = self.cache.planar.get_or_init(|| {
            let plane = self.plane()?;
            Ok(self.points.iter().map(|p| plane.to_2d(*p)).collect())
        });
        match planar {
            Ok(points) => Ok(points),
            Err(e) => Err(e.clone()),
        }
    }

    /// Vertices in the plane basis (see [`Plane::to_2d`]).
    pub fn to_2d(&self) -> Result<Vec<Vec2>, GeomError> {
        self.planar().map(<[Vec2]>::to_vec)
    }

    /// Area-weighted centroid.
    ///
    /// Computed in the plane basis and mapped back; polygons with no area
    /// (or no fitted plane) fall back to the vertex mean.
    pub fn centroid(&self) -> Result<Vec3, GeomError> {
        self.cache
            .centroid
            .get_or_init(|| {
                if self.points.is_empty() {
                    return Err(GeomError::InvalidShape {
                        reason: "centroid of an empty polygon",
                    });
                }
                let mean = self.vertex_mean();
                let (Ok(plane), Ok(flat)) = (self.plane(), self.planar()) else {
                    return Ok(mean);
                };
                let n = flat.len();
                let mut area2 = 0.0;
                let mut acc = Vec2::ZERO;
                for (i, a) in flat.iter().enumerate() {
                    let b = flat[(i + 1) % n];
                    let cross = a.perp_dot(&b);
                    area2 += cross;
                    acc += (*a + b) * cross;
                }
                if area2.abs() <= EPSILON * EPSILON {
                    return Ok(mean);
                }
                Ok(plane.to_3d(acc / (3.0 * area2)))
            })
            .clone()
    }

    #[allow(clippy::cast_precision_loss)]
    fn vertex_mean(&self) -> Vec3 {
        let sum = self.points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
        sum / self.points.len().max(1) as f64
    }

    /// Unsigned area.
    pub fn area(&self) -> Result<f64, GeomError> {
        Ok(signed_area2(self.planar()?).abs() * 0.5)
    }

    /// At least three points with a well-defined plane.
    pub fn is_valid(&self) -> bool {
        self.plane().is_ok()
    }

    /// Returns `true` when every turn has the same sign in the plane basis.
    ///
    /// Collinear runs are ignored; invalid polygons are not convex.
    pub fn is_convex(&self) -> bool {
        let Ok(flat) = self.planar() else {
            return false;
        };
        let n = flat.len();
        let mut winding: Option<bool> = None;
        for (i, a) in flat.iter().enumerate() {
            let b = flat[(i + 1) % n];
            let c = flat[(i + 2) % n];
            let turn = (b - *a).perp_dot(&(c - b));
            if turn.abs() <= EPSILON * EPSILON {
                continue;
            }
            match winding {
                None => winding = Some(turn > 0.0),
                Some(ccw) if ccw != (turn > 0.0) => return false,
                Some(_) => {}
            }
        }
        true
    }

    /// Returns `true` when `viewpoint` is on the normal side of the plane.
    pub fn is_facing(&self, viewpoint: Vec3) -> Result<bool, GeomError> {
        Ok(self.plane()?.signed_distance(viewpoint) > 0.0)
    }

    /// Drops duplicate and collinear vertices with the default tolerance.
    ///
    /// Returns the number of vertices removed.
    pub fn clean(&mut self) -> usize {
        self.clean_with(&Tolerance::default())
    }

    /// Drops every vertex lying within `tol.linear` of the line through its
    /// neighbours (duplicates included).
    ///
    /// Idempotent: a repeat call with the same or a tighter tolerance is free
    /// until the points change again. A looser tolerance re-runs the pass.
    pub fn clean_with(&mut self, tol: &Tolerance) -> usize {
        if self.cache.cleaned_at.is_some_and(|linear| tol.linear <= linear) {
            return 0;
        }
        let mut points = self.points.clone();
        let before = points.len();
        let mut i = 0;
        while points.len() >= 3 && i < points.len() {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            if is_redundant(prev, cur, next, tol.linear) {
                points.remove(i);
                // Re-check the previous vertex against its new neighbour.
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
        let removed = before - points.len();
        if removed > 0 {
            debug!(removed, remaining = points.len(), "polygon clean dropped vertices");
            self.set_points(points);
        }
        self.cache.cleaned_at = Some(tol.linear);
        removed
    }

    /// Triangulates the loop in its plane.
    ///
    /// Triangles reference the original vertices and are wound to match the
    /// polygon normal.
    pub fn triangulate(&self) -> Result<Vec<Triangle3d>, GeomError> {
        let plane = self.plane()?;
        triangulate_loops(&plane, &self.points, &[])
    }

    /// Keeps the part of the polygon with `z <= cutoff` (or `>=` when
    /// `keep_less_than` is false).
    ///
    /// Each crossing edge gains a vertex on the cutoff, so the result can have
    /// more points than the input. A fully rejected polygon comes back empty.
    pub fn clip_z(&self, cutoff: f64, keep_less_than: bool) -> Self {
        if keep_less_than {
            self.clip_by(|p| cutoff - p.z())
        } else {
            self.clip_by(|p| p.z() - cutoff)
        }
    }

    /// Keeps the part on the front (normal) side of `plane`, or the back side
    /// when `keep_front` is false.
    pub fn clip_plane(&self, plane: &Plane, keep_front: bool) -> Self {
        if keep_front {
            self.clip_by(|p| plane.signed_distance(p))
        } else {
            self.clip_by(|p| -plane.signed_distance(p))
        }
    }

    /// Single-plane Sutherland–Hodgman clip; `dist(p) >= 0` is kept.
    fn clip_by(&self, dist: impl Fn(Vec3) -> f64) -> Self {
        let n = self.points.len();
        let mut out = Vec::with_capacity(n + 2);
        for (i, a) in self.points.iter().enumerate() {
            let b = self.points[(i + 1) % n];
            let (da, db) = (dist(*a), dist(b));
            if da >= 0.0 {
                out.push(*a);
            }
            // Only a strict sign change crosses; an endpoint on the cutoff is
            // already emitted as a vertex.
            if (da > 0.0 && db < 0.0) || (da < 0.0 && db > 0.0) {
                let t = da / (da - db);
                out.push(a.lerp(&b, t));
            }
        }
        Self::new(out).with_hole(self.is_hole)
    }

    /// Ray parameter of the hit, if the ray meets the polygon within
    /// `t_range`.
    pub fn intersect_ray(&self, ray: &Ray, t_range: RangeInclusive<f64>) -> Option<f64> {
        let plane = self.plane().ok()?;
        let t = plane.ray_intersection(ray)?;
        if !t_range.contains(&t) {
            return None;
        }
        self.contains_planar_point(ray.at(t)).then_some(t)
    }

    /// In-polygon test for a point assumed to lie on the polygon plane.
    ///
    /// Mostly horizontal planes drop Z; steeper planes (`|n.z| < 0.5`) use
    /// the plane basis so the 2D outline never collapses. Boundary points
    /// count as inside.
    pub fn contains_planar_point(&self, p: Vec3) -> bool {
        let Ok(plane) = self.plane() else {
            return false;
        };
        if plane.normal().z().abs() >= 0.5 {
            let outline: Vec<Vec2> = self.points.iter().map(|q| Vec2::new(q.x(), q.y())).collect();
            point_in_outline(Vec2::new(p.x(), p.y()), &outline, EPSILON)
        } else {
            match self.planar() {
                Ok(outline) => point_in_outline(plane.to_2d(p), outline, EPSILON),
                Err(_) => false,
            }
        }
    }

    /// Scalar interval of the vertices projected onto `axis`.
    pub fn project_onto_axis(&self, axis: Vec3) -> (f64, f64) {
        project_points(&self.points, axis)
    }
}

fn is_redundant(prev: Vec3, cur: Vec3, next: Vec3, eps: f64) -> bool {
    if cur.distance(&prev) <= eps || cur.distance(&next) <= eps {
        return true;
    }
    let base = next - prev;
    let len = base.length();
    if len <= eps {
        // Spike that doubles back on itself.
        return true;
    }
    (cur - prev).cross(&base).length() / len <= eps
}

impl Bounded for Polygon3d {
    fn aabb(&self) -> Aabb3 {
        Polygon3d::aabb(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon3d {
        Polygon3d::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn cache_is_dropped_on_mutation() {
        let mut poly = unit_square();
        assert_eq!(poly.aabb().max(), Vec3::new(1.0, 1.0, 0.0));
        poly.translate(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(poly.aabb().max(), Vec3::new(1.0, 1.0, 2.0));
        assert!((poly.plane().unwrap().point().z() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn clean_removes_collinear_and_duplicate_points() {
        let mut poly = Polygon3d::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]);
        assert_eq!(poly.clean(), 2);
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.clean(), 0);
    }

    #[test]
    fn clean_lets_plane_fit_a_polygon_starting_collinear() {
        let mut poly = Polygon3d::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        ]);
        assert!(poly.plane().is_err());
        poly.clean();
        assert_eq!(poly.plane().unwrap().normal(), Vec3::UNIT_Z);
    }

    #[test]
    fn centroid_and_area_of_square() {
        let poly = unit_square();
        assert!(poly.centroid().unwrap().approx_eq(&Vec3::new(0.5, 0.5, 0.0), 1e-12));
        assert!((poly.area().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn convexity() {
        assert!(unit_square().is_convex());
        let arrow = Polygon3d::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ]);
        assert!(!arrow.is_convex());
    }
}
