// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use echo_math::{Tolerance, Vec3};

use super::Aabb3;
use crate::cone::Cone;
use crate::polygon::{project_points, Circle3d, Polygon3d, Shape, ELLIPSE_SAT_SEGMENTS};
use crate::sphere::Sphere;

const BOX_AXES: [Vec3; 3] = [Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z];

impl Aabb3 {
    /// Closest-point test against a solid sphere.
    pub fn overlaps_sphere(&self, sphere: &Sphere) -> bool {
        if self.is_empty() {
            return false;
        }
        let c = sphere.center();
        if self.contains_point(c) {
            return true;
        }
        self.closest_point(c).distance_squared(&c) <= sphere.radius_squared()
    }

    /// Overlap with a disk (not a sphere).
    ///
    /// The box must straddle the disk plane; the box point closest to the
    /// disk center is then projected onto the plane and compared against the
    /// radius.
    pub fn overlaps_circle3d(&self, circle: &Circle3d) -> bool {
        if self.is_empty() {
            return false;
        }
        let center = circle.center();
        if self.contains_point(center) {
            return true;
        }
        let plane = circle.plane();
        let (lo, hi) = self.project_onto_axis(plane.normal());
        let offset = plane.normal().dot(&center);
        if offset < lo || offset > hi {
            return false;
        }
        let projected = plane.project_point(self.closest_point(center));
        projected.distance_squared(&center) <= circle.radius_squared()
    }

    /// Staged box/cone test.
    ///
    /// Cheap early-outs run first (apex inside the box, box center inside the
    /// cone bounds, disjoint bounds), then box corners against the cone, box
    /// edges against the cone surface, and finally the cone axis and base
    /// disk against the box.
    pub fn overlaps_cone(&self, cone: &Cone) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.contains_point(cone.origin()) {
            return true;
        }
        let cone_box = cone.aabb();
        if cone_box.contains_point(self.center()) {
            return true;
        }
        if !cone_box.overlaps_aabb(self) {
            return false;
        }
        if self.vertices().iter().any(|v| cone.contains_point(*v)) {
            return true;
        }
        if self.edges().iter().any(|(a, b)| cone.intersects_segment(*a, *b)) {
            return true;
        }
        if self.overlaps_segment(cone.origin(), cone.base_center()) {
            return true;
        }
        cone.base_circle().is_ok_and(|base| self.overlaps_circle3d(&base))
    }

    /// Separating-axis test against a convex planar polygon.
    pub fn overlaps_convex_polygon3d(&self, polygon: &Polygon3d) -> bool {
        self.overlaps_convex_points(polygon.points(), polygon.face_normal())
    }

    /// Overlap with any shape in the union.
    ///
    /// Circles take the exact disk path; ellipses are sampled into their
    /// convex outline and run through the same SAT as polygons. Concave
    /// polygons are split into triangles first. A multi-polygon overlaps
    /// when any outer loop does.
    pub fn overlaps_shape(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Circle(c) => self.overlaps_circle3d(c),
            Shape::Ellipse(e) => {
                self.overlaps_convex_polygon3d(&e.to_polygon(ELLIPSE_SAT_SEGMENTS))
            }
            Shape::Triangle(t) => self.overlaps_convex_points(t.points(), t.try_normal()),
            Shape::Quad(q) => self.overlaps_convex_points(q.points(), q.try_normal()),
            Shape::Polygon(p) => self.overlaps_polygon(p),
            Shape::Multi(m) => m.outers().any(|p| self.overlaps_polygon(p)),
        }
    }

    fn overlaps_polygon(&self, polygon: &Polygon3d) -> bool {
        if polygon.is_convex() {
            return self.overlaps_convex_polygon3d(polygon);
        }
        match polygon.triangulate() {
            Ok(tris) => tris
                .iter()
                .any(|t| self.overlaps_convex_points(t.points(), t.try_normal())),
            Err(_) => self.overlaps_convex_polygon3d(polygon),
        }
    }

    /// SAT core shared by every convex outline.
    ///
    /// Axes in order: the three box normals, the polygon normal, then each
    /// edge direction crossed with each box axis. Near-zero cross products
    /// (edge parallel to a box axis) are skipped.
    pub(crate) fn overlaps_convex_points(&self, points: &[Vec3], normal: Option<Vec3>) -> bool {
        if self.is_empty() || points.is_empty() {
            return false;
        }
        if points.iter().any(|p| self.contains_point(*p)) {
            return true;
        }
        let separated = |axis: Vec3| {
            let (p_lo, p_hi) = project_points(points, axis);
            let (b_lo, b_hi) = self.project_onto_axis(axis);
            p_hi < b_lo || p_lo > b_hi
        };
        if BOX_AXES.into_iter().any(separated) {
            return false;
        }
        if normal.is_some_and(separated) {
            return false;
        }
        let parallel = Tolerance::DEFAULT.parallel;
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let edge = b - *a;
            let edge_len = edge.length();
            for box_axis in BOX_AXES {
                let axis = edge.cross(&box_axis);
                if axis.length() <= parallel * edge_len.max(1.0) {
                    continue;
                }
                if separated(axis) {
                    return false;
                }
            }
        }
        true
    }

    /// Scalar interval of the box projected onto `axis`.
    pub fn project_onto_axis(&self, axis: Vec3) -> (f64, f64) {
        let c = self.center().dot(&axis);
        let r = self.half_extents().dot(&axis.abs());
        (c - r, c + r)
    }
}
