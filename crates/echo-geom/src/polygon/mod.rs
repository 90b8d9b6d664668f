// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Planar polygons.
//!
//! Every shape here lies in a single plane. The general [`Polygon3d`] keeps
//! its derived state (bounds, fitted plane, centroid, planar projection) in
//! a private cache that every mutation replaces; the fixed-size shapes
//! ([`Triangle3d`], [`Quad3d`]) and the conics ([`Ellipse3d`], [`Circle3d`])
//! own their data directly and carry closed-form queries. [`Shape`] closes
//! the family into one enum.

mod circle;
mod ellipse;
mod multi;
mod polygon3d;
mod quad;
mod shape;
mod triangle;

pub use circle::Circle3d;
pub use ellipse::Ellipse3d;
pub use multi::Polygons3d;
pub use polygon3d::Polygon3d;
pub use quad::Quad3d;
pub use shape::Shape;
pub use triangle::Triangle3d;

use echo_math::{Plane, Vec2, Vec3};

use crate::error::GeomError;

/// Outline resolution used when a conic has to be treated as a polygon.
pub const DEFAULT_SEGMENTS: usize = 32;

/// Outline resolution for ellipses entering the SAT path.
pub(crate) const ELLIPSE_SAT_SEGMENTS: usize = 32;

/// Scalar interval of `points` projected onto `axis`.
///
/// Shared by [`Polygon3d::project_onto_axis`] and the AABB separating-axis
/// test.
pub(crate) fn project_points(points: &[Vec3], axis: Vec3) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(&axis);
        (lo.min(d), hi.max(d))
    })
}

/// Even-odd point-in-outline test; points within `eps` of an edge count as
/// inside.
pub(crate) fn point_in_outline(p: Vec2, outline: &[Vec2], eps: f64) -> bool {
    let n = outline.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % n];
        if near_segment(p, *a, b, eps) {
            return true;
        }
        if (a.y() > p.y()) != (b.y() > p.y()) {
            let x = a.x() + (p.y() - a.y()) * (b.x() - a.x()) / (b.y() - a.y());
            if p.x() < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn near_segment(p: Vec2, a: Vec2, b: Vec2, eps: f64) -> bool {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= eps * eps {
        return p.distance(&a) <= eps;
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    p.distance(&(a + ab * t)) <= eps
}

/// Twice the signed area of a planar outline (positive when counter-clockwise).
pub(crate) fn signed_area2(outline: &[Vec2]) -> f64 {
    let n = outline.len();
    outline
        .iter()
        .enumerate()
        .map(|(i, a)| a.perp_dot(&outline[(i + 1) % n]))
        .sum()
}

/// Ear-clips `outer` with `holes` in the plane basis and maps the triangles
/// back to the original 3D vertices, wound to match `plane`'s normal.
pub(crate) fn triangulate_loops(
    plane: &Plane,
    outer: &[Vec3],
    holes: &[&[Vec3]],
) -> Result<Vec<Triangle3d>, GeomError> {
    let mut vertices = outer.to_vec();
    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len());
        vertices.extend_from_slice(hole);
    }
    let (u, v) = plane.basis();
    let origin = plane.point();
    let flat: Vec<f64> = vertices
        .iter()
        .flat_map(|p| {
            let d = *p - origin;
            [d.dot(&u), d.dot(&v)]
        })
        .collect();
    let indices =
        earcutr::earcut(&flat, &hole_indices, 2).map_err(|_| GeomError::Triangulation)?;
    if indices.is_empty() {
        return Err(GeomError::Triangulation);
    }
    let normal = plane.normal();
    Ok(indices
        .chunks_exact(3)
        .map(|tri| {
            let (a, b, c) = (vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]);
            let t = Triangle3d::new(a, b, c);
            if t.raw_normal().dot(&normal) < 0.0 {
                Triangle3d::new(a, c, b)
            } else {
                t
            }
        })
        .collect())
}
