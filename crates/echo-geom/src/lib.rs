// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry kernel for Echo.

This crate provides:
- Axis-aligned bounding boxes (`Aabb2`, `Aabb3`) with overlap tests against
  points, segments, spheres, disks, cones and convex polygons (SAT).
- The planar polygon family (`Polygon3d`, `Triangle3d`, `Quad3d`,
  `Ellipse3d`, `Circle3d`, `Polygons3d`) and the closed `Shape` union.
- Minimal enclosing spheres (`Sphere::minimal_enclosing`) and sphere
  segment/plane algebra.
- Finite right circular cones (`Cone`).

Design notes:
- Deterministic: randomized construction is driven by a seeded `Prng`.
- `f64` throughout; tolerances come from `echo_math::Tolerance`.
- Misses are values (`bool`, `Option`, empty `Vec`); malformed input is a
  `GeomError`.
"]

mod aabb;
mod bounds;
mod cone;
mod error;
pub mod polygon;
mod sphere;

pub use aabb::{Aabb2, Aabb3};
pub use bounds::Bounded;
pub use cone::Cone;
pub use error::GeomError;
pub use polygon::{Circle3d, Ellipse3d, Polygon3d, Polygons3d, Quad3d, Shape, Triangle3d};
pub use sphere::{EnclosingSphereConfig, PlaneSlice, Sphere};
