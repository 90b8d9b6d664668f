// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Math kernel for Echo geometry.

This crate provides:
- 2D/3D vectors (`Vec2`, `Vec3`) and parametric rays (`Ray`).
- A row-major dense `Matrix` with general and fixed-size multiply kernels,
  memoised cofactor determinant/inverse, and canonical transform builders.
- Oriented planes (`Plane`) with projection, intersection, and 2D basis
  conversion.
- A seedable `Prng` so randomized algorithms stay reproducible.
- `Tolerance`, the epsilon configuration shared by every float comparison.

Design notes:
- Computation only: no I/O, no threads, no global state.
- `f64` throughout; every approximate comparison goes through a tolerance.
- Hard failures (dimension mismatch, singular matrix, degenerate direction)
  are returned as `MathError`; geometric misses are `Option`/`bool`.
"]

mod error;
mod matrix;
mod plane;
mod prng;
mod ray;
mod tolerance;
mod vec2;
mod vec3;

pub use error::MathError;
pub use matrix::{LookAt, Matrix};
pub use plane::{Plane, Side};
pub use prng::Prng;
pub use ray::Ray;
pub use tolerance::{Tolerance, EPSILON};
pub use vec2::Vec2;
pub use vec3::Vec3;

/// Clamps `value` to the inclusive `[min, max]` range.
///
/// Bounds are swapped when given in reverse so the call never panics.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}

/// Returns `true` when `a` and `b` differ by at most `eps`.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
