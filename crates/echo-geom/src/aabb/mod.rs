// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

mod aabb2;
mod aabb3;
mod overlap;

pub use aabb2::Aabb2;
pub use aabb3::Aabb3;

use echo_math::Tolerance;

/// Slab clip of the segment `a → b` against the box `[min, max]`.
///
/// Returns the parameter interval `(t0, t1) ⊆ [0, 1]` inside the box. An axis
/// the segment is parallel to rejects immediately when `a` lies outside that
/// slab.
pub(crate) fn slab_interval<const N: usize>(
    a: [f64; N],
    b: [f64; N],
    min: [f64; N],
    max: [f64; N],
) -> Option<(f64, f64)> {
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for axis in 0..N {
        let d = b[axis] - a[axis];
        if d.abs() <= Tolerance::DEFAULT.parallel {
            if a[axis] < min[axis] || a[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut near = (min[axis] - a[axis]) * inv;
        let mut far = (max[axis] - a[axis]) * inv;
        if near > far {
            core::mem::swap(&mut near, &mut far);
        }
        t0 = t0.max(near);
        t1 = t1.min(far);
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}
