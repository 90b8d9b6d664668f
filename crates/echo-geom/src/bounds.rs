// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::aabb::Aabb3;

/// Shapes that can report a world-space bounding box.
pub trait Bounded {
    /// Axis-aligned bounds of the shape.
    fn aabb(&self) -> Aabb3;
}

impl Bounded for Aabb3 {
    fn aabb(&self) -> Aabb3 {
        *self
    }
}
