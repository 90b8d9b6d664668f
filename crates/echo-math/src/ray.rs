// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::vec3::Vec3;

/// Parametric ray `origin + direction * t`.
///
/// `direction` is not normalised; `t` is measured in multiples of it, so a
/// ray built from a segment `a → b` has `t = 1` at `b`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    /// Start point (`t = 0`).
    pub origin: Vec3,
    /// Direction (`t = 1` is `origin + direction`).
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray from an origin and direction.
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray through the segment `a → b` (`t = 0` at `a`, `t = 1` at `b`).
    pub fn from_segment(a: Vec3, b: Vec3) -> Self {
        Self::new(a, b - a)
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
