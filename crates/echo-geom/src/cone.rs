// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::f64::consts::FRAC_PI_2;

use echo_math::{MathError, Matrix, Tolerance, Vec3};

use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::error::GeomError;
use crate::polygon::Circle3d;

/// Finite right circular cone.
///
/// The apex sits at `origin`; the solid extends `height` along the unit
/// `direction` to a base disk of `radius`. `cos_theta_squared` caches
/// `h² / (h² + r²)` for the half-angle `θ` and is refreshed by every setter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cone {
    origin: Vec3,
    direction: Vec3,
    height: f64,
    radius: f64,
    cos_theta_squared: f64,
}

impl Cone {
    /// Creates a cone from apex, axis direction, height and base radius.
    ///
    /// # Errors
    /// - [`MathError::DegenerateVector`] for a zero direction.
    /// - [`GeomError::InvalidShape`] for a non-positive height or a negative
    ///   or non-finite radius.
    pub fn new(origin: Vec3, direction: Vec3, height: f64, radius: f64) -> Result<Self, GeomError> {
        let direction = direction.try_normalize().ok_or(MathError::DegenerateVector)?;
        check_height(height)?;
        check_radius(radius)?;
        Ok(Self {
            origin,
            direction,
            height,
            radius,
            cos_theta_squared: cos_squared(height, radius),
        })
    }

    /// Creates a cone from a half-angle in `[0, π/2)`.
    pub fn from_angle(
        origin: Vec3,
        direction: Vec3,
        height: f64,
        half_angle: f64,
    ) -> Result<Self, GeomError> {
        if !(0.0..FRAC_PI_2).contains(&half_angle) {
            return Err(GeomError::InvalidShape {
                reason: "cone half-angle must lie in [0, π/2)",
            });
        }
        Self::new(origin, direction, height, height * half_angle.tan())
    }

    /// Apex.
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Moves the apex.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Unit axis from apex to base.
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Re-aims the axis; the direction is normalized.
    pub fn set_direction(&mut self, direction: Vec3) -> Result<(), GeomError> {
        self.direction = direction.try_normalize().ok_or(MathError::DegenerateVector)?;
        Ok(())
    }

    /// Apex-to-base distance.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Sets the height and refreshes `cos²θ`.
    pub fn set_height(&mut self, height: f64) -> Result<(), GeomError> {
        check_height(height)?;
        self.height = height;
        self.cos_theta_squared = cos_squared(self.height, self.radius);
        Ok(())
    }

    /// Base radius.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Sets the base radius and refreshes `cos²θ`.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeomError> {
        check_radius(radius)?;
        self.radius = radius;
        self.cos_theta_squared = cos_squared(self.height, self.radius);
        Ok(())
    }

    /// `cos²θ` of the half-angle.
    pub const fn cos_theta_squared(&self) -> f64 {
        self.cos_theta_squared
    }

    /// Half-angle in radians.
    pub fn half_angle(&self) -> f64 {
        self.radius.atan2(self.height)
    }

    /// Center of the base disk.
    pub fn base_center(&self) -> Vec3 {
        self.origin + self.direction * self.height
    }

    /// Base disk, facing away from the apex.
    pub fn base_circle(&self) -> Result<Circle3d, GeomError> {
        Circle3d::new(self.base_center(), self.direction, self.radius)
    }

    /// Cross-section radius at axial height `h`, clamped to `[0, height]`.
    pub fn radius_at(&self, h: f64) -> f64 {
        self.radius * (h / self.height).clamp(0.0, 1.0)
    }

    /// Solid containment, boundary inclusive.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let eps = Tolerance::DEFAULT.linear;
        let v = p - self.origin;
        let h = v.dot(&self.direction);
        if h < -eps || h > self.height + eps {
            return false;
        }
        let perp2 = (v.length_squared() - h * h).max(0.0);
        let r = self.radius_at(h) + eps;
        perp2 <= r * r
    }

    /// Parameters `t ∈ [0, 1]` where segment `a → b` crosses the lateral
    /// surface between apex and base, ascending.
    ///
    /// Solves `((p − o)·v)² = cos²θ |p − o|²` for `p = a + t (b − a)` and
    /// discards roots on the mirrored nappe or beyond the base.
    pub fn segment_intersection_params(&self, a: Vec3, b: Vec3) -> Vec<f64> {
        let tol = Tolerance::default();
        let v = self.direction;
        let c = self.cos_theta_squared;
        let co = a - self.origin;
        let d = b - a;
        let dd = d.length_squared();
        if dd <= tol.linear * tol.linear {
            return Vec::new();
        }
        let dv = d.dot(&v);
        let cov = co.dot(&v);
        let qa = dv * dv - c * dd;
        let qb = 2.0 * (dv * cov - c * d.dot(&co));
        let qc = cov * cov - c * co.length_squared();

        let mut roots = Vec::with_capacity(2);
        if qa.abs() <= tol.parallel * dd {
            // Segment parallel to a generator: one crossing at most.
            if qb.abs() > tol.singular {
                roots.push(-qc / qb);
            }
        } else {
            let disc = qb * qb - 4.0 * qa * qc;
            if disc < 0.0 {
                return Vec::new();
            }
            let sq = disc.sqrt();
            roots.push((-qb - sq) / (2.0 * qa));
            roots.push((-qb + sq) / (2.0 * qa));
        }

        let t_eps = tol.linear / dd.sqrt();
        let mut out: Vec<f64> = roots
            .into_iter()
            .filter(|t| (-t_eps..=1.0 + t_eps).contains(t))
            .filter(|t| {
                let h = cov + dv * t;
                (-tol.linear..=self.height + tol.linear).contains(&h)
            })
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        out.sort_by(f64::total_cmp);
        out.dedup_by(|x, y| (*x - *y).abs() <= t_eps);
        out
    }

    /// Lateral-surface crossing points of segment `a → b`.
    pub fn segment_intersections(&self, a: Vec3, b: Vec3) -> Vec<Vec3> {
        self.segment_intersection_params(a, b)
            .into_iter()
            .map(|t| a.lerp(&b, t))
            .collect()
    }

    /// Returns `true` if segment `a → b` crosses the lateral surface.
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        !self.segment_intersection_params(a, b).is_empty()
    }

    /// Returns `true` if any part of segment `a → b` lies in the solid.
    pub fn overlaps_segment(&self, a: Vec3, b: Vec3) -> bool {
        self.contains_point(a) || self.contains_point(b) || self.intersects_segment(a, b)
    }

    /// Exact bounds: base disk plus apex.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_cone(self)
    }

    /// Moves the cone by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.origin += offset;
    }

    /// Transforms the cone, assuming `mat` is a similarity.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), GeomError> {
        let apex = mat.transform_point3(self.origin)?;
        let base = mat.transform_point3(self.base_center())?;
        let scale = apex.distance(&base) / self.height;
        *self = Self::new(apex, base - apex, apex.distance(&base), self.radius * scale)?;
        Ok(())
    }
}

impl Bounded for Cone {
    fn aabb(&self) -> Aabb3 {
        Cone::aabb(self)
    }
}

fn cos_squared(height: f64, radius: f64) -> f64 {
    let h2 = height * height;
    h2 / (h2 + radius * radius)
}

fn check_height(height: f64) -> Result<(), GeomError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(GeomError::InvalidShape {
            reason: "cone height must be finite and positive",
        })
    }
}

fn check_radius(radius: f64) -> Result<(), GeomError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(GeomError::InvalidShape {
            reason: "cone radius must be finite and non-negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cone() -> Cone {
        Cone::new(Vec3::ZERO, Vec3::UNIT_Z, 1.0, 1.0).unwrap()
    }

    #[test]
    fn setters_refresh_cached_angle() {
        let mut cone = unit_cone();
        assert!((cone.cos_theta_squared() - 0.5).abs() < 1e-12);
        cone.set_radius(0.0).unwrap();
        assert!((cone.cos_theta_squared() - 1.0).abs() < 1e-12);
        cone.set_height(2.0).unwrap();
        cone.set_radius(2.0).unwrap();
        assert!((cone.cos_theta_squared() - 0.5).abs() < 1e-12);
        assert!(cone.set_height(0.0).is_err());
        assert!(cone.set_radius(-1.0).is_err());
    }

    #[test]
    fn from_angle_matches_radius() {
        let cone = Cone::from_angle(Vec3::ZERO, Vec3::UNIT_Z, 2.0, FRAC_PI_2 / 2.0).unwrap();
        assert!((cone.radius() - 2.0).abs() < 1e-12);
        assert!(Cone::from_angle(Vec3::ZERO, Vec3::UNIT_Z, 1.0, FRAC_PI_2).is_err());
    }

    #[test]
    fn mirrored_nappe_is_ignored() {
        let cone = unit_cone();
        // Crosses the reflected cone below the apex only.
        let a = Vec3::new(-2.0, 0.0, -0.5);
        let b = Vec3::new(2.0, 0.0, -0.5);
        assert!(cone.segment_intersection_params(a, b).is_empty());
    }
}
