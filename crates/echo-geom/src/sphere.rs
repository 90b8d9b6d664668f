// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use echo_math::{MathError, Matrix, Plane, Prng, Tolerance, Vec3};
use tracing::{debug, instrument, trace};

use crate::aabb::Aabb3;
use crate::bounds::Bounded;
use crate::polygon::Circle3d;

/// Solid sphere.
///
/// `radius` and `radius_squared` are kept consistent by the paired setters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    radius_squared: f64,
}

/// Knobs for [`Sphere::minimal_enclosing_with`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnclosingSphereConfig {
    /// Seed for the input shuffle; equal seeds give equal results.
    pub seed: u64,
    /// Containment and degeneracy thresholds.
    pub tolerance: Tolerance,
    /// Re-runs allowed when a point ends up outside before the radius is
    /// simply grown to cover it.
    pub max_repair_passes: usize,
}

impl Default for EnclosingSphereConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            tolerance: Tolerance::default(),
            max_repair_passes: 8,
        }
    }
}

/// Result of cutting a sphere with a plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlaneSlice {
    /// The plane misses the sphere.
    Miss,
    /// The plane touches the sphere at one point.
    Tangent(Vec3),
    /// The plane cuts a disk; a great circle when it passes through the center.
    Circle(Circle3d),
}

const PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
const TRIPLES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

impl Sphere {
    /// Creates a sphere; the radius is stored as its absolute value.
    pub fn new(center: Vec3, radius: f64) -> Self {
        let radius = radius.abs();
        Self {
            center,
            radius,
            radius_squared: radius * radius,
        }
    }

    /// Smallest sphere through two points.
    pub fn from_diameter(a: Vec3, b: Vec3) -> Self {
        Self::new(a.lerp(&b, 0.5), a.distance(&b) * 0.5)
    }

    /// Center point.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Moves the center.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Radius.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Squared radius.
    pub const fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    /// Sets the radius (absolute value) and its square.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.abs();
        self.radius_squared = self.radius * self.radius;
    }

    /// Sets the squared radius (absolute value) and the radius.
    pub fn set_radius_squared(&mut self, radius_squared: f64) {
        self.radius_squared = radius_squared.abs();
        self.radius = self.radius_squared.sqrt();
    }

    /// Cube bounds.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_sphere(self)
    }

    /// Point containment with the default tolerance.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.contains_point_with(p, &Tolerance::default())
    }

    /// Point containment, accepting points up to `tol.linear` outside.
    pub fn contains_point_with(&self, p: Vec3, tol: &Tolerance) -> bool {
        p.distance(&self.center) <= self.radius + tol.linear
    }

    /// Returns `true` if `other` lies entirely inside this sphere.
    pub fn contains_sphere(&self, other: &Self) -> bool {
        self.center.distance(&other.center) + other.radius
            <= self.radius + Tolerance::DEFAULT.linear
    }

    /// Returns `true` if the solids share a point.
    pub fn overlaps_sphere(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(&other.center) <= reach * reach
    }

    /// Moves the sphere by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }

    /// Transforms the sphere, assuming `mat` is a similarity.
    pub fn transform(&mut self, mat: &Matrix) -> Result<(), MathError> {
        let center = mat.transform_point3(self.center)?;
        let rim = mat.transform_point3(self.center + Vec3::UNIT_X * self.radius)?;
        *self = Self::new(center, center.distance(&rim));
        Ok(())
    }

    /// Minimal enclosing sphere with the default configuration.
    ///
    /// Returns `None` for an empty point set.
    ///
    /// # Examples
    /// ```
    /// use echo_geom::Sphere;
    /// use echo_math::Vec3;
    /// let pts = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.5, 0.0)];
    /// let s = Sphere::minimal_enclosing(&pts).unwrap();
    /// assert!((s.radius() - 1.0).abs() < 1e-9);
    /// ```
    pub fn minimal_enclosing(points: &[Vec3]) -> Option<Self> {
        Self::minimal_enclosing_with(points, &EnclosingSphereConfig::default())
    }

    /// Welzl's algorithm (move-to-front form) over a seeded shuffle.
    ///
    /// The support set never exceeds four points, which bounds the recursion
    /// depth. After the pass every point is re-checked; a point left outside
    /// (possible only through rounding) is moved to the front and the pass
    /// repeats, up to `max_repair_passes` times, after which the radius is
    /// grown to cover.
    #[instrument(level = "trace", skip_all, fields(points = points.len(), seed = config.seed))]
    pub fn minimal_enclosing_with(points: &[Vec3], config: &EnclosingSphereConfig) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let tol = &config.tolerance;
        let mut work = points.to_vec();
        Prng::from_seed_u64(config.seed).shuffle(&mut work);
        let n = work.len();
        for pass in 0..config.max_repair_passes {
            let ball = move_to_front(&mut work, n, &[], tol)?;
            match work.iter().position(|p| !ball.contains_point_with(*p, tol)) {
                None => return Some(ball),
                Some(index) => {
                    debug!(pass, index, "enclosing sphere missed a point; repairing");
                    work[..=index].rotate_right(1);
                }
            }
        }
        let ball = move_to_front(&mut work, n, &[], tol)?;
        let radius = work
            .iter()
            .map(|p| p.distance(&ball.center))
            .fold(ball.radius, f64::max);
        if radius > ball.radius {
            debug!(grown_by = radius - ball.radius, "enclosing sphere grown to cover");
        }
        Some(Self::new(ball.center, radius))
    }

    /// Cuts the sphere with `plane`.
    pub fn plane_slice(&self, plane: &Plane) -> PlaneSlice {
        let eps = Tolerance::DEFAULT.linear;
        let d = plane.signed_distance(self.center);
        if d.abs() > self.radius + eps {
            return PlaneSlice::Miss;
        }
        let foot = plane.project_point(self.center);
        if (d.abs() - self.radius).abs() <= eps {
            return PlaneSlice::Tangent(foot);
        }
        let mut slice_plane = *plane;
        slice_plane.set_point(foot);
        let r = (self.radius_squared - d * d).max(0.0).sqrt();
        PlaneSlice::Circle(Circle3d::from_plane(slice_plane, r))
    }

    /// Parameters `t ∈ [0, 1]` where segment `a → b` crosses the surface.
    pub fn segment_intersection_params(&self, a: Vec3, b: Vec3) -> Vec<f64> {
        self.segment_intersection_params_with(a, b, &Tolerance::default())
    }

    /// [`Sphere::segment_intersection_params`] with explicit tolerances.
    ///
    /// Roots of `|a + t (b − a) − c|² = r²` within `tol.linear` (measured
    /// along the segment) of `[0, 1]` are kept and clamped; a tangent root is
    /// reported once.
    pub fn segment_intersection_params_with(
        &self,
        a: Vec3,
        b: Vec3,
        tol: &Tolerance,
    ) -> Vec<f64> {
        let d = b - a;
        let f = a - self.center;
        let qa = d.length_squared();
        if qa <= tol.linear * tol.linear {
            let on_surface = (f.length() - self.radius).abs() <= tol.linear;
            return if on_surface { vec![0.0] } else { Vec::new() };
        }
        let qb = 2.0 * f.dot(&d);
        let qc = f.length_squared() - self.radius_squared;
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return Vec::new();
        }
        let sq = disc.sqrt();
        let t_eps = tol.linear / qa.sqrt();
        let mut out = Vec::with_capacity(2);
        for t in [(-qb - sq) / (2.0 * qa), (-qb + sq) / (2.0 * qa)] {
            if t < -t_eps || t > 1.0 + t_eps {
                continue;
            }
            let t = t.clamp(0.0, 1.0);
            if out.last().is_none_or(|prev: &f64| (t - prev).abs() > t_eps) {
                out.push(t);
            }
        }
        out
    }

    /// Surface points where segment `a → b` crosses the sphere.
    pub fn segment_intersections(&self, a: Vec3, b: Vec3) -> Vec<Vec3> {
        self.segment_intersection_params(a, b)
            .into_iter()
            .map(|t| a.lerp(&b, t))
            .collect()
    }

    /// Returns `true` if any part of segment `a → b` lies in the solid.
    pub fn overlaps_segment(&self, a: Vec3, b: Vec3) -> bool {
        let d = b - a;
        let len2 = d.length_squared();
        let t = if len2 == 0.0 {
            0.0
        } else {
            ((self.center - a).dot(&d) / len2).clamp(0.0, 1.0)
        };
        self.contains_point(a.lerp(&b, t))
    }

    /// Returns `true` if the solid meets the disk.
    pub fn overlaps_circle3d(&self, circle: &Circle3d) -> bool {
        match self.plane_slice(&circle.plane()) {
            PlaneSlice::Miss => false,
            PlaneSlice::Tangent(p) => circle.contains_planar_point(p),
            PlaneSlice::Circle(slice) => {
                slice.center().distance(&circle.center())
                    <= slice.radius() + circle.radius() + Tolerance::DEFAULT.linear
            }
        }
    }
}

impl Bounded for Sphere {
    fn aabb(&self) -> Aabb3 {
        Sphere::aabb(self)
    }
}

/// Move-to-front Welzl step over `points[..end]` with `support` on the boundary.
fn move_to_front(
    points: &mut [Vec3],
    end: usize,
    support: &[Vec3],
    tol: &Tolerance,
) -> Option<Sphere> {
    let mut ball = ball_of(support, tol);
    if support.len() == 4 {
        return ball;
    }
    for i in 0..end {
        let p = points[i];
        if ball.is_some_and(|b| b.contains_point_with(p, tol)) {
            continue;
        }
        let k = support.len();
        let mut next = [Vec3::ZERO; 4];
        next[..k].copy_from_slice(support);
        next[k] = p;
        ball = move_to_front(points, i, &next[..=k], tol);
        points[..=i].rotate_right(1);
    }
    ball
}

/// Smallest sphere containing the (at most four) support points.
fn ball_of(support: &[Vec3], tol: &Tolerance) -> Option<Sphere> {
    match *support {
        [] => None,
        [a] => Some(Sphere::new(a, 0.0)),
        [a, b] => Some(Sphere::from_diameter(a, b)),
        [a, b, c] => Some(ball3(a, b, c, tol)),
        [a, b, c, d, ..] => Some(ball4([a, b, c, d], tol)),
    }
}

/// Smallest sphere containing three points.
///
/// A right or obtuse corner means the opposite edge's diameter sphere
/// already covers the third point; otherwise the circumcircle's sphere is
/// the answer.
fn ball3(a: Vec3, b: Vec3, c: Vec3, tol: &Tolerance) -> Sphere {
    let ab = b - a;
    let ac = c - a;
    let bc = c - b;
    if ab.dot(&ac) <= 0.0 {
        return Sphere::from_diameter(b, c);
    }
    if ab.dot(&bc) >= 0.0 {
        return Sphere::from_diameter(a, c);
    }
    if ac.dot(&bc) <= 0.0 {
        return Sphere::from_diameter(a, b);
    }
    let n = ab.cross(&ac);
    let n2 = n.length_squared();
    if n2 <= tol.singular * ab.length_squared() * ac.length_squared() {
        trace!("collinear support triple; using longest edge");
        return longest_pair(&[a, b, c]);
    }
    let offset = (n.cross(&ab) * ac.length_squared() + ac.cross(&n) * ab.length_squared())
        / (2.0 * n2);
    Sphere::new(a + offset, offset.length())
}

/// Smallest sphere containing four points: the best covering candidate
/// among pair spheres, triple spheres, and the circumsphere.
fn ball4(pts: [Vec3; 4], tol: &Tolerance) -> Sphere {
    let mut candidates: Vec<Sphere> = Vec::with_capacity(PAIRS.len() + TRIPLES.len() + 1);
    candidates.extend(PAIRS.iter().map(|&(i, j)| Sphere::from_diameter(pts[i], pts[j])));
    candidates.extend(TRIPLES.iter().map(|&[i, j, k]| ball3(pts[i], pts[j], pts[k], tol)));
    match circumsphere(pts, tol) {
        Some(s) => candidates.push(s),
        None => trace!("coplanar support; falling back to three-point spheres"),
    }
    let covers = |s: &Sphere| pts.iter().all(|p| s.contains_point_with(*p, tol));
    candidates
        .iter()
        .filter(|s| covers(*s))
        .min_by(|x, y| x.radius.total_cmp(&y.radius))
        .copied()
        .unwrap_or_else(|| {
            let seed = ball3(pts[0], pts[1], pts[2], tol);
            let radius = pts.iter().map(|p| p.distance(&seed.center)).fold(0.0, f64::max);
            Sphere::new(seed.center, radius)
        })
}

/// Sphere through four points, or `None` when they are coplanar.
///
/// With the points translated so the first sits at the origin, the sphere
/// `|p|² = 2 c·p − k` gives the linear system `[x y z 1] · [2c, −k]ᵀ = |p|²`,
/// solved by Cramer's rule.
fn circumsphere(pts: [Vec3; 4], tol: &Tolerance) -> Option<Sphere> {
    let origin = pts[0];
    let rel = pts.map(|p| p - origin);
    let lengths = rel.map(|p| p.length_squared());
    let row = |p: Vec3| [p.x(), p.y(), p.z(), 1.0];
    let det = Matrix::from_rows(&rel.map(row)).determinant().ok()?;
    let scale = lengths.iter().fold(0.0_f64, |m, l| m.max(*l)).sqrt();
    if det.abs() <= tol.singular * scale.powi(3) {
        return None;
    }
    let replaced = |col: usize| {
        let rows: [[f64; 4]; 4] = core::array::from_fn(|i| {
            let mut r = row(rel[i]);
            r[col] = lengths[i];
            r
        });
        Matrix::from_rows(&rows).determinant().ok()
    };
    let center = Vec3::new(replaced(0)?, replaced(1)?, replaced(2)?) / (2.0 * det);
    Some(Sphere::new(origin + center, center.length()))
}

fn longest_pair(pts: &[Vec3]) -> Sphere {
    let mut best = Sphere::new(pts[0], 0.0);
    for (i, a) in pts.iter().enumerate() {
        for b in &pts[i + 1..] {
            let s = Sphere::from_diameter(*a, *b);
            if s.radius > best.radius {
                best = s;
            }
        }
    }
    best
}
