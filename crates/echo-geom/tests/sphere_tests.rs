// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Integration tests for spheres and minimal enclosing spheres.

use approx::assert_abs_diff_eq;
use echo_geom::{Circle3d, EnclosingSphereConfig, PlaneSlice, Sphere};
use echo_math::{Matrix, Plane, Vec3};
use proptest::prelude::*;

/// Smallest candidate sphere (pair, triple or quadruple boundary) that
/// covers every point. Quartic in the input; fine for a handful of points.
fn brute_force_meb(points: &[Vec3]) -> Sphere {
    let mut candidates = vec![Sphere::new(points[0], 0.0)];
    let n = points.len();
    for i in 0..n {
        for j in i + 1..n {
            candidates.push(Sphere::from_diameter(points[i], points[j]));
            for k in j + 1..n {
                if let Some(s) = circumcircle(points[i], points[j], points[k]) {
                    candidates.push(s);
                }
                for l in k + 1..n {
                    if let Some(s) = circumsphere(points[i], points[j], points[k], points[l]) {
                        candidates.push(s);
                    }
                }
            }
        }
    }
    candidates
        .into_iter()
        .filter(|s| points.iter().all(|p| p.distance(&s.center()) <= s.radius() + 1e-7))
        .min_by(|a, b| a.radius().total_cmp(&b.radius()))
        .unwrap()
}

fn circumcircle(a: Vec3, b: Vec3, c: Vec3) -> Option<Sphere> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let n2 = n.length_squared();
    if n2 < 1e-12 {
        return None;
    }
    let offset = (n.cross(&ab) * ac.length_squared() + ac.cross(&n) * ab.length_squared())
        / (2.0 * n2);
    Some(Sphere::new(a + offset, offset.length()))
}

fn circumsphere(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Option<Sphere> {
    let rows: Vec<Vec3> = [b, c, d].iter().map(|p| *p - a).collect();
    let lhs = Matrix::from_rows(&[
        rows[0].to_array(),
        rows[1].to_array(),
        rows[2].to_array(),
    ]);
    let inverse = lhs.invert().ok()?;
    let rhs = Matrix::new(3, 1, rows.iter().map(|r| 0.5 * r.length_squared()).collect()).unwrap();
    let x = inverse.multiply(&rhs).unwrap();
    let offset = Vec3::new(x.get(0, 0)?, x.get(1, 0)?, x.get(2, 0)?);
    Some(Sphere::new(a + offset, offset.length()))
}

fn arb_cloud(max: usize) -> impl Strategy<Value = Vec<Vec3>> {
    prop::collection::vec(
        prop::array::uniform3(-20.0..20.0_f64).prop_map(Vec3::from),
        1..=max,
    )
}

#[test]
fn empty_and_single_point() {
    assert!(Sphere::minimal_enclosing(&[]).is_none());
    let p = Vec3::new(1.0, 2.0, 3.0);
    let s = Sphere::minimal_enclosing(&[p]).unwrap();
    assert_eq!(s.center(), p);
    assert_eq!(s.radius(), 0.0);
}

#[test]
fn duplicate_and_collinear_points() {
    let pts = [
        Vec3::ZERO,
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
    ];
    let s = Sphere::minimal_enclosing(&pts).unwrap();
    assert!(s.center().approx_eq(&Vec3::new(1.5, 0.0, 0.0), 1e-12));
    assert_abs_diff_eq!(s.radius(), 1.5, epsilon = 1e-12);
}

#[test]
fn cube_corners_give_circumscribed_sphere() {
    let pts: Vec<Vec3> = (0..8)
        .map(|i| {
            let bit = |k: u32| if i & (1 << k) == 0 { -1.0 } else { 1.0 };
            Vec3::new(bit(0), bit(1), bit(2))
        })
        .collect();
    let s = Sphere::minimal_enclosing(&pts).unwrap();
    assert!(s.center().approx_eq(&Vec3::ZERO, 1e-9));
    assert_abs_diff_eq!(s.radius(), 3.0_f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn seed_controls_shuffle_not_result() {
    let pts: Vec<Vec3> = (0..40)
        .map(|i| {
            let f = f64::from(i);
            Vec3::new((f * 0.7).sin() * 5.0, (f * 1.3).cos() * 3.0, f * 0.1)
        })
        .collect();
    let a = Sphere::minimal_enclosing_with(&pts, &EnclosingSphereConfig::default()).unwrap();
    let again = Sphere::minimal_enclosing_with(&pts, &EnclosingSphereConfig::default()).unwrap();
    assert_eq!(a, again);
    let other = EnclosingSphereConfig {
        seed: 99,
        ..EnclosingSphereConfig::default()
    };
    let b = Sphere::minimal_enclosing_with(&pts, &other).unwrap();
    assert_abs_diff_eq!(a.radius(), b.radius(), epsilon = 1e-9);
    assert!(a.center().approx_eq(&b.center(), 1e-6));
}

#[test]
fn radius_setters_stay_consistent() {
    let mut s = Sphere::new(Vec3::ZERO, -2.0);
    assert_eq!(s.radius(), 2.0);
    assert_eq!(s.radius_squared(), 4.0);
    s.set_radius_squared(9.0);
    assert_eq!(s.radius(), 3.0);
    s.set_radius(0.5);
    assert_eq!(s.radius_squared(), 0.25);
}

#[test]
fn plane_slice_cases() {
    let s = Sphere::new(Vec3::ZERO, 2.0);
    assert_eq!(s.plane_slice(&Plane::horizontal(3.0)), PlaneSlice::Miss);
    match s.plane_slice(&Plane::horizontal(2.0)) {
        PlaneSlice::Tangent(p) => assert!(p.approx_eq(&Vec3::new(0.0, 0.0, 2.0), 1e-12)),
        other => panic!("expected tangent, got {other:?}"),
    }
    match s.plane_slice(&Plane::horizontal(0.0)) {
        PlaneSlice::Circle(c) => assert_abs_diff_eq!(c.radius(), 2.0, epsilon = 1e-12),
        other => panic!("expected great circle, got {other:?}"),
    }
    match s.plane_slice(&Plane::horizontal(1.0)) {
        PlaneSlice::Circle(c) => {
            assert_abs_diff_eq!(c.radius(), 3.0_f64.sqrt(), epsilon = 1e-12);
            assert!(c.center().approx_eq(&Vec3::new(0.0, 0.0, 1.0), 1e-12));
            assert_eq!(c.normal(), Vec3::UNIT_Z);
        }
        other => panic!("expected circle, got {other:?}"),
    }
}

#[test]
fn segment_crossings() {
    let s = Sphere::new(Vec3::ZERO, 1.0);
    let through =
        s.segment_intersection_params(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(through.len(), 2);
    assert_abs_diff_eq!(through[0], 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(through[1], 0.75, epsilon = 1e-12);

    let tangent = s.segment_intersections(Vec3::new(-2.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0));
    assert_eq!(tangent.len(), 1);
    assert!(tangent[0].approx_eq(&Vec3::new(0.0, 1.0, 0.0), 1e-9));

    let inside_a = Vec3::new(-0.2, 0.0, 0.0);
    let inside_b = Vec3::new(0.2, 0.1, 0.0);
    assert!(s.segment_intersection_params(inside_a, inside_b).is_empty());
    assert!(s.overlaps_segment(inside_a, inside_b));

    let exits = s.segment_intersection_params(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
    assert_eq!(exits.len(), 1);
    assert_abs_diff_eq!(exits[0], 0.25, epsilon = 1e-12);
    assert!(!s.overlaps_segment(Vec3::new(2.0, 2.0, 0.0), Vec3::new(2.0, -2.0, 0.0)));
}

#[test]
fn sphere_relations() {
    let big = Sphere::new(Vec3::ZERO, 3.0);
    let small = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.5);
    assert!(big.contains_sphere(&small));
    assert!(!small.contains_sphere(&big));
    assert!(big.overlaps_sphere(&Sphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0)));
    assert!(!big.overlaps_sphere(&Sphere::new(Vec3::new(4.1, 0.0, 0.0), 1.0)));

    let disk = Circle3d::new(Vec3::new(3.5, 0.0, 1.0), Vec3::UNIT_Z, 1.0).unwrap();
    assert!(big.overlaps_circle3d(&disk));
    let far_disk = Circle3d::new(Vec3::new(6.0, 0.0, 1.0), Vec3::UNIT_Z, 1.0).unwrap();
    assert!(!big.overlaps_circle3d(&far_disk));
    let above = Circle3d::new(Vec3::new(0.0, 0.0, 3.5), Vec3::UNIT_Z, 10.0).unwrap();
    assert!(!big.overlaps_circle3d(&above));
}

#[test]
fn transform_assumes_similarity() {
    let mut s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
    let m = Matrix::translation(0.0, 2.0, 0.0)
        .multiply(&Matrix::scale(2.0, 2.0, 2.0))
        .unwrap();
    s.transform(&m).unwrap();
    assert!(s.center().approx_eq(&Vec3::new(2.0, 2.0, 0.0), 1e-12));
    assert_abs_diff_eq!(s.radius(), 2.0, epsilon = 1e-12);
}

proptest! {
    #[test]
    fn enclosing_sphere_contains_every_point(points in arb_cloud(64), seed in any::<u64>()) {
        let config = EnclosingSphereConfig { seed, ..EnclosingSphereConfig::default() };
        let s = Sphere::minimal_enclosing_with(&points, &config).unwrap();
        for p in &points {
            prop_assert!(p.distance(&s.center()) <= s.radius() + 1e-6);
        }
    }

    #[test]
    fn enclosing_sphere_is_minimal(points in arb_cloud(7)) {
        let s = Sphere::minimal_enclosing(&points).unwrap();
        let reference = brute_force_meb(&points);
        prop_assert!((s.radius() - reference.radius()).abs() <= 1e-5,
            "welzl {} vs brute force {}", s.radius(), reference.radius());
    }
}
