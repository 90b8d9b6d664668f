// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use approx::assert_abs_diff_eq;
use echo_math::{MathError, Plane, Prng, Ray, Side, Vec2, Vec3};

fn tilted() -> Plane {
    Plane::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 1.0, 0.5)).unwrap()
}

#[test]
fn new_normalises_and_rejects_zero_normal() {
    let p = Plane::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)).unwrap();
    assert_eq!(p.normal(), Vec3::UNIT_Z);
    assert_eq!(
        Plane::new(Vec3::ZERO, Vec3::ZERO).unwrap_err(),
        MathError::DegenerateVector
    );
}

#[test]
fn from_points_uses_right_handed_winding() {
    let p = Plane::from_points(Vec3::ZERO, Vec3::UNIT_X, Vec3::UNIT_Y).unwrap();
    assert_eq!(p.normal(), Vec3::UNIT_Z);
    assert!(Plane::from_points(Vec3::ZERO, Vec3::UNIT_X, Vec3::UNIT_X * 2.0).is_err());
}

#[test]
fn classify_respects_tolerance() {
    let p = Plane::horizontal(1.0);
    assert_eq!(p.classify(Vec3::new(0.0, 0.0, 2.0), 1e-6), Side::Front);
    assert_eq!(p.classify(Vec3::new(0.0, 0.0, 0.0), 1e-6), Side::Back);
    assert_eq!(p.classify(Vec3::new(5.0, 5.0, 1.0 + 1e-9), 1e-6), Side::On);
    assert!(p.contains_point(Vec3::new(-3.0, 8.0, 1.0)));
}

#[test]
fn ray_intersection_and_parallel_miss() {
    let p = Plane::XY;
    let hit = Ray::new(Vec3::new(1.0, 1.0, 4.0), Vec3::new(0.0, 0.0, -2.0));
    assert_abs_diff_eq!(p.ray_intersection(&hit).unwrap(), 2.0);
    let parallel = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::UNIT_X);
    assert!(p.ray_intersection(&parallel).is_none());
}

#[test]
fn segment_intersection_is_bounded() {
    let p = Plane::horizontal(0.5);
    let x = p
        .segment_intersection(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 1.0))
        .unwrap();
    assert!(x.approx_eq(&Vec3::new(1.0, 0.0, 0.5), 1e-12));
    assert!(p
        .segment_intersection(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0))
        .is_none());
}

#[test]
fn intersect_plane_line_lies_on_both() {
    let a = Plane::horizontal(2.0);
    let b = Plane::new(Vec3::new(3.0, 0.0, 0.0), Vec3::UNIT_X).unwrap();
    let line = a.intersect_plane(&b).unwrap();
    for t in [-5.0, 0.0, 7.5] {
        let q = line.at(t);
        assert_abs_diff_eq!(a.signed_distance(q), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.signed_distance(q), 0.0, epsilon = 1e-12);
    }
    assert!(a.intersect_plane(&Plane::horizontal(9.0)).is_none());
}

#[test]
fn project_point_lands_on_plane() {
    let p = tilted();
    let q = p.project_point(Vec3::new(10.0, -4.0, 2.0));
    assert_abs_diff_eq!(p.signed_distance(q), 0.0, epsilon = 1e-12);
}

#[test]
fn basis_is_right_handed() {
    let p = tilted();
    let (u, v) = p.basis();
    assert!(u.cross(&v).approx_eq(&p.normal(), 1e-12));
    assert_abs_diff_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
    let (u, v) = Plane::XY.basis();
    assert_eq!((u, v), (Vec3::UNIT_X, Vec3::UNIT_Y));
}

#[test]
fn conversion_matrices_agree_with_basis_helpers() {
    let plane = tilted();
    let (to_2d, from_2d) = plane.conversion_matrices();
    let mut prng = Prng::from_seed_u64(11);
    for _ in 0..32 {
        let uv = Vec2::new(prng.next_f64() * 20.0 - 10.0, prng.next_f64() * 20.0 - 10.0);
        let world = plane.to_3d(uv);
        let back = plane.to_2d(world);
        assert!(back.approx_eq(&uv, 1e-9));

        let via_matrix = to_2d.transform_point3(world).unwrap();
        assert_abs_diff_eq!(via_matrix.x(), uv.x(), epsilon = 1e-9);
        assert_abs_diff_eq!(via_matrix.y(), uv.y(), epsilon = 1e-9);
        assert_abs_diff_eq!(via_matrix.z(), 0.0, epsilon = 1e-9);

        let restored = from_2d
            .transform_point3(Vec3::new(uv.x(), uv.y(), 0.0))
            .unwrap();
        assert!(restored.approx_eq(&world, 1e-9));
    }
}
