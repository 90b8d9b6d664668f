// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use approx::assert_abs_diff_eq;
use echo_math::{clamp, Vec2, Vec3, EPSILON};

#[test]
fn normalize_degenerate_returns_zero() {
    let v = Vec3::new(1e-12, -1e-12, 0.0);
    assert_eq!(v.normalize().to_array(), [0.0, 0.0, 0.0]);
    assert!(v.try_normalize().is_none());
}

#[test]
fn cross_of_parallel_vectors_is_near_zero() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = a * 4.0;
    assert!(a.cross(&b).length() <= EPSILON);
}

#[test]
fn cross_follows_right_hand_rule() {
    assert_eq!(Vec3::UNIT_X.cross(&Vec3::UNIT_Y), Vec3::UNIT_Z);
    assert_eq!(Vec3::UNIT_Y.cross(&Vec3::UNIT_Z), Vec3::UNIT_X);
}

#[test]
fn component_wise_ops_and_operators_agree() {
    let a = Vec3::new(1.0, -2.0, 4.0);
    let b = Vec3::new(0.5, 4.0, -2.0);
    assert_eq!(a.add(&b), a + b);
    assert_eq!(a.sub(&b), a - b);
    assert_eq!(a.mul(&b).to_array(), [0.5, -8.0, -8.0]);
    assert_eq!(a.div(&b).to_array(), [2.0, -0.5, -2.0]);
    assert_eq!((2.0 * a).to_array(), (a * 2.0).to_array());

    let mut acc = a;
    acc += b;
    acc -= b;
    acc *= 3.0;
    assert_eq!(acc, a * 3.0);
}

#[test]
fn distance_and_lerp() {
    let a = Vec3::new(1.0, 1.0, 1.0);
    let b = Vec3::new(4.0, 5.0, 1.0);
    assert_abs_diff_eq!(a.distance(&b), 5.0);
    assert_abs_diff_eq!(a.distance_squared(&b), 25.0);
    assert!(a.lerp(&b, 0.5).approx_eq_default(&Vec3::new(2.5, 3.0, 1.0)));
}

#[test]
fn approx_eq_uses_supplied_epsilon() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(1.0 + 5e-7, 2.0, 3.0);
    assert!(a.approx_eq_default(&b));
    assert!(!a.approx_eq(&b, 1e-9));
}

#[test]
fn any_perpendicular_is_unit_and_orthogonal() {
    let inputs = [
        Vec3::UNIT_X,
        Vec3::UNIT_Y,
        Vec3::UNIT_Z,
        Vec3::new(0.3, -0.7, 0.2),
        Vec3::new(-5.0, 0.1, 0.0),
    ];
    for n in inputs {
        let p = n.any_perpendicular();
        assert_abs_diff_eq!(p.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.dot(&n.normalize()), 0.0, epsilon = 1e-12);
    }
    assert_eq!(Vec3::UNIT_Z.any_perpendicular(), Vec3::UNIT_X);
}

#[test]
fn perp_dot_sign_tracks_winding() {
    let a = Vec2::new(1.0, 0.0);
    let b = Vec2::new(0.0, 1.0);
    assert!(a.perp_dot(&b) > 0.0);
    assert!(b.perp_dot(&a) < 0.0);
}

#[test]
fn clamp_accepts_reversed_bounds() {
    assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
    assert_eq!(clamp(-5.0, 1.0, 0.0), 0.0);
    assert_eq!(clamp(0.25, 1.0, 0.0), 0.25);
}
