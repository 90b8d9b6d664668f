// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use core::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use approx::assert_abs_diff_eq;
use echo_math::{MathError, Matrix, Vec2, Vec3};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn approx_eq_slices(a: &[f64], b: &[f64], eps: f64) {
    assert_eq!(a.len(), b.len());
    for i in 0..a.len() {
        assert!((a[i] - b[i]).abs() <= eps, "index {i}: {a:?} vs {b:?}");
    }
}

fn matrix4(values: Vec<f64>) -> Matrix {
    Matrix::new(4, 4, values).unwrap()
}

#[test]
fn new_rejects_wrong_buffer_length() {
    let err = Matrix::new(2, 3, vec![0.0; 5]).unwrap_err();
    assert!(matches!(err, MathError::DimensionMismatch { .. }));
}

#[test]
fn multiply_rejects_incompatible_shapes() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);
    let err = a.multiply(&b).unwrap_err();
    assert_eq!(
        err,
        MathError::DimensionMismatch {
            op: "multiply",
            left: (2, 3),
            right: (2, 3),
        }
    );
    assert!(Matrix::identity(3).multiply4x4(&Matrix::identity(4)).is_err());
}

#[test]
fn multiply_handles_rectangular_operands() {
    let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let b = Matrix::from_rows(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
    let c = a.multiply(&b).unwrap();
    assert_eq!(c.shape(), (2, 2));
    assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn small_kernels_match_general_path() {
    let a2 = Matrix::from_rows(&[[1.5, -2.0], [0.25, 3.0]]);
    let b2 = Matrix::from_rows(&[[4.0, 1.0], [-1.0, 0.5]]);
    assert_eq!(a2.multiply2x2(&b2).unwrap(), a2.multiply(&b2).unwrap());

    let a3 = Matrix::from_rows(&[[1.0, 2.0, 3.0], [0.1, 0.2, 0.3], [-4.0, 5.0, -6.0]]);
    let b3 = Matrix::from_rows(&[[0.3, 0.0, 1.0], [2.0, -1.0, 0.5], [1.0, 1.0, 1.0]]);
    assert_eq!(a3.multiply3x3(&b3).unwrap(), a3.multiply(&b3).unwrap());
}

#[test]
fn determinant_of_known_matrices() {
    assert_abs_diff_eq!(Matrix::identity(4).determinant().unwrap(), 1.0);
    let m = Matrix::from_rows(&[[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 1.0]]);
    // 2(3-2) - 0 + 1(1-3) = 0
    assert_abs_diff_eq!(m.determinant().unwrap(), 0.0, epsilon = EPS);
    let s = Matrix::scale(2.0, 3.0, 4.0);
    assert_abs_diff_eq!(s.determinant().unwrap(), 24.0, epsilon = EPS);
}

#[test]
fn determinant_requires_square() {
    let err = Matrix::zeros(2, 3).determinant().unwrap_err();
    assert_eq!(err, MathError::NotSquare { rows: 2, cols: 3 });
}

#[test]
fn invert_singular_matrix_errors() {
    let m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
    assert!(matches!(m.invert(), Err(MathError::Singular { .. })));
}

#[test]
fn invert_translation_is_negated_translation() {
    let t = Matrix::translation(1.0, -2.0, 3.5);
    let inv = t.invert().unwrap();
    approx_eq_slices(inv.as_slice(), Matrix::translation(-1.0, 2.0, -3.5).as_slice(), EPS);
}

#[test]
fn rotation_angle_axis_matches_rotation_z() {
    let a = Matrix::rotation_angle_axis(FRAC_PI_3, Vec3::new(0.0, 0.0, 5.0));
    let b = Matrix::rotation_z(FRAC_PI_3);
    approx_eq_slices(a.as_slice(), b.as_slice(), 1e-12);
    assert_eq!(
        Matrix::rotation_angle_axis(1.0, Vec3::ZERO),
        Matrix::identity(4)
    );
}

#[test]
fn rotation_xyz_applies_x_then_y_then_z() {
    let (x, y, z) = (FRAC_PI_4, FRAC_PI_3, FRAC_PI_2);
    let combined = Matrix::rotation_xyz(x, y, z);
    let p = Vec3::new(0.3, -1.2, 2.0);
    let stepwise = Matrix::rotation_z(z)
        .transform_point3(
            Matrix::rotation_y(y)
                .transform_point3(Matrix::rotation_x(x).transform_point3(p).unwrap())
                .unwrap(),
        )
        .unwrap();
    assert!(combined.transform_point3(p).unwrap().approx_eq(&stepwise, 1e-12));
}

#[test]
fn perspective_matches_symmetric_frustum() {
    let (fov, aspect, near, far) = (FRAC_PI_3, 16.0 / 9.0, 0.1, 100.0);
    let top = near * (fov / 2.0).tan();
    let right = top * aspect;
    let expected = Matrix::frustum(-right, right, -top, top, near, far);
    approx_eq_slices(
        Matrix::perspective(fov, aspect, near, far).as_slice(),
        expected.as_slice(),
        1e-12,
    );
}

#[test]
fn transform_point3_applies_perspective_divide() {
    let proj = Matrix::perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
    // A point on the near plane maps to NDC z = -1.
    let p = proj.transform_point3(Vec3::new(0.5, 0.5, -1.0)).unwrap();
    assert!(p.approx_eq(&Vec3::new(0.5, 0.5, -1.0), 1e-12));
    // A point on the eye plane has w = 0.
    let err = proj.transform_point3(Vec3::new(1.0, 1.0, 0.0)).unwrap_err();
    assert!(matches!(err, MathError::PointAtInfinity { .. }));
}

#[test]
fn transform_helpers_reject_wrong_shapes() {
    let m3 = Matrix::identity(3);
    assert!(m3.transform_point3(Vec3::ZERO).is_err());
    assert!(Matrix::identity(4).transform_point2(Vec2::ZERO).is_err());
    let p = Matrix::translation2d(2.0, 3.0)
        .transform_point2(Vec2::new(1.0, 1.0))
        .unwrap();
    assert!(p.approx_eq(&Vec2::new(3.0, 4.0), 1e-12));
}

#[test]
fn transform_direction_ignores_translation() {
    let m = Matrix::translation(5.0, 6.0, 7.0);
    let d = m.transform_direction3(Vec3::UNIT_X).unwrap();
    assert_eq!(d, Vec3::UNIT_X);
}

#[test]
fn look_at_builds_inverse_pair() {
    let eye = Vec3::new(3.0, 4.0, 5.0);
    let la = Matrix::look_at(eye, Vec3::ZERO, Vec3::UNIT_Z).unwrap();
    let product = la.view.multiply(&la.inverse).unwrap();
    assert!(product.approx_eq(&Matrix::identity(4), 1e-12));
    // The eye maps to the view-space origin, the target onto -Z.
    let at_eye = la.view.transform_point3(eye).unwrap();
    assert!(at_eye.approx_eq(&Vec3::ZERO, 1e-12));
    let at_target = la.view.transform_point3(Vec3::ZERO).unwrap();
    assert_abs_diff_eq!(at_target.x(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(at_target.y(), 0.0, epsilon = 1e-12);
    assert!(at_target.z() < 0.0);
}

#[test]
fn look_at_vertical_forward_yields_orthonormal_basis() {
    let la = Matrix::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::UNIT_Z).unwrap();
    for v in [la.forward, la.right, la.up] {
        assert!(v.is_finite());
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(la.forward.dot(&la.right), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(la.forward.dot(&la.up), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(la.right.dot(&la.up), 0.0, epsilon = 1e-12);
}

#[test]
fn look_at_rejects_coincident_eye_and_target() {
    let err = Matrix::look_at(Vec3::UNIT_X, Vec3::UNIT_X, Vec3::UNIT_Z).unwrap_err();
    assert_eq!(err, MathError::DegenerateVector);
}

fn finite_entry() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

proptest! {
    #[test]
    fn multiply4x4_is_bit_identical_to_general(
        a in prop::collection::vec(finite_entry(), 16),
        b in prop::collection::vec(finite_entry(), 16),
    ) {
        let a = matrix4(a);
        let b = matrix4(b);
        prop_assert_eq!(a.multiply4x4(&b).unwrap(), a.multiply(&b).unwrap());
    }

    #[test]
    fn invert_round_trips_to_identity(
        angles in prop::array::uniform3(-3.0f64..3.0),
        scale in prop::array::uniform3(0.5f64..4.0),
        offset in prop::array::uniform3(-50.0f64..50.0),
    ) {
        let m = Matrix::translation(offset[0], offset[1], offset[2])
            .multiply(&Matrix::rotation_xyz(angles[0], angles[1], angles[2]))
            .unwrap()
            .multiply(&Matrix::scale(scale[0], scale[1], scale[2]))
            .unwrap();
        let inv = m.invert().unwrap();
        let id = m.multiply(&inv).unwrap();
        prop_assert!(id.approx_eq(&Matrix::identity(4), 1e-9), "{id:?}");
    }

    #[test]
    fn transpose_of_product_reverses_order(
        a in prop::collection::vec(finite_entry(), 9),
        b in prop::collection::vec(finite_entry(), 9),
    ) {
        let a = Matrix::new(3, 3, a).unwrap();
        let b = Matrix::new(3, 3, b).unwrap();
        let lhs = a.multiply(&b).unwrap().transpose();
        let rhs = b.transpose().multiply(&a.transpose()).unwrap();
        prop_assert!(lhs.approx_eq(&rhs, 1e-9));
    }
}
