// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::MathError;
use crate::tolerance::{Tolerance, EPSILON};
use crate::vec2::Vec2;
use crate::vec3::Vec3;

/// Row-major dense matrix over a flat `f64` buffer.
///
/// - Invariant: `values.len() == rows * cols`.
/// - Transform builders use the column-vector convention: a point is the
///   column `[x, y, z, 1]ᵀ` on the right (`p' = M · p`), translation lives in
///   the last column, and `A.multiply(&B)` applies `B` first.
///
/// # Examples
/// ```
/// use echo_math::{Matrix, Vec3};
/// let t = Matrix::translation(5.0, -3.0, 2.0);
/// let p = t.transform_point3(Vec3::new(2.0, 4.0, -1.0)).unwrap();
/// assert_eq!(p.to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

/// View matrix pair and camera basis produced by [`Matrix::look_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct LookAt {
    /// World-to-camera transform (camera looks down its local −Z).
    pub view: Matrix,
    /// Camera-to-world transform (inverse of `view`).
    pub inverse: Matrix,
    /// Unit direction from eye to target.
    pub forward: Vec3,
    /// Unit camera right axis.
    pub right: Vec3,
    /// Unit camera up axis, orthogonal to `forward` and `right`.
    pub up: Vec3,
}

type MinorMemo = FxHashMap<(u64, u64), f64>;

impl Matrix {
    /// Creates a matrix from a row-major buffer.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, MathError> {
        if values.len() != rows * cols {
            return Err(MathError::DimensionMismatch {
                op: "new",
                left: (rows, cols),
                right: (values.len(), 1),
            });
        }
        Ok(Self { values, rows, cols })
    }

    /// Creates a matrix from fixed-width rows.
    pub fn from_rows<const C: usize>(rows: &[[f64; C]]) -> Self {
        Self {
            values: rows.iter().flatten().copied().collect(),
            rows: rows.len(),
            cols: C,
        }
    }

    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.values[i * n + i] = 1.0;
        }
        m
    }

    /// Row count.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns `true` for square matrices.
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major backing values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Element at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.at(row, col))
    }

    /// Writes the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MathError> {
        if row >= self.rows || col >= self.cols {
            return Err(MathError::DimensionMismatch {
                op: "set",
                left: self.shape(),
                right: (row, col),
            });
        }
        self.values[row * self.cols + col] = value;
        Ok(())
    }

    /// Slice view of one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.values[row * self.cols..(row + 1) * self.cols])
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.values[c * self.rows + r] = self.at(r, c);
            }
        }
        out
    }

    /// Returns `true` when shapes match and every element differs by at most `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.shape() == other.shape()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// General product `self · rhs`.
    ///
    /// Requires `self.cols == rhs.rows`.
    pub fn multiply(&self, rhs: &Self) -> Result<Self, MathError> {
        if self.cols != rhs.rows {
            return Err(MathError::DimensionMismatch {
                op: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for row in 0..self.rows {
            for col in 0..rhs.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out.values[row * rhs.cols + col] = sum;
            }
        }
        Ok(out)
    }

    /// 2×2 product kernel; same summation order as [`Matrix::multiply`].
    pub fn multiply2x2(&self, rhs: &Self) -> Result<Self, MathError> {
        Self::require_pair("multiply2x2", 2, self, rhs)?;
        let a = &self.values;
        let b = &rhs.values;
        Ok(Self {
            values: vec![
                0.0 + a[0] * b[0] + a[1] * b[2],
                0.0 + a[0] * b[1] + a[1] * b[3],
                0.0 + a[2] * b[0] + a[3] * b[2],
                0.0 + a[2] * b[1] + a[3] * b[3],
            ],
            rows: 2,
            cols: 2,
        })
    }

    /// 3×3 product kernel; same summation order as [`Matrix::multiply`].
    pub fn multiply3x3(&self, rhs: &Self) -> Result<Self, MathError> {
        Self::require_pair("multiply3x3", 3, self, rhs)?;
        let a = &self.values;
        let b = &rhs.values;
        let mut out = [0.0; 9];
        for r in 0..3 {
            let (a0, a1, a2) = (a[r * 3], a[r * 3 + 1], a[r * 3 + 2]);
            out[r * 3] = 0.0 + a0 * b[0] + a1 * b[3] + a2 * b[6];
            out[r * 3 + 1] = 0.0 + a0 * b[1] + a1 * b[4] + a2 * b[7];
            out[r * 3 + 2] = 0.0 + a0 * b[2] + a1 * b[5] + a2 * b[8];
        }
        Ok(Self {
            values: out.to_vec(),
            rows: 3,
            cols: 3,
        })
    }

    /// 4×4 product kernel; same summation order as [`Matrix::multiply`].
    pub fn multiply4x4(&self, rhs: &Self) -> Result<Self, MathError> {
        Self::require_pair("multiply4x4", 4, self, rhs)?;
        let a = &self.values;
        let b = &rhs.values;
        let mut out = [0.0; 16];
        for r in 0..4 {
            let (a0, a1, a2, a3) = (a[r * 4], a[r * 4 + 1], a[r * 4 + 2], a[r * 4 + 3]);
            out[r * 4] = 0.0 + a0 * b[0] + a1 * b[4] + a2 * b[8] + a3 * b[12];
            out[r * 4 + 1] = 0.0 + a0 * b[1] + a1 * b[5] + a2 * b[9] + a3 * b[13];
            out[r * 4 + 2] = 0.0 + a0 * b[2] + a1 * b[6] + a2 * b[10] + a3 * b[14];
            out[r * 4 + 3] = 0.0 + a0 * b[3] + a1 * b[7] + a2 * b[11] + a3 * b[15];
        }
        Ok(Self {
            values: out.to_vec(),
            rows: 4,
            cols: 4,
        })
    }

    fn require_pair(op: &'static str, n: usize, lhs: &Self, rhs: &Self) -> Result<(), MathError> {
        if lhs.shape() != (n, n) {
            return Err(MathError::DimensionMismatch {
                op,
                left: (n, n),
                right: lhs.shape(),
            });
        }
        if rhs.shape() != (n, n) {
            return Err(MathError::DimensionMismatch {
                op,
                left: (n, n),
                right: rhs.shape(),
            });
        }
        Ok(())
    }

    fn require_square(&self) -> Result<(), MathError> {
        if !self.is_square() {
            return Err(MathError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.cols > 64 {
            return Err(MathError::TooLarge { size: self.cols });
        }
        Ok(())
    }

    /// Determinant by Laplace expansion along the first surviving row.
    ///
    /// Minor determinants are memoised by their (row set, column set) so each
    /// distinct minor is expanded once.
    pub fn determinant(&self) -> Result<f64, MathError> {
        self.require_square()?;
        let full = full_mask(self.rows);
        let mut memo = MinorMemo::default();
        Ok(self.minor_determinant(full, full, &mut memo))
    }

    fn minor_determinant(&self, row_mask: u64, col_mask: u64, memo: &mut MinorMemo) -> f64 {
        match col_mask.count_ones() {
            0 => return 1.0,
            1 => return self.at(lowest_bit(row_mask), lowest_bit(col_mask)),
            2 => {
                let r0 = lowest_bit(row_mask);
                let r1 = lowest_bit(row_mask & !(1 << r0));
                let c0 = lowest_bit(col_mask);
                let c1 = lowest_bit(col_mask & !(1 << c0));
                return self.at(r0, c0) * self.at(r1, c1) - self.at(r0, c1) * self.at(r1, c0);
            }
            _ => {}
        }
        if let Some(&det) = memo.get(&(row_mask, col_mask)) {
            return det;
        }
        let row = lowest_bit(row_mask);
        let rest_rows = row_mask & !(1 << row);
        let mut det = 0.0;
        let mut sign = 1.0;
        let mut cols = col_mask;
        while cols != 0 {
            let col = lowest_bit(cols);
            cols &= cols - 1;
            let v = self.at(row, col);
            if v != 0.0 {
                det += sign * v * self.minor_determinant(rest_rows, col_mask & !(1 << col), memo);
            }
            sign = -sign;
        }
        memo.insert((row_mask, col_mask), det);
        det
    }

    /// Inverse with the default singular threshold.
    pub fn invert(&self) -> Result<Self, MathError> {
        self.invert_with(&Tolerance::default())
    }

    /// Inverse via the adjugate; fails when `|det| < tol.singular`.
    pub fn invert_with(&self, tol: &Tolerance) -> Result<Self, MathError> {
        self.require_square()?;
        let n = self.rows;
        let full = full_mask(n);
        let mut memo = MinorMemo::default();
        let det = self.minor_determinant(full, full, &mut memo);
        if det.abs() < tol.singular {
            debug!(determinant = det, size = n, "refusing to invert singular matrix");
            return Err(MathError::Singular { determinant: det });
        }
        let inv_det = 1.0 / det;
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let minor = self.minor_determinant(full & !(1 << i), full & !(1 << j), &mut memo);
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                // adj(A)[j][i] = cofactor(i, j)
                out.values[j * n + i] = sign * minor * inv_det;
            }
        }
        Ok(out)
    }

    /// Transforms a point by a 4×4 matrix with perspective divide.
    pub fn transform_point3(&self, point: Vec3) -> Result<Vec3, MathError> {
        self.require_shape("transform_point3", 4, 4)?;
        let h = [point.x(), point.y(), point.z(), 1.0];
        let out = self.mul_homogeneous::<4>(&h);
        let w = out[3];
        if w.abs() < EPSILON {
            return Err(MathError::PointAtInfinity { w });
        }
        Ok(Vec3::new(out[0] / w, out[1] / w, out[2] / w))
    }

    /// Transforms a 2D point by a 3×3 matrix with perspective divide.
    pub fn transform_point2(&self, point: Vec2) -> Result<Vec2, MathError> {
        self.require_shape("transform_point2", 3, 3)?;
        let h = [point.x(), point.y(), 1.0];
        let out = self.mul_homogeneous::<3>(&h);
        let w = out[2];
        if w.abs() < EPSILON {
            return Err(MathError::PointAtInfinity { w });
        }
        Ok(Vec2::new(out[0] / w, out[1] / w))
    }

    /// Transforms a direction by the upper-left 3×3 of a 4×4 matrix (`w = 0`).
    pub fn transform_direction3(&self, direction: Vec3) -> Result<Vec3, MathError> {
        self.require_shape("transform_direction3", 4, 4)?;
        let h = [direction.x(), direction.y(), direction.z(), 0.0];
        let out = self.mul_homogeneous::<4>(&h);
        Ok(Vec3::new(out[0], out[1], out[2]))
    }

    fn require_shape(&self, op: &'static str, rows: usize, cols: usize) -> Result<(), MathError> {
        if self.shape() != (rows, cols) {
            return Err(MathError::DimensionMismatch {
                op,
                left: (rows, cols),
                right: self.shape(),
            });
        }
        Ok(())
    }

    fn mul_homogeneous<const N: usize>(&self, h: &[f64; N]) -> [f64; N] {
        let mut out = [0.0; N];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..N).map(|k| self.at(row, k) * h[k]).sum();
        }
        out
    }

    /// 4×4 translation.
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::from_rows(&[
            [1.0, 0.0, 0.0, tx],
            [0.0, 1.0, 0.0, ty],
            [0.0, 0.0, 1.0, tz],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 3×3 translation for 2D points.
    pub fn translation2d(tx: f64, ty: f64) -> Self {
        Self::from_rows(&[[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]])
    }

    /// 4×4 axis-aligned scale.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_rows(&[
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 3×3 scale for 2D points.
    pub fn scale2d(sx: f64, sy: f64) -> Self {
        Self::from_rows(&[[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    /// 3×3 counter-clockwise rotation for 2D points.
    pub fn rotation2d(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(&[[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation about +X by `angle` radians (right-handed).
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about +Y by `angle` radians (right-handed).
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(&[
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about +Z by `angle` radians (right-handed).
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(&[
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined rotation applying X first, then Y, then Z (`Rz · Ry · Rx`).
    ///
    /// # Examples
    /// ```
    /// use core::f64::consts::FRAC_PI_2;
    /// use echo_math::{Matrix, Vec3};
    /// // X by 90° sends +Y to +Z; Z by 90° then leaves +Z alone.
    /// let r = Matrix::rotation_xyz(FRAC_PI_2, 0.0, FRAC_PI_2);
    /// let v = r.transform_direction3(Vec3::UNIT_Y).unwrap();
    /// assert!(v.approx_eq(&Vec3::UNIT_Z, 1e-12));
    /// ```
    pub fn rotation_xyz(x: f64, y: f64, z: f64) -> Self {
        let rx = Self::rotation_x(x);
        let ry = Self::rotation_y(y);
        let rz = Self::rotation_z(z);
        rz.mul4(&ry.mul4(&rx))
    }

    /// Rotation of `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// The axis is normalised internally; a zero-length axis yields the
    /// identity rotation.
    pub fn rotation_angle_axis(angle: f64, axis: Vec3) -> Self {
        let Some(k) = axis.try_normalize() else {
            return Self::identity(4);
        };
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (k.x(), k.y(), k.z());
        Self::from_rows(&[
            [c + x * x * t, x * y * t - z * s, x * z * t + y * s, 0.0],
            [x * y * t + z * s, c + y * y * t, y * z * t - x * s, 0.0],
            [x * z * t - y * s, y * z * t + x * s, c + z * z * t, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Off-center perspective frustum (OpenGL clip-space conventions).
    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Self::from_rows(&[
            [2.0 * near / w, 0.0, (right + left) / w, 0.0],
            [0.0, 2.0 * near / h, (top + bottom) / h, 0.0],
            [0.0, 0.0, -(far + near) / d, -2.0 * far * near / d],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Symmetric perspective projection from a vertical field of view (radians).
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let top = near * (fov_y * 0.5).tan();
        let right = top * aspect;
        Self::frustum(-right, right, -top, top, near, far)
    }

    /// View matrix looking from `eye` toward `target`.
    ///
    /// When `forward` is parallel to `up` (e.g. a camera looking straight
    /// down a vertical up hint) the right axis falls back to a stable
    /// perpendicular of `forward`, so the basis is always orthonormal.
    /// Fails only when `eye == target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<LookAt, MathError> {
        let forward = (target - eye).try_normalize().ok_or(MathError::DegenerateVector)?;
        let right = match forward.cross(&up.normalize()).try_normalize() {
            Some(r) => r,
            None => {
                warn!(
                    forward = ?forward.to_array(),
                    up = ?up.to_array(),
                    "look_at: forward is parallel to up hint; using fallback right axis"
                );
                forward.any_perpendicular()
            }
        };
        let cam_up = right.cross(&forward);
        let view = Self::from_rows(&[
            [right.x(), right.y(), right.z(), -right.dot(&eye)],
            [cam_up.x(), cam_up.y(), cam_up.z(), -cam_up.dot(&eye)],
            [-forward.x(), -forward.y(), -forward.z(), forward.dot(&eye)],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let inverse = Self::from_rows(&[
            [right.x(), cam_up.x(), -forward.x(), eye.x()],
            [right.y(), cam_up.y(), -forward.y(), eye.y()],
            [right.z(), cam_up.z(), -forward.z(), eye.z()],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Ok(LookAt {
            view,
            inverse,
            forward,
            right,
            up: cam_up,
        })
    }

    // Builders compose fixed 4×4 values, so the shape check cannot fail.
    fn mul4(&self, rhs: &Self) -> Self {
        self.multiply4x4(rhs).unwrap_or_else(|_| Self::identity(4))
    }
}

fn full_mask(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

fn lowest_bit(mask: u64) -> usize {
    mask.trailing_zeros() as usize
}
