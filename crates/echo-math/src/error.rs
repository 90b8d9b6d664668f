// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

/// Hard failures raised by the math kernel.
///
/// Geometric "no result" outcomes (parallel ray, missed plane) are never
/// reported through this type; they surface as `Option::None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// Name of the operation that rejected the operands.
        op: &'static str,
        /// Shape `(rows, cols)` of the left operand (or expected shape).
        left: (usize, usize),
        /// Shape `(rows, cols)` of the right operand (or actual shape).
        right: (usize, usize),
    },
    /// A square matrix was required.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Row count of the offending matrix.
        rows: usize,
        /// Column count of the offending matrix.
        cols: usize,
    },
    /// The matrix determinant is below the singular threshold.
    #[error("singular matrix (determinant {determinant:e})")]
    Singular {
        /// Determinant that failed the threshold.
        determinant: f64,
    },
    /// Cofactor expansion keys index sets by 64-bit masks.
    #[error("matrix of size {size} exceeds the 64-column cofactor limit")]
    TooLarge {
        /// Column count of the offending matrix.
        size: usize,
    },
    /// A direction was required but the vector has (near) zero length.
    #[error("degenerate vector: cannot derive a direction")]
    DegenerateVector,
    /// A homogeneous transform produced `w ≈ 0`.
    #[error("transformed point lies at infinity (w = {w:e})")]
    PointAtInfinity {
        /// Homogeneous coordinate produced by the transform.
        w: f64,
    },
}
