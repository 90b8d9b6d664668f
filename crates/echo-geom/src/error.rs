// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use echo_math::MathError;
use thiserror::Error;

/// Hard failures raised by the geometry kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// The shape is too degenerate for the requested operation.
    #[error("invalid shape: {reason}")]
    InvalidShape {
        /// What made the shape unusable.
        reason: &'static str,
    },
    /// The ear clipper could not triangulate the projected outline.
    #[error("triangulation failed")]
    Triangulation,
    /// A math-kernel operation failed.
    #[error(transparent)]
    Math(#[from] MathError),
}
