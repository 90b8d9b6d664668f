// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Default epsilon for position-like quantities (model units).
///
/// Sized to absorb the drift of a few chained transforms without merging
/// points that are meant to be distinct.
pub const EPSILON: f64 = 1e-6;

/// Epsilon configuration for float comparisons.
///
/// Every approximate comparison in the kernel reads one of these fields, so a
/// caller working at a different model scale can tighten or loosen all of them
/// in one place.
///
/// # Examples
/// ```
/// use echo_math::Tolerance;
/// let tol = Tolerance::default().with_linear(1e-9);
/// assert_eq!(tol.linear, 1e-9);
/// assert_eq!(tol.singular, Tolerance::default().singular);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance {
    /// Distance below which two positions are considered coincident.
    pub linear: f64,
    /// Absolute determinant below which a matrix is treated as singular.
    pub singular: f64,
    /// Sine-like threshold for parallel directions (normalised cross magnitude).
    pub parallel: f64,
}

impl Tolerance {
    /// The default tolerance set.
    pub const DEFAULT: Self = Self {
        linear: EPSILON,
        singular: 1e-12,
        parallel: 1e-10,
    };

    /// Returns a copy with a different linear epsilon.
    pub const fn with_linear(mut self, linear: f64) -> Self {
        self.linear = linear;
        self
    }

    /// Returns a copy with a different singular-determinant threshold.
    pub const fn with_singular(mut self, singular: f64) -> Self {
        self.singular = singular;
        self
    }

    /// Returns a copy with a different parallel-direction threshold.
    pub const fn with_parallel(mut self, parallel: f64) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
