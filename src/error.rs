//! Error types for version-space sampling.

/// Error returned by the sampling engine.
///
/// Validation failures are raised immediately and are never retried. An
/// infeasible version space means the labels contradict each other; the caller
/// decides how to recover. Geometry failures are numerical edge cases near the
/// boundary of the body (see [`crate::HitAndRunChain`] for the retry policy).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VersionSpaceError {
    /// Invalid argument: empty input, non-positive counts, bad matrices.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Vectors or matrices of incompatible dimensions.
    ///
    /// This is a validation error: it is raised before any computation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension required by the receiver.
        expected: usize,
        /// Dimension actually supplied.
        actual: usize,
    },

    /// The feasibility program found no interior point.
    #[error("version space has no interior point (contradictory labels?)")]
    Infeasible,

    /// The feasibility program reported an unbounded objective.
    ///
    /// The program is always bounded by the box constraints, so this points
    /// to a misconfigured solver.
    #[error("linear program is unbounded (solver misconfiguration)")]
    Unbounded,

    /// A geodesic could not be intersected with the body.
    #[error("geometry failure: {0}")]
    Geometry(String),
}

impl VersionSpaceError {
    /// Shorthand for a [`VersionSpaceError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a [`VersionSpaceError::Geometry`] error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry(message.into())
    }

    /// True for errors raised by argument checking.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DimensionMismatch { .. })
    }

    /// True for numerical failures that a fresh direction may avoid.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VersionSpaceError>;

/// Fail with [`VersionSpaceError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn check_dim(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VersionSpaceError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
