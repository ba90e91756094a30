//! Ellipsoid rounding for preconditioned Hit-and-Run.

use tracing::debug;

use crate::body::{ConvexBody, Ellipsoid};
use crate::error::{Result, VersionSpaceError};

use super::EllipsoidSampler;

/// Fits an ellipsoid to a convex body with the shallow-cut ellipsoid method.
///
/// Starting from [`ConvexBody::containing_ellipsoid`], the ellipsoid is cut
/// until [`ConvexBody::attempt_to_reduce_ellipsoid`] reports no progress or
/// `max_iterations` cuts were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingAlgorithm {
    max_iterations: usize,
}

impl RoundingAlgorithm {
    /// Create the algorithm.
    ///
    /// # Errors
    ///
    /// `Validation` if `max_iterations` is zero.
    pub fn new(max_iterations: usize) -> Result<Self> {
        if max_iterations == 0 {
            return Err(VersionSpaceError::validation(
                "rounding max_iterations must be positive",
            ));
        }
        Ok(Self { max_iterations })
    }

    /// Maximum number of cuts.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Fit an ellipsoid starting from the body's containing ellipsoid.
    pub fn fit(&self, body: &dyn ConvexBody) -> Result<Ellipsoid> {
        self.fit_from(body, body.containing_ellipsoid()?)
    }

    /// Fit an ellipsoid starting from `ellipsoid`, which must contain the body.
    pub fn fit_from(&self, body: &dyn ConvexBody, mut ellipsoid: Ellipsoid) -> Result<Ellipsoid> {
        for iteration in 0..self.max_iterations {
            if !body.attempt_to_reduce_ellipsoid(&mut ellipsoid)? {
                debug!(iteration, "rounding converged");
                return Ok(ellipsoid);
            }
        }
        debug!(
            max_iterations = self.max_iterations,
            "rounding stopped at iteration limit"
        );
        Ok(ellipsoid)
    }

    /// Fit an ellipsoid and wrap its shape into a direction sampler.
    pub fn fit_sampler(&self, body: &dyn ConvexBody) -> Result<EllipsoidSampler> {
        EllipsoidSampler::from_ellipsoid(&self.fit(body)?)
    }
}
