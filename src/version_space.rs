//! Version spaces of linear and kernel classifiers.
//!
//! For labeled data `(xᵢ, yᵢ)` with `yᵢ ∈ {−1, +1}`, the version space of
//! linear classifiers through the origin is the cone
//!
//! ```text
//! { w : yᵢ·⟨xᵢ, w⟩ > 0 for every i }
//! ```
//!
//! With an intercept every point gets a leading `1` coordinate, so the first
//! entry of a hypothesis is its bias. The cone is made bounded by
//! intersecting it with the unit ball (or the unit sphere when `spherical`
//! is set) and then sampled with Hit-and-Run.

use std::sync::Arc;

use tracing::debug;

use crate::body::{ConvexBody, UnitBallPolyhedralCone, UnitSpherePolyhedralCone};
use crate::classifier::{Kernel, KernelMajorityVote, LinearMajorityVote};
use crate::config::Config;
use crate::error::{check_dim, Result, VersionSpaceError};
use crate::linprog::{LinearProgramSolverFactory, MinilpFactory};
use crate::sampling::HitAndRunSampler;
use crate::types::{LabeledPoint, Matrix, Vector};

/// Samples hypotheses of linear classifiers consistent with the labels.
///
/// The instance is meant to live across an active-learning session: its
/// caches carry the previous iteration's samples and ellipsoid forward.
#[derive(Debug, Clone)]
pub struct LinearVersionSpace {
    config: Config,
    sampler: HitAndRunSampler,
    solver: Arc<dyn LinearProgramSolverFactory>,
}

impl LinearVersionSpace {
    /// Create a version space with the default LP backend.
    ///
    /// # Errors
    ///
    /// `Validation` if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_solver_factory(config, Arc::new(MinilpFactory))
    }

    /// Create a version space whose interior points are found by `solver`.
    pub fn with_solver_factory(
        config: Config,
        solver: Arc<dyn LinearProgramSolverFactory>,
    ) -> Result<Self> {
        let sampler = HitAndRunSampler::from_config(&config)?;
        Ok(Self {
            config,
            sampler,
            solver,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Underlying sampler and its caches.
    pub fn sampler(&self) -> &HitAndRunSampler {
        &self.sampler
    }

    /// Mutable access to the sampler, e.g. to prime its caches.
    pub fn sampler_mut(&mut self) -> &mut HitAndRunSampler {
        &mut self.sampler
    }

    /// Sample `num_samples` hypotheses and return them as a majority vote.
    ///
    /// # Errors
    ///
    /// - `Validation` / `DimensionMismatch` for empty input, zero samples or
    ///   inconsistent feature dimensions
    /// - `Infeasible` if the labels admit no strictly consistent hypothesis
    /// - `Geometry` if the chain cannot make progress
    pub fn sample(
        &mut self,
        labeled_points: &[LabeledPoint],
        num_samples: usize,
    ) -> Result<LinearMajorityVote> {
        let samples = self.sample_hypotheses(labeled_points, num_samples)?;
        LinearMajorityVote::from_samples(&samples, self.config.add_intercept)
    }

    /// Sample raw hypothesis vectors (bias first when the intercept is on).
    pub fn sample_hypotheses(
        &mut self,
        labeled_points: &[LabeledPoint],
        num_samples: usize,
    ) -> Result<Vec<Vector>> {
        if num_samples == 0 {
            return Err(VersionSpaceError::validation("num_samples must be positive"));
        }
        let constraints = constraint_matrix(labeled_points, self.config.add_intercept)?;
        debug!(
            labels = labeled_points.len(),
            dim = constraints.ncols(),
            num_samples,
            spherical = self.config.spherical,
            "sampling version space"
        );

        let body = self.build_body(constraints)?;
        self.sampler.sample(body.as_ref(), num_samples)
    }

    fn build_body(&self, constraints: Matrix) -> Result<Box<dyn ConvexBody>> {
        let solver = Arc::clone(&self.solver);
        Ok(if self.config.spherical {
            Box::new(UnitSpherePolyhedralCone::new(constraints, solver)?)
        } else {
            Box::new(UnitBallPolyhedralCone::new(constraints, solver)?)
        })
    }
}

/// Row i is `yᵢ·xᵢ`, or `yᵢ·(1, xᵢ)` with an intercept.
///
/// # Errors
///
/// `Validation` if there are no points or they have no features,
/// `DimensionMismatch` if feature dimensions differ.
pub fn constraint_matrix(labeled_points: &[LabeledPoint], add_intercept: bool) -> Result<Matrix> {
    let Some(first) = labeled_points.first() else {
        return Err(VersionSpaceError::validation("labeled data must be non-empty"));
    };
    let dim = first.dim();
    if dim == 0 {
        return Err(VersionSpaceError::validation("data points must have features"));
    }

    let offset = usize::from(add_intercept);
    let mut matrix = Matrix::zeros(labeled_points.len(), dim + offset);
    for (i, point) in labeled_points.iter().enumerate() {
        check_dim(dim, point.dim())?;
        let sign = point.label.as_sign();
        if add_intercept {
            matrix[(i, 0)] = sign;
        }
        for (j, &value) in point.features.iter().enumerate() {
            matrix[(i, j + offset)] = sign * value;
        }
    }
    Ok(matrix)
}

/// Samples hypotheses of kernel classifiers consistent with the labels.
///
/// Every labeled point `xᵢ` is replaced by its kernel row
/// `(k(xᵢ, x₁), …, k(xᵢ, xₙ))`, so the version space lives in ℝⁿ and grows by
/// one dimension with every new label.
#[derive(Debug, Clone)]
pub struct KernelVersionSpace<K: Kernel> {
    kernel: K,
    linear: LinearVersionSpace,
}

impl<K: Kernel> KernelVersionSpace<K> {
    /// Create a kernel version space with the default LP backend.
    pub fn new(kernel: K, config: Config) -> Result<Self> {
        Ok(Self {
            kernel,
            linear: LinearVersionSpace::new(config)?,
        })
    }

    /// Create a kernel version space with a custom LP backend.
    pub fn with_solver_factory(
        kernel: K,
        config: Config,
        solver: Arc<dyn LinearProgramSolverFactory>,
    ) -> Result<Self> {
        Ok(Self {
            kernel,
            linear: LinearVersionSpace::with_solver_factory(config, solver)?,
        })
    }

    /// Kernel function.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Version space over kernel features.
    pub fn linear(&self) -> &LinearVersionSpace {
        &self.linear
    }

    /// Sample `num_samples` kernel hypotheses and return their majority vote.
    pub fn sample(
        &mut self,
        labeled_points: &[LabeledPoint],
        num_samples: usize,
    ) -> Result<KernelMajorityVote<K>> {
        if labeled_points.is_empty() {
            return Err(VersionSpaceError::validation("labeled data must be non-empty"));
        }
        let dim = labeled_points[0].dim();
        let support: Vec<Vector> = labeled_points
            .iter()
            .map(|p| {
                check_dim(dim, p.dim())?;
                Ok(p.features.clone())
            })
            .collect::<Result<_>>()?;

        let kernel_points: Vec<LabeledPoint> = labeled_points
            .iter()
            .map(|p| LabeledPoint::new(self.kernel.row(&p.features, &support), p.label))
            .collect();

        let samples = self.linear.sample_hypotheses(&kernel_points, num_samples)?;
        let vote = LinearMajorityVote::from_samples(&samples, self.linear.config().add_intercept)?;
        KernelMajorityVote::new(self.kernel.clone(), support, vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;

    fn point(features: &[f64], label: Label) -> LabeledPoint {
        LabeledPoint::from_slice(features, label)
    }

    #[test]
    fn test_constraint_matrix() {
        let points = [
            point(&[1.0, 2.0], Label::Positive),
            point(&[3.0, -1.0], Label::Negative),
        ];
        let m = constraint_matrix(&points, false).unwrap();
        assert_eq!(m, Matrix::from_row_slice(2, 2, &[1.0, 2.0, -3.0, 1.0]));

        let m = constraint_matrix(&points, true).unwrap();
        assert_eq!(
            m,
            Matrix::from_row_slice(2, 3, &[1.0, 1.0, 2.0, -1.0, -3.0, 1.0])
        );
    }

    #[test]
    fn test_constraint_matrix_validation() {
        assert!(constraint_matrix(&[], true).unwrap_err().is_validation());
        let mixed = [
            point(&[1.0, 2.0], Label::Positive),
            point(&[1.0], Label::Negative),
        ];
        assert!(matches!(
            constraint_matrix(&mixed, false),
            Err(VersionSpaceError::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(constraint_matrix(&[point(&[], Label::Positive)], false).is_err());
    }

    #[test]
    fn test_sample_rejects_zero_samples() {
        let mut space = LinearVersionSpace::new(Config::quick()).unwrap();
        let points = [point(&[1.0, 0.0], Label::Positive)];
        assert!(space.sample(&points, 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_hypotheses_are_consistent_with_labels() {
        let points = [
            point(&[1.0, 1.0], Label::Positive),
            point(&[-1.0, -0.5], Label::Negative),
            point(&[0.5, -1.0], Label::Positive),
        ];
        let mut space = LinearVersionSpace::new(Config::quick()).unwrap();
        let vote = space.sample(&points, 10).unwrap();
        assert_eq!(vote.num_hypotheses(), 10);
        for i in 0..vote.num_hypotheses() {
            let classifier = vote.classifier(i).unwrap();
            for p in &points {
                assert_eq!(classifier.predict(&p.features).unwrap(), p.label);
            }
        }
    }

    #[test]
    fn test_contradictory_labels_are_infeasible() {
        let points = [
            point(&[1.0, 1.0], Label::Positive),
            point(&[1.0, 1.0], Label::Negative),
        ];
        let mut space = LinearVersionSpace::new(Config::quick()).unwrap();
        assert_eq!(space.sample(&points, 3), Err(VersionSpaceError::Infeasible));
    }

    #[test]
    fn test_kernel_version_space_fits_labels() {
        let points = [
            point(&[0.0, 0.0], Label::Positive),
            point(&[2.0, 0.0], Label::Negative),
            point(&[0.0, 2.0], Label::Negative),
        ];
        let kernel = crate::classifier::GaussianKernel::new(1.0).unwrap();
        let mut space = KernelVersionSpace::new(kernel, Config::quick()).unwrap();
        let model = space.sample(&points, 9).unwrap();
        assert_eq!(model.support().len(), 3);
        for p in &points {
            assert_eq!(model.predict(&p.features).unwrap(), p.label);
        }
    }
}
