//! Majority-vote classifiers built from sampled hypotheses.
//!
//! Each sample of the version space is a linear classifier `x ↦ sign(b + w·x)`.
//! The ensemble predicts the fraction of hypotheses voting positive, which is
//! what active-learning strategies rank unlabeled points by.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_dim, Result, VersionSpaceError};
use crate::types::{Label, Matrix, Vector};

// =============================================================================
// Linear classifiers
// =============================================================================

/// Linear classifier `x ↦ sign(bias + weights·x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    bias: f64,
    weights: Vector,
}

impl LinearClassifier {
    /// Create a classifier.
    pub fn new(bias: f64, weights: Vector) -> Self {
        Self { bias, weights }
    }

    /// Split a raw hypothesis into bias and weights.
    ///
    /// With an intercept the first coordinate is the bias.
    pub fn from_hypothesis(hypothesis: &Vector, add_intercept: bool) -> Result<Self> {
        if add_intercept {
            if hypothesis.len() < 2 {
                return Err(VersionSpaceError::Validation(format!(
                    "hypothesis with intercept needs at least 2 entries, got {}",
                    hypothesis.len()
                )));
            }
            Ok(Self::new(hypothesis[0], hypothesis.rows(1, hypothesis.len() - 1).into_owned()))
        } else {
            Ok(Self::new(0.0, hypothesis.clone()))
        }
    }

    /// Bias term.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Weight vector.
    pub fn weights(&self) -> &Vector {
        &self.weights
    }

    /// Signed margin `bias + weights·x`.
    pub fn margin(&self, x: &Vector) -> Result<f64> {
        check_dim(self.weights.len(), x.len())?;
        Ok(self.bias + self.weights.dot(x))
    }

    /// Predicted label.
    pub fn predict(&self, x: &Vector) -> Result<Label> {
        Ok(Label::from_margin(self.margin(x)?))
    }
}

/// Ensemble of linear classifiers voting by majority.
///
/// Row i of `weights` and entry i of `bias` form hypothesis i.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMajorityVote {
    bias: Vector,
    weights: Matrix,
}

impl LinearMajorityVote {
    /// Create an ensemble.
    ///
    /// # Errors
    ///
    /// `Validation` if there are no hypotheses, `DimensionMismatch` if bias
    /// and weights disagree on their number.
    pub fn new(bias: Vector, weights: Matrix) -> Result<Self> {
        if weights.nrows() == 0 {
            return Err(VersionSpaceError::validation(
                "majority vote needs at least one hypothesis",
            ));
        }
        check_dim(weights.nrows(), bias.len())?;
        Ok(Self { bias, weights })
    }

    /// Build an ensemble from raw version-space samples.
    pub fn from_samples(samples: &[Vector], add_intercept: bool) -> Result<Self> {
        let classifiers = samples
            .iter()
            .map(|s| LinearClassifier::from_hypothesis(s, add_intercept))
            .collect::<Result<Vec<_>>>()?;
        let Some(first) = classifiers.first() else {
            return Err(VersionSpaceError::validation(
                "majority vote needs at least one hypothesis",
            ));
        };
        let dim = first.weights.len();

        let mut weights = Matrix::zeros(classifiers.len(), dim);
        for (i, classifier) in classifiers.iter().enumerate() {
            check_dim(dim, classifier.weights.len())?;
            weights.set_row(i, &classifier.weights.transpose());
        }
        let bias = Vector::from_iterator(classifiers.len(), classifiers.iter().map(|c| c.bias));
        Self::new(bias, weights)
    }

    /// Number of hypotheses.
    pub fn num_hypotheses(&self) -> usize {
        self.weights.nrows()
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Bias of every hypothesis.
    pub fn bias(&self) -> &Vector {
        &self.bias
    }

    /// Weights of every hypothesis, one per row.
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Hypothesis `index` as a standalone classifier.
    pub fn classifier(&self, index: usize) -> Option<LinearClassifier> {
        (index < self.num_hypotheses()).then(|| {
            LinearClassifier::new(self.bias[index], self.weights.row(index).transpose())
        })
    }

    /// Fraction of hypotheses predicting a positive label.
    pub fn predict_probability(&self, x: &Vector) -> Result<f64> {
        check_dim(self.dim(), x.len())?;
        let margins = &self.weights * x + &self.bias;
        let positive = margins.iter().filter(|&&m| m > 0.0).count();
        Ok(positive as f64 / self.num_hypotheses() as f64)
    }

    /// Majority label; ties go to negative.
    pub fn predict(&self, x: &Vector) -> Result<Label> {
        let probability = self.predict_probability(x)?;
        Ok(if probability > 0.5 {
            Label::Positive
        } else {
            Label::Negative
        })
    }
}

// =============================================================================
// Kernels
// =============================================================================

/// Positive-definite kernel function.
pub trait Kernel: fmt::Debug + Clone + Send + Sync {
    /// Kernel value `k(x, y)`.
    fn compute(&self, x: &Vector, y: &Vector) -> f64;

    /// Row `[k(x, s₁), …, k(x, sₙ)]` of `x` against `support`.
    fn row(&self, x: &Vector, support: &[Vector]) -> Vector {
        Vector::from_iterator(support.len(), support.iter().map(|s| self.compute(x, s)))
    }
}

/// `k(x, y) = x·y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearKernel;

impl Kernel for LinearKernel {
    fn compute(&self, x: &Vector, y: &Vector) -> f64 {
        x.dot(y)
    }
}

/// `k(x, y) = exp(−γ·‖x − y‖²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianKernel {
    gamma: f64,
}

impl GaussianKernel {
    /// Create a Gaussian kernel of bandwidth parameter `gamma`.
    ///
    /// # Errors
    ///
    /// `Validation` unless `gamma` is positive and finite.
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma > 0.0 && gamma.is_finite()) {
            return Err(VersionSpaceError::Validation(format!(
                "gaussian kernel gamma must be positive and finite, got {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Bandwidth parameter γ.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: &Vector, y: &Vector) -> f64 {
        (-self.gamma * (x - y).norm_squared()).exp()
    }
}

/// Majority vote of kernel classifiers `x ↦ sign(b + Σⱼ αⱼ k(x, sⱼ))`.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelMajorityVote<K: Kernel> {
    kernel: K,
    support: Vec<Vector>,
    vote: LinearMajorityVote,
}

impl<K: Kernel> KernelMajorityVote<K> {
    /// Create an ensemble over the support points `support`.
    pub fn new(kernel: K, support: Vec<Vector>, vote: LinearMajorityVote) -> Result<Self> {
        check_dim(vote.dim(), support.len())?;
        Ok(Self {
            kernel,
            support,
            vote,
        })
    }

    /// Kernel function.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Support points (the labeled data).
    pub fn support(&self) -> &[Vector] {
        &self.support
    }

    /// Underlying linear ensemble over kernel features.
    pub fn linear_vote(&self) -> &LinearMajorityVote {
        &self.vote
    }

    /// Fraction of hypotheses predicting a positive label.
    pub fn predict_probability(&self, x: &Vector) -> Result<f64> {
        if let Some(first) = self.support.first() {
            check_dim(first.len(), x.len())?;
        }
        self.vote
            .predict_probability(&self.kernel.row(x, &self.support))
    }

    /// Majority label; ties go to negative.
    pub fn predict(&self, x: &Vector) -> Result<Label> {
        Ok(if self.predict_probability(x)? > 0.5 {
            Label::Positive
        } else {
            Label::Negative
        })
    }
}
