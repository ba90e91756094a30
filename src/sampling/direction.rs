//! Step directions for Hit-and-Run.
//!
//! A plain random direction mixes slowly in elongated bodies. Drawing the
//! direction as `L·z` with `L·Lᵀ` the shape of an ellipsoid that fits the body
//! (see [`RoundingAlgorithm`](super::RoundingAlgorithm)) makes every axis of
//! the body look alike to the walk.

use nalgebra::Cholesky;
use rand::Rng;

use crate::body::{is_symmetric, Ellipsoid};
use crate::error::{check_dim, Result, VersionSpaceError};
use crate::manifold::{standard_normal_vector, Manifold};
use crate::types::{Matrix, Vector};

/// Strategy for choosing the next Hit-and-Run direction.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionSampler {
    /// Isotropic tangent vector from the manifold.
    Random(RandomDirectionSampler),
    /// Gaussian direction preconditioned by an ellipsoid.
    Ellipsoid(EllipsoidSampler),
}

impl DirectionSampler {
    /// Random directions on `manifold`.
    pub fn random(manifold: Manifold) -> Self {
        DirectionSampler::Random(RandomDirectionSampler::new(manifold))
    }

    /// Draw a direction at `point`.
    pub fn sample_direction<R: Rng + ?Sized>(&self, point: &Vector, rng: &mut R) -> Result<Vector> {
        match self {
            DirectionSampler::Random(sampler) => Ok(sampler.sample_direction(point, rng)),
            DirectionSampler::Ellipsoid(sampler) => sampler.sample_direction(point, rng),
        }
    }
}

impl From<RandomDirectionSampler> for DirectionSampler {
    fn from(sampler: RandomDirectionSampler) -> Self {
        DirectionSampler::Random(sampler)
    }
}

impl From<EllipsoidSampler> for DirectionSampler {
    fn from(sampler: EllipsoidSampler) -> Self {
        DirectionSampler::Ellipsoid(sampler)
    }
}

/// Delegates to [`Manifold::sample_velocity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDirectionSampler {
    manifold: Manifold,
}

impl RandomDirectionSampler {
    /// Create a sampler for `manifold`.
    pub fn new(manifold: Manifold) -> Self {
        Self { manifold }
    }

    /// Manifold directions are drawn on.
    pub fn manifold(&self) -> Manifold {
        self.manifold
    }

    /// Draw a tangent vector at `point`.
    pub fn sample_direction<R: Rng + ?Sized>(&self, point: &Vector, rng: &mut R) -> Vector {
        self.manifold.sample_velocity(point, rng)
    }
}

/// Draws `L·z` with `z ~ N(0, I)` and `L` the Cholesky factor of a
/// positive-definite matrix. Euclidean bodies only.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipsoidSampler {
    factor: Matrix,
}

impl EllipsoidSampler {
    /// Create a sampler from a symmetric positive-definite matrix.
    ///
    /// # Errors
    ///
    /// `Validation` if the matrix is not square, not symmetric or not
    /// positive definite.
    pub fn new(matrix: &Matrix) -> Result<Self> {
        if !matrix.is_square() || matrix.nrows() == 0 {
            return Err(VersionSpaceError::Validation(format!(
                "preconditioning matrix must be square and non-empty, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if !is_symmetric(matrix) {
            return Err(VersionSpaceError::validation(
                "preconditioning matrix must be symmetric",
            ));
        }
        let chol = Cholesky::new(matrix.clone()).ok_or_else(|| {
            VersionSpaceError::validation("preconditioning matrix must be positive definite")
        })?;
        Ok(Self { factor: chol.l() })
    }

    /// Create a sampler from the shape of a fitted ellipsoid.
    ///
    /// Numerically semi-definite shapes are factored with diagonal jitter.
    pub fn from_ellipsoid(ellipsoid: &Ellipsoid) -> Result<Self> {
        Ok(Self {
            factor: ellipsoid.cholesky_factor()?,
        })
    }

    /// Dimension of the directions.
    pub fn dim(&self) -> usize {
        self.factor.nrows()
    }

    /// Lower-triangular factor L.
    pub fn factor(&self) -> &Matrix {
        &self.factor
    }

    /// Map a standard Gaussian draw to a direction: `L·z`.
    pub fn precondition(&self, z: &Vector) -> Result<Vector> {
        check_dim(self.dim(), z.len())?;
        Ok(&self.factor * z)
    }

    /// Draw a direction at `point`. The point only fixes the dimension.
    pub fn sample_direction<R: Rng + ?Sized>(&self, point: &Vector, rng: &mut R) -> Result<Vector> {
        check_dim(self.dim(), point.len())?;
        let z = standard_normal_vector(self.dim(), rng);
        self.precondition(&z)
    }
}
