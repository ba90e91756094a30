//! Ellipsoids and separating hyperplanes for the rounding procedure.
//!
//! An ellipsoid is stored as
//!
//! ```text
//! E = { x : (x − c)ᵀ P⁻¹ (x − c) ≤ 1 }
//! ```
//!
//! with center c and positive-definite shape matrix P. Cuts follow the
//! shallow-cut ellipsoid method: given a hyperplane h with the body on its
//! non-positive side, E is replaced by the minimum-volume ellipsoid containing
//! E ∩ {x : h(x) ≤ 0}.

use nalgebra::Cholesky;

use crate::error::{check_dim, Result, VersionSpaceError};
use crate::types::{Matrix, Vector};

/// Jitter levels tried when the shape matrix is numerically semi-definite.
const CHOLESKY_JITTER: [f64; 6] = [1e-12, 1e-10, 1e-9, 1e-8, 1e-7, 1e-6];

/// Relative tolerance for the symmetry check of shape matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Affine function h(x) = ⟨w, x⟩ + b.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperPlane {
    bias: f64,
    weights: Vector,
}

impl HyperPlane {
    /// Create a hyperplane from its bias and weights.
    pub fn new(bias: f64, weights: Vector) -> Self {
        Self { bias, weights }
    }

    /// Bias b.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Weights w.
    pub fn weights(&self) -> &Vector {
        &self.weights
    }

    /// Dimension of the weight vector.
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// Signed margin ⟨w, x⟩ + b.
    pub fn margin(&self, x: &Vector) -> f64 {
        self.weights.dot(x) + self.bias
    }
}

/// Outer ellipsoidal approximation of a convex body.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    center: Vector,
    scale: Matrix,
}

impl Ellipsoid {
    /// Create an ellipsoid from its center and shape matrix.
    ///
    /// # Errors
    ///
    /// `Validation` if the shape is not square or not symmetric,
    /// `DimensionMismatch` if it does not match the center.
    pub fn new(center: Vector, scale: Matrix) -> Result<Self> {
        if !scale.is_square() {
            return Err(VersionSpaceError::Validation(format!(
                "shape matrix must be square, got {}x{}",
                scale.nrows(),
                scale.ncols()
            )));
        }
        check_dim(center.len(), scale.nrows())?;
        if !is_symmetric(&scale) {
            return Err(VersionSpaceError::validation("shape matrix must be symmetric"));
        }
        Ok(Self { center, scale })
    }

    /// Ball of the given radius centered at the origin: P = r²·I.
    pub fn ball(dim: usize, radius: f64) -> Result<Self> {
        if dim == 0 {
            return Err(VersionSpaceError::validation("ellipsoid dimension must be positive"));
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(VersionSpaceError::Validation(format!(
                "ball radius must be positive and finite, got {radius}"
            )));
        }
        Ok(Self {
            center: Vector::zeros(dim),
            scale: Matrix::identity(dim, dim) * (radius * radius),
        })
    }

    /// Dimension of the ambient space.
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// Center c.
    pub fn center(&self) -> &Vector {
        &self.center
    }

    /// Shape matrix P.
    pub fn scale(&self) -> &Matrix {
        &self.scale
    }

    /// Whether `x` lies inside the ellipsoid.
    pub fn contains(&self, x: &Vector) -> Result<bool> {
        check_dim(self.dim(), x.len())?;
        let chol = self.cholesky()?;
        let diff = x - &self.center;
        let y = chol.solve(&diff);
        Ok(diff.dot(&y) <= 1.0 + 1e-9)
    }

    /// Lower-triangular factor L with L·Lᵀ = P.
    pub fn cholesky_factor(&self) -> Result<Matrix> {
        Ok(self.cholesky()?.l())
    }

    fn cholesky(&self) -> Result<Cholesky<f64, nalgebra::Dyn>> {
        if let Some(chol) = Cholesky::new(self.scale.clone()) {
            return Ok(chol);
        }
        let n = self.dim();
        for &eps in &CHOLESKY_JITTER {
            let jittered = &self.scale + Matrix::identity(n, n) * eps;
            if let Some(chol) = Cholesky::new(jittered) {
                return Ok(chol);
            }
        }
        Err(VersionSpaceError::geometry(
            "ellipsoid shape matrix is not positive definite",
        ))
    }

    /// Replace this ellipsoid by the minimum-volume ellipsoid containing
    /// `self ∩ {x : hyperplane.margin(x) ≤ 0}`.
    ///
    /// Returns `false` when the cut is too shallow to shrink the ellipsoid
    /// (α ≤ −1/n), in which case nothing changes.
    ///
    /// # Errors
    ///
    /// `Geometry` when the whole ellipsoid lies on the positive side of the
    /// hyperplane (α ≥ 1) or the hyperplane is degenerate.
    pub fn cut(&mut self, hyperplane: &HyperPlane) -> Result<bool> {
        check_dim(self.dim(), hyperplane.dim())?;

        let n = self.dim() as f64;
        let g = hyperplane.weights();
        let pg = &self.scale * g;
        let gamma_sq = g.dot(&pg);
        if !(gamma_sq > 0.0) {
            return Err(VersionSpaceError::geometry(
                "cutting hyperplane is degenerate for this ellipsoid",
            ));
        }
        let gamma = gamma_sq.sqrt();
        let alpha = hyperplane.margin(&self.center) / gamma;

        if alpha >= 1.0 {
            return Err(VersionSpaceError::Geometry(format!(
                "ellipsoid lies on the positive side of the hyperplane (alpha = {alpha})"
            )));
        }
        if alpha <= -1.0 / n {
            return Ok(false);
        }

        if self.dim() == 1 {
            self.cut_interval(hyperplane);
            return Ok(true);
        }

        let pg_hat = pg / gamma;
        let tau = (1.0 + n * alpha) / (n + 1.0);
        let sigma = 2.0 * tau / (alpha + 1.0);
        let delta = (1.0 - alpha * alpha) * (n * n / (n * n - 1.0));

        self.center -= &pg_hat * tau;
        let updated = (&self.scale - (&pg_hat * pg_hat.transpose()) * sigma) * delta;
        self.scale = (&updated + updated.transpose()) * 0.5;
        Ok(true)
    }

    /// Exact cut of a one-dimensional ellipsoid (an interval).
    fn cut_interval(&mut self, hyperplane: &HyperPlane) {
        let c = self.center[0];
        let r = self.scale[(0, 0)].sqrt();
        let (mut lo, mut hi) = (c - r, c + r);
        let w = hyperplane.weights()[0];
        let root = -hyperplane.bias() / w;
        if w > 0.0 {
            hi = hi.min(root);
        } else {
            lo = lo.max(root);
        }
        let half = 0.5 * (hi - lo);
        self.center[0] = 0.5 * (lo + hi);
        self.scale[(0, 0)] = half * half;
    }

    /// Embed this ellipsoid one dimension up, for a body that gained a
    /// coordinate.
    ///
    /// The center is zero-padded, the new axis gets scale `d` (the previous
    /// dimension), and the whole shape is inflated by `1 + 1/d`.
    pub fn extend_dimension(&self) -> Ellipsoid {
        let d = self.dim();
        let mut scale = Matrix::zeros(d + 1, d + 1);
        scale.view_mut((0, 0), (d, d)).copy_from(&self.scale);
        scale[(d, d)] = d as f64;
        scale *= 1.0 + 1.0 / d as f64;

        Ellipsoid {
            center: crate::types::resize(&self.center, d + 1),
            scale,
        }
    }
}

pub(crate) fn is_symmetric(m: &Matrix) -> bool {
    let tol = SYMMETRY_TOLERANCE * (1.0 + m.amax());
    (m - m.transpose()).amax() <= tol
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a vector of `dim` coordinates in [-1, 1]
    fn unit_box(dim: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0f64..1.0, dim)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// A cut never loses a point of the kept half-space
        #[test]
        fn prop_cut_keeps_halfspace(
            weights in unit_box(3),
            bias in -0.9f64..0.9,
            points in prop::collection::vec(unit_box(3), 20),
        ) {
            let weights = Vector::from_vec(weights);
            prop_assume!(weights.norm() > 1e-3);
            let hyperplane = HyperPlane::new(bias, weights);

            let mut ellipsoid = Ellipsoid::ball(3, 1.0).unwrap();
            let original = ellipsoid.clone();
            match ellipsoid.cut(&hyperplane) {
                Ok(_) => {}
                Err(_) => return Ok(()),
            }

            for p in points {
                let x = Vector::from_vec(p);
                if original.contains(&x).unwrap() && hyperplane.margin(&x) <= 0.0 {
                    prop_assert!(ellipsoid.contains(&x).unwrap(), "{} escaped", x);
                }
            }
        }

        /// Cuts keep the shape matrix positive definite
        #[test]
        fn prop_cut_keeps_shape_positive_definite(
            weights in unit_box(4),
            bias in -0.5f64..0.5,
        ) {
            let weights = Vector::from_vec(weights);
            prop_assume!(weights.norm() > 1e-3);
            let mut ellipsoid = Ellipsoid::ball(4, 1.0).unwrap();
            if ellipsoid.cut(&HyperPlane::new(bias, weights)).is_ok() {
                prop_assert!(ellipsoid.cholesky_factor().is_ok());
            }
        }
    }
}
