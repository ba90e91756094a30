//! Polyhedral cone `{x : A·x > 0}`.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::constants::INTERIOR_SLACK;
use crate::error::{Result, VersionSpaceError};
use crate::linprog::{InequalitySign, LinearProgramSolverFactory, MinilpFactory};
use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
use crate::types::{Matrix, Vector};

use super::{ConvexBody, Ellipsoid, HyperPlane};

/// Open polyhedral cone `{x : aᵢ·x > 0 for every row aᵢ of A}`.
///
/// The interior point is found by the feasibility program
///
/// ```text
/// minimize s  subject to  s + aᵢ·x ≥ 0,  −1 ≤ s, xⱼ ≤ 1
/// ```
///
/// whose optimum has `s* < 0` exactly when the cone has a non-empty interior.
/// The program is solved at most once per cone.
#[derive(Debug, Clone)]
pub struct PolyhedralCone {
    matrix: Matrix,
    solver: Arc<dyn LinearProgramSolverFactory>,
    interior: OnceLock<Vector>,
}

impl PolyhedralCone {
    /// Create the cone of constraint matrix `matrix` (one row per constraint).
    ///
    /// # Errors
    ///
    /// `Validation` if the matrix is empty or has non-finite entries.
    pub fn new(matrix: Matrix, solver: Arc<dyn LinearProgramSolverFactory>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(VersionSpaceError::Validation(format!(
                "constraint matrix must be non-empty, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(VersionSpaceError::validation(
                "constraint matrix has non-finite entries",
            ));
        }
        Ok(Self {
            matrix,
            solver,
            interior: OnceLock::new(),
        })
    }

    /// Create a cone whose interior point is found with [`MinilpFactory`].
    pub fn with_default_solver(matrix: Matrix) -> Result<Self> {
        Self::new(matrix, Arc::new(MinilpFactory))
    }

    /// Constraint matrix A.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.matrix.nrows()
    }

    fn solve_feasibility_program(&self) -> Result<Vector> {
        let dim = self.matrix.ncols();
        debug!(
            constraints = self.matrix.nrows(),
            dim, "solving feasibility linear program"
        );

        let mut solver = self.solver.create(dim + 1)?;

        let mut objective = vec![0.0; dim + 1];
        objective[0] = 1.0;
        solver.set_objective_function(&objective)?;

        let mut constraint = vec![1.0; dim + 1];
        for row in self.matrix.row_iter() {
            for (slot, &value) in constraint[1..].iter_mut().zip(row.iter()) {
                *slot = value;
            }
            solver.add_linear_constraint(&constraint, InequalitySign::GreaterOrEqual, 0.0)?;
        }
        solver.set_lower(&vec![-1.0; dim + 1])?;
        solver.set_upper(&vec![1.0; dim + 1])?;

        let solution = solver.find_minimizer()?;
        let slack = solution[0];
        if slack >= -INTERIOR_SLACK {
            debug!(slack, "version space has empty interior");
            return Err(VersionSpaceError::Infeasible);
        }

        let point = Vector::from_row_slice(&solution[1..]);
        if !self.is_inside(&point) {
            return Err(VersionSpaceError::Infeasible);
        }
        Ok(point)
    }

    /// Clip the parameter interval `[lower, upper]` of the line `c + t·v` to
    /// the cone.
    pub(crate) fn clip_line(
        &self,
        center: &Vector,
        velocity: &Vector,
        mut lower: f64,
        mut upper: f64,
    ) -> Result<(f64, f64)> {
        let numerators = &self.matrix * center;
        let denominators = &self.matrix * velocity;

        for (&num, &den) in numerators.iter().zip(denominators.iter()) {
            if den > 0.0 {
                lower = lower.max(-num / den);
            } else if den < 0.0 {
                upper = upper.min(-num / den);
            } else if num <= 0.0 {
                return Err(VersionSpaceError::geometry(
                    "line is parallel to a constraint it violates",
                ));
            }
        }
        Ok((lower, upper))
    }

    /// Row with the smallest margin aᵢ·x, if that margin is not positive.
    pub(crate) fn most_violated(&self, x: &Vector) -> Option<HyperPlane> {
        let margins = &self.matrix * x;
        let (index, &margin) = margins
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))?;
        if margin > 0.0 {
            return None;
        }
        Some(HyperPlane::new(0.0, -self.matrix.row(index).transpose()))
    }
}

impl ConvexBody for PolyhedralCone {
    fn dim(&self) -> usize {
        self.matrix.ncols()
    }

    fn manifold(&self) -> Manifold {
        Manifold::Euclidean
    }

    fn is_inside(&self, x: &Vector) -> bool {
        x.len() == self.dim() && (&self.matrix * x).iter().all(|&m| m > 0.0)
    }

    fn interior_point(&self) -> Result<Vector> {
        if let Some(point) = self.interior.get() {
            return Ok(point.clone());
        }
        let point = self.solve_feasibility_program()?;
        let _ = self.interior.set(point.clone());
        Ok(point)
    }

    fn compute_intersection<'g>(&self, geodesic: &'g Geodesic) -> Result<GeodesicSegment<'g>> {
        require_line(self, geodesic)?;
        let (lower, upper) = self.clip_line(
            geodesic.center(),
            geodesic.velocity(),
            f64::NEG_INFINITY,
            f64::INFINITY,
        )?;
        geodesic.segment(lower, upper)
    }

    fn separating_hyperplane(&self, x: &Vector) -> Option<HyperPlane> {
        self.most_violated(x)
    }

    fn containing_ellipsoid(&self) -> Result<Ellipsoid> {
        Err(VersionSpaceError::validation(
            "an unbounded cone has no containing ellipsoid",
        ))
    }
}

/// Fail unless `geodesic` is a line of the same dimension as `body`.
pub(super) fn require_line<B: ConvexBody + ?Sized>(body: &B, geodesic: &Geodesic) -> Result<()> {
    crate::error::check_dim(body.dim(), geodesic.dim())?;
    if geodesic.manifold() != Manifold::Euclidean {
        return Err(VersionSpaceError::Validation(format!(
            "euclidean body cannot intersect a geodesic on the {}",
            geodesic.manifold().name()
        )));
    }
    Ok(())
}
