//! Linear programming contract used to find interior points.
//!
//! A linear program here is
//!
//! ```text
//! minimize ⟨c, x⟩  subject to  ⟨aᵢ, x⟩ (≤ | ≥) bᵢ  and  L ≤ x ≤ U
//! ```
//!
//! The sampling engine depends only on [`LinearProgramSolver`]; backends are
//! interchangeable through [`LinearProgramSolverFactory`]. The crate ships
//! [`MinilpSolver`], backed by the `minilp` simplex implementation.

mod backend;

pub use backend::{MinilpFactory, MinilpSolver};

use std::fmt;

use crate::error::Result;

/// Direction of a linear inequality constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InequalitySign {
    /// ⟨a, x⟩ ≤ b
    LessOrEqual,
    /// ⟨a, x⟩ ≥ b
    GreaterOrEqual,
}

/// A single linear program being assembled and solved.
///
/// All vectors must have the dimension the solver was created with; a
/// mismatch is reported as [`crate::VersionSpaceError::DimensionMismatch`].
pub trait LinearProgramSolver {
    /// Number of variables.
    fn dim(&self) -> usize;

    /// Set the objective vector c.
    fn set_objective_function(&mut self, vector: &[f64]) -> Result<()>;

    /// Add the constraint ⟨vector, x⟩ `sign` `bound`.
    fn add_linear_constraint(
        &mut self,
        vector: &[f64],
        sign: InequalitySign,
        bound: f64,
    ) -> Result<()>;

    /// Set the lower bound of every variable.
    fn set_lower(&mut self, vector: &[f64]) -> Result<()>;

    /// Set the upper bound of every variable.
    fn set_upper(&mut self, vector: &[f64]) -> Result<()>;

    /// Solve the program and return a minimizer.
    ///
    /// # Errors
    ///
    /// `Infeasible` when no point satisfies the constraints, `Unbounded` when
    /// the objective has no lower bound.
    fn find_minimizer(&mut self) -> Result<Vec<f64>>;
}

/// Creates fresh solvers of a given dimension.
pub trait LinearProgramSolverFactory: fmt::Debug + Send + Sync {
    /// Create an empty program over `dim` variables.
    fn create(&self, dim: usize) -> Result<Box<dyn LinearProgramSolver>>;
}
