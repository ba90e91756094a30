//! `minilp` backend.

use ::minilp::{ComparisonOp, Error as MinilpError, LinearExpr, OptimizationDirection, Problem};

use crate::error::{check_dim, Result, VersionSpaceError};

use super::{InequalitySign, LinearProgramSolver, LinearProgramSolverFactory};

/// Linear program solved with the `minilp` dense simplex.
///
/// Variables are free (unbounded) until [`set_lower`](LinearProgramSolver::set_lower)
/// or [`set_upper`](LinearProgramSolver::set_upper) is called.
#[derive(Debug, Clone)]
pub struct MinilpSolver {
    objective: Vec<f64>,
    constraints: Vec<(Vec<f64>, InequalitySign, f64)>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl MinilpSolver {
    /// Create an empty program over `dim` variables.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(VersionSpaceError::validation(
                "linear program needs at least one variable",
            ));
        }
        Ok(Self {
            objective: vec![0.0; dim],
            constraints: Vec::new(),
            lower: vec![f64::NEG_INFINITY; dim],
            upper: vec![f64::INFINITY; dim],
        })
    }
}

impl LinearProgramSolver for MinilpSolver {
    fn dim(&self) -> usize {
        self.objective.len()
    }

    fn set_objective_function(&mut self, vector: &[f64]) -> Result<()> {
        check_dim(self.dim(), vector.len())?;
        self.objective = vector.to_vec();
        Ok(())
    }

    fn add_linear_constraint(
        &mut self,
        vector: &[f64],
        sign: InequalitySign,
        bound: f64,
    ) -> Result<()> {
        check_dim(self.dim(), vector.len())?;
        self.constraints.push((vector.to_vec(), sign, bound));
        Ok(())
    }

    fn set_lower(&mut self, vector: &[f64]) -> Result<()> {
        check_dim(self.dim(), vector.len())?;
        self.lower = vector.to_vec();
        Ok(())
    }

    fn set_upper(&mut self, vector: &[f64]) -> Result<()> {
        check_dim(self.dim(), vector.len())?;
        self.upper = vector.to_vec();
        Ok(())
    }

    fn find_minimizer(&mut self) -> Result<Vec<f64>> {
        let mut problem = Problem::new(OptimizationDirection::Minimize);

        let vars: Vec<_> = (0..self.dim())
            .map(|i| problem.add_var(self.objective[i], (self.lower[i], self.upper[i])))
            .collect();

        for (coefficients, sign, bound) in &self.constraints {
            let mut expr = LinearExpr::empty();
            for (var, &coeff) in vars.iter().zip(coefficients.iter()) {
                if coeff != 0.0 {
                    expr.add(*var, coeff);
                }
            }
            let op = match sign {
                InequalitySign::LessOrEqual => ComparisonOp::Le,
                InequalitySign::GreaterOrEqual => ComparisonOp::Ge,
            };
            problem.add_constraint(expr, op, *bound);
        }

        let solution = problem.solve().map_err(|err| match err {
            MinilpError::Infeasible => VersionSpaceError::Infeasible,
            MinilpError::Unbounded => VersionSpaceError::Unbounded,
        })?;

        Ok(vars.iter().map(|var| solution[*var]).collect())
    }
}

/// Factory for [`MinilpSolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinilpFactory;

impl LinearProgramSolverFactory for MinilpFactory {
    fn create(&self, dim: usize) -> Result<Box<dyn LinearProgramSolver>> {
        Ok(Box::new(MinilpSolver::new(dim)?))
    }
}
