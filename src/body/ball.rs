//! Polyhedral cone intersected with the open unit ball.

use std::sync::Arc;

use crate::constants::UNIT_BALL_INTERIOR_NORM;
use crate::error::{Result, VersionSpaceError};
use crate::linprog::LinearProgramSolverFactory;
use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
use crate::types::{Matrix, Vector};

use super::cone::require_line;
use super::{ConvexBody, Ellipsoid, HyperPlane, PolyhedralCone};

/// Euclidean version space `{x : A·x > 0, ‖x‖ < 1}`.
#[derive(Debug, Clone)]
pub struct UnitBallPolyhedralCone {
    cone: PolyhedralCone,
}

impl UnitBallPolyhedralCone {
    /// Create the body from its constraint matrix.
    pub fn new(matrix: Matrix, solver: Arc<dyn LinearProgramSolverFactory>) -> Result<Self> {
        Ok(Self {
            cone: PolyhedralCone::new(matrix, solver)?,
        })
    }

    /// Create the body with the default LP backend.
    pub fn with_default_solver(matrix: Matrix) -> Result<Self> {
        Ok(Self {
            cone: PolyhedralCone::with_default_solver(matrix)?,
        })
    }

    /// Underlying cone.
    pub fn cone(&self) -> &PolyhedralCone {
        &self.cone
    }

    /// Radius of the ball.
    pub fn radius(&self) -> f64 {
        1.0
    }
}

impl ConvexBody for UnitBallPolyhedralCone {
    fn dim(&self) -> usize {
        self.cone.dim()
    }

    fn manifold(&self) -> Manifold {
        Manifold::Euclidean
    }

    fn is_inside(&self, x: &Vector) -> bool {
        x.len() == self.dim() && x.norm_squared() < 1.0 && self.cone.is_inside(x)
    }

    fn interior_point(&self) -> Result<Vector> {
        let point = self.cone.interior_point()?;
        Ok(&point * (UNIT_BALL_INTERIOR_NORM / point.norm()))
    }

    fn compute_intersection<'g>(&self, geodesic: &'g Geodesic) -> Result<GeodesicSegment<'g>> {
        require_line(self, geodesic)?;
        let center = geodesic.center();
        let velocity = geodesic.velocity();

        // ‖c + t·v‖² = 1
        let (lower, upper) = solve_quadratic(
            velocity.norm_squared(),
            2.0 * center.dot(velocity),
            center.norm_squared() - 1.0,
        )?;
        let (lower, upper) = self.cone.clip_line(center, velocity, lower, upper)?;
        geodesic.segment(lower, upper)
    }

    fn separating_hyperplane(&self, x: &Vector) -> Option<HyperPlane> {
        let norm = x.norm();
        if norm >= 1.0 {
            return Some(HyperPlane::new(-1.0, x / norm));
        }
        self.cone.most_violated(x)
    }

    fn containing_ellipsoid(&self) -> Result<Ellipsoid> {
        Ellipsoid::ball(self.dim(), self.radius())
    }
}

/// Distinct real roots `r₁ < r₂` of `a·t² + b·t + c = 0`.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Result<(f64, f64)> {
    if a == 0.0 {
        return Err(VersionSpaceError::geometry("direction is numerically zero"));
    }
    let discriminant = b * b - 4.0 * a * c;
    if !(discriminant > 0.0) {
        return Err(VersionSpaceError::Geometry(format!(
            "line does not cross the unit sphere (discriminant = {discriminant})"
        )));
    }
    // Avoid cancellation between -b and √Δ
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let (r1, r2) = if q == 0.0 {
        let half = 0.5 * discriminant.sqrt() / a;
        (-half, half)
    } else {
        (q / a, c / q)
    };
    Ok((r1.min(r2), r1.max(r2)))
}
