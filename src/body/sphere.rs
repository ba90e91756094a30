//! Polyhedral cone intersected with the unit sphere.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::{check_dim, Result, VersionSpaceError};
use crate::linprog::LinearProgramSolverFactory;
use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
use crate::types::{Matrix, Vector};

use super::{ConvexBody, Ellipsoid, HyperPlane, PolyhedralCone};

/// Spherical version space `{x : A·x > 0, ‖x‖ = 1}`.
///
/// Lines are replaced by great circles. Rounding does not apply here: the
/// body never reduces an ellipsoid.
#[derive(Debug, Clone)]
pub struct UnitSpherePolyhedralCone {
    cone: PolyhedralCone,
}

impl UnitSpherePolyhedralCone {
    /// Create the body from its constraint matrix.
    ///
    /// # Errors
    ///
    /// `Validation` if the matrix has fewer than two columns (a 0-sphere has
    /// no great circles).
    pub fn new(matrix: Matrix, solver: Arc<dyn LinearProgramSolverFactory>) -> Result<Self> {
        Self::from_cone(PolyhedralCone::new(matrix, solver)?)
    }

    /// Create the body with the default LP backend.
    pub fn with_default_solver(matrix: Matrix) -> Result<Self> {
        Self::from_cone(PolyhedralCone::with_default_solver(matrix)?)
    }

    fn from_cone(cone: PolyhedralCone) -> Result<Self> {
        if cone.dim() < 2 {
            return Err(VersionSpaceError::Validation(format!(
                "spherical version space needs dimension >= 2, got {}",
                cone.dim()
            )));
        }
        Ok(Self { cone })
    }

    /// Underlying cone.
    pub fn cone(&self) -> &PolyhedralCone {
        &self.cone
    }
}

impl ConvexBody for UnitSpherePolyhedralCone {
    fn dim(&self) -> usize {
        self.cone.dim()
    }

    fn manifold(&self) -> Manifold {
        Manifold::UnitSphere
    }

    fn is_inside(&self, x: &Vector) -> bool {
        x.len() == self.dim() && Manifold::UnitSphere.is_on_manifold(x) && self.cone.is_inside(x)
    }

    fn interior_point(&self) -> Result<Vector> {
        let point = self.cone.interior_point()?;
        Ok(point.normalize())
    }

    /// Arc of the great circle inside the cone.
    ///
    /// With `aᵢ = A·c` and `bᵢ = A·v`, row i holds for `aᵢ cos t + bᵢ sin t > 0`,
    /// i.e. for t in `(θᵢ, θᵢ + π)` with `θᵢ = atan2(−aᵢ, bᵢ)`.
    fn compute_intersection<'g>(&self, geodesic: &'g Geodesic) -> Result<GeodesicSegment<'g>> {
        check_dim(self.dim(), geodesic.dim())?;
        if geodesic.manifold() != Manifold::UnitSphere {
            return Err(VersionSpaceError::validation(
                "spherical body cannot intersect a straight line",
            ));
        }
        if !self.is_inside(geodesic.center()) {
            return Err(VersionSpaceError::geometry(
                "great circle must start inside the body",
            ));
        }

        let a = self.cone.matrix() * geodesic.center();
        let b = self.cone.matrix() * geodesic.velocity();

        let (mut lower, mut upper) = (-PI, PI);
        for (&ai, &bi) in a.iter().zip(b.iter()) {
            let mut angle = (-ai).atan2(bi);
            if angle > 0.0 {
                angle -= 2.0 * PI;
            }
            lower = lower.max(angle);
            upper = upper.min(angle + PI);
        }
        geodesic.segment(lower, upper)
    }

    fn separating_hyperplane(&self, x: &Vector) -> Option<HyperPlane> {
        self.cone.most_violated(x)
    }

    fn containing_ellipsoid(&self) -> Result<Ellipsoid> {
        Ellipsoid::ball(self.dim(), 1.0)
    }

    fn attempt_to_reduce_ellipsoid(&self, ellipsoid: &mut Ellipsoid) -> Result<bool> {
        check_dim(self.dim(), ellipsoid.dim())?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(values: &[f64]) -> Vector {
        Vector::from_row_slice(values)
    }

    fn octant() -> UnitSpherePolyhedralCone {
        let a = Matrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0]);
        UnitSpherePolyhedralCone::with_default_solver(a).unwrap()
    }

    #[test]
    fn test_great_circle_intersection() {
        let body = octant();
        let circle = Manifold::UnitSphere
            .geodesic(v(&[1.0, -1.0, 1.0]), v(&[1.0, 1.0, 0.0]))
            .unwrap();
        let segment = body.compute_intersection(&circle).unwrap();

        let bound = 2.0_f64.sqrt().atan2(3.0_f64.sqrt());
        assert!((segment.lower() + bound).abs() < 1e-12);
        assert!((segment.upper() - bound).abs() < 1e-12);
    }

    #[test]
    fn test_arc_points_are_inside() {
        let body = octant();
        let circle = Manifold::UnitSphere
            .geodesic(v(&[1.0, -1.0, 1.0]), v(&[1.0, 1.0, 0.0]))
            .unwrap();
        let segment = body.compute_intersection(&circle).unwrap();
        for p in [0.01, 0.3, 0.5, 0.7, 0.99] {
            assert!(body.is_inside(&segment.point(p).unwrap()));
        }
    }

    #[test]
    fn test_center_outside_is_geometry_error() {
        let body = octant();
        let circle = Manifold::UnitSphere
            .geodesic(v(&[-1.0, -1.0, 1.0]), v(&[1.0, 0.0, 1.0]))
            .unwrap();
        assert!(matches!(
            body.compute_intersection(&circle),
            Err(VersionSpaceError::Geometry(_))
        ));
    }

    #[test]
    fn test_rejects_straight_line() {
        let body = octant();
        let line = Manifold::Euclidean
            .geodesic(v(&[0.5, -0.5, 0.5]), v(&[1.0, 1.0, 0.0]))
            .unwrap();
        assert!(matches!(
            body.compute_intersection(&line),
            Err(VersionSpaceError::Validation(_))
        ));
    }

    #[test]
    fn test_interior_point_is_on_sphere() {
        let body = octant();
        let x = body.interior_point().unwrap();
        assert!(body.is_inside(&x));
        assert!((x.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_membership_requires_unit_norm() {
        let body = octant();
        assert!(!body.is_inside(&v(&[0.5, -0.5, 0.5])));
        assert!(body.is_inside(&v(&[1.0, -1.0, 1.0]).normalize()));
    }

    #[test]
    fn test_never_reduces() {
        let body = octant();
        let mut e = body.containing_ellipsoid().unwrap();
        let before = e.clone();
        assert!(!body.attempt_to_reduce_ellipsoid(&mut e).unwrap());
        assert_eq!(e, before);
    }

    #[test]
    fn test_requires_two_dimensions() {
        assert!(UnitSpherePolyhedralCone::with_default_solver(Matrix::identity(1, 1)).is_err());
    }
}
