//! Convex bodies: the version space and its geometric queries.
//!
//! A version space is the set of hypotheses consistent with every label,
//! which for linear classifiers is a polyhedral cone `{w : A·w > 0}`. The
//! cone is unbounded, so it is intersected with the unit ball (Euclidean
//! sampling) or the unit sphere (spherical sampling):
//!
//! - [`PolyhedralCone`]: the bare cone, owner of the feasibility LP
//! - [`UnitBallPolyhedralCone`]: cone ∩ {‖w‖ < 1}
//! - [`UnitSpherePolyhedralCone`]: cone ∩ {‖w‖ = 1}
//!
//! Bodies are immutable after construction apart from the lazily computed
//! interior point.

mod ball;
mod cone;
mod ellipsoid;
mod sphere;

pub use ball::UnitBallPolyhedralCone;
pub use cone::PolyhedralCone;
pub use ellipsoid::{Ellipsoid, HyperPlane};
pub(crate) use ellipsoid::is_symmetric;
pub use sphere::UnitSpherePolyhedralCone;

use std::fmt;

use nalgebra::SymmetricEigen;

use crate::error::{check_dim, Result, VersionSpaceError};
use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
use crate::types::Vector;

/// A convex region of hypotheses embedded in a [`Manifold`].
pub trait ConvexBody: fmt::Debug + Send + Sync {
    /// Dimension of the ambient space.
    fn dim(&self) -> usize;

    /// Manifold the body lives on.
    fn manifold(&self) -> Manifold;

    /// Whether `x` lies in the interior of the body.
    ///
    /// Vectors of the wrong dimension are never inside.
    fn is_inside(&self, x: &Vector) -> bool;

    /// A point strictly inside the body.
    ///
    /// # Errors
    ///
    /// `Infeasible` if the body has an empty interior.
    fn interior_point(&self) -> Result<Vector>;

    /// The part of `geodesic` that lies inside the body.
    ///
    /// # Errors
    ///
    /// `Geometry` if the geodesic misses the body or the intersection is not a
    /// bounded, non-empty interval. `Validation` if the geodesic lives on a
    /// different manifold.
    fn compute_intersection<'g>(&self, geodesic: &'g Geodesic) -> Result<GeodesicSegment<'g>>;

    /// A hyperplane `h` with `h(x) ≥ 0` and `h ≤ 0` on the body, or `None` if
    /// `x` is inside.
    fn separating_hyperplane(&self, x: &Vector) -> Option<HyperPlane>;

    /// An ellipsoid containing the whole body.
    fn containing_ellipsoid(&self) -> Result<Ellipsoid>;

    /// Try to shrink `ellipsoid` while keeping the body inside it.
    ///
    /// If the center lies outside the body, the ellipsoid is cut by the
    /// separating hyperplane at the center. Otherwise the points
    /// `c ± √λᵢ/(n+1)·uᵢ` along each eigen-axis are probed, and the first one
    /// outside the body yields a shallow cut.
    ///
    /// Returns whether the ellipsoid changed; `false` is the normal
    /// termination signal of the rounding loop.
    fn attempt_to_reduce_ellipsoid(&self, ellipsoid: &mut Ellipsoid) -> Result<bool> {
        reduce_by_probing(self, ellipsoid)
    }
}

/// Shallow-cut reduction shared by the Euclidean bodies.
fn reduce_by_probing<B: ConvexBody + ?Sized>(body: &B, ellipsoid: &mut Ellipsoid) -> Result<bool> {
    check_dim(body.dim(), ellipsoid.dim())?;
    let n = body.dim();
    if n < 2 {
        return Ok(false);
    }

    if let Some(hyperplane) = body.separating_hyperplane(ellipsoid.center()) {
        return ellipsoid.cut(&hyperplane);
    }

    let eigen = SymmetricEigen::new(ellipsoid.scale().clone());
    let center = ellipsoid.center().clone();
    for (i, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if !(lambda > 0.0) {
            return Err(VersionSpaceError::Geometry(format!(
                "ellipsoid shape has non-positive eigenvalue {lambda}"
            )));
        }
        let step = eigen.eigenvectors.column(i) * (lambda.sqrt() / (n as f64 + 1.0));
        for probe in [&center + &step, &center - &step] {
            if let Some(hyperplane) = body.separating_hyperplane(&probe) {
                return ellipsoid.cut(&hyperplane);
            }
        }
    }
    Ok(false)
}
