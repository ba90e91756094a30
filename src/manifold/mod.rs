//! Ambient spaces for version-space sampling.
//!
//! A [`Manifold`] is a stateless description of where hypotheses live:
//! - [`Manifold::Euclidean`]: flat ℝᵈ, geodesics are straight lines
//! - [`Manifold::UnitSphere`]: Sᵈ⁻¹ ⊂ ℝᵈ, geodesics are great circles
//!
//! Both variants are plain values; copying one is free and two instances of
//! the same variant are interchangeable.

mod geodesic;

pub use geodesic::{Geodesic, GeodesicSegment};

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::constants::SPHERE_TOLERANCE;
use crate::error::Result;
use crate::types::Vector;

/// Ambient space of a convex body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Manifold {
    /// Euclidean space with no curvature constraint.
    #[default]
    Euclidean,
    /// Unit sphere: points have unit norm, tangents are orthogonal to the point.
    UnitSphere,
}

impl Manifold {
    /// Build the geodesic through `center` with initial velocity `velocity`.
    ///
    /// On the sphere, `velocity` must be orthogonal to `center`; otherwise a
    /// validation error is returned.
    pub fn geodesic(&self, center: Vector, velocity: Vector) -> Result<Geodesic> {
        Geodesic::new(*self, center, velocity)
    }

    /// Draw a random tangent vector at `point`.
    ///
    /// Euclidean: an isotropic standard-normal vector Z.
    /// Sphere: Z − ⟨Z, p⟩p, the projection of Z onto the tangent plane at p.
    ///
    /// The result is **not** normalized.
    pub fn sample_velocity<R: Rng + ?Sized>(&self, point: &Vector, rng: &mut R) -> Vector {
        let z = standard_normal_vector(point.len(), rng);
        match self {
            Manifold::Euclidean => z,
            Manifold::UnitSphere => {
                let prod = z.dot(point);
                z - point * prod
            }
        }
    }

    /// Check if point lies on the manifold (within tolerance).
    pub fn is_on_manifold(&self, x: &Vector) -> bool {
        match self {
            Manifold::Euclidean => x.iter().all(|v| v.is_finite()),
            Manifold::UnitSphere => (x.norm_squared() - 1.0).abs() < SPHERE_TOLERANCE,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Manifold::Euclidean => "euclidean",
            Manifold::UnitSphere => "unit sphere",
        }
    }
}

/// Sample a vector of i.i.d. standard normal entries.
pub(crate) fn standard_normal_vector<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Vector {
    Vector::from_fn(dim, |_, _| rng.sample(StandardNormal))
}
