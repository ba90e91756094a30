//! Geodesics and geodesic segments.

use crate::constants::{MIN_NORM_EPSILON, TANGENT_TOLERANCE};
use crate::error::{check_dim, Result, VersionSpaceError};
use crate::types::Vector;

use super::Manifold;

/// A curve `t ↦ γ(t)` through `center` with initial velocity `velocity`.
///
/// - Line: γ(t) = c + t·v
/// - Great circle: γ(t) = c·cos(t) + v·sin(t), with c and v re-normalized
///   to unit length at construction
#[derive(Debug, Clone, PartialEq)]
pub struct Geodesic {
    manifold: Manifold,
    center: Vector,
    velocity: Vector,
}

impl Geodesic {
    /// Create a geodesic confined to `manifold`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if center and velocity have different lengths
    /// - `Validation` if, on the sphere, the center is zero or the velocity is
    ///   not orthogonal to the center
    /// - `Geometry` if, on the sphere, the velocity is numerically zero
    pub fn new(manifold: Manifold, center: Vector, velocity: Vector) -> Result<Self> {
        check_dim(center.len(), velocity.len())?;

        match manifold {
            Manifold::Euclidean => Ok(Self {
                manifold,
                center,
                velocity,
            }),
            Manifold::UnitSphere => {
                let center_norm = center.norm();
                if center_norm < MIN_NORM_EPSILON {
                    return Err(VersionSpaceError::validation(
                        "great circle center must be non-zero",
                    ));
                }
                let velocity_norm = velocity.norm();
                if velocity_norm < MIN_NORM_EPSILON {
                    return Err(VersionSpaceError::geometry(
                        "great circle velocity is numerically zero",
                    ));
                }

                let center = center / center_norm;
                let velocity = velocity / velocity_norm;
                let cos_angle = center.dot(&velocity);
                if cos_angle.abs() > TANGENT_TOLERANCE {
                    return Err(VersionSpaceError::Validation(format!(
                        "velocity is not tangent to the sphere at center (cos angle = {cos_angle:e})"
                    )));
                }

                Ok(Self {
                    manifold,
                    center,
                    velocity,
                })
            }
        }
    }

    /// Manifold this geodesic lives on.
    pub fn manifold(&self) -> Manifold {
        self.manifold
    }

    /// Point at t = 0.
    pub fn center(&self) -> &Vector {
        &self.center
    }

    /// Velocity at t = 0.
    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    /// Ambient dimension.
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point(&self, t: f64) -> Vector {
        match self.manifold {
            Manifold::Euclidean => &self.center + &self.velocity * t,
            Manifold::UnitSphere => &self.center * t.cos() + &self.velocity * t.sin(),
        }
    }

    /// Restrict this geodesic to `[lower, upper]`.
    pub fn segment(&self, lower: f64, upper: f64) -> Result<GeodesicSegment<'_>> {
        GeodesicSegment::new(self, lower, upper)
    }
}

/// A bounded piece `{γ(t) : lower ≤ t ≤ upper}` of a geodesic.
///
/// Bounds are finite and `lower < upper`; an empty or unbounded interval can
/// never be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicSegment<'a> {
    geodesic: &'a Geodesic,
    lower: f64,
    upper: f64,
}

impl<'a> GeodesicSegment<'a> {
    /// Create a segment of `geodesic`.
    ///
    /// # Errors
    ///
    /// `Geometry` if a bound is not finite or the interval is empty.
    pub fn new(geodesic: &'a Geodesic, lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(VersionSpaceError::Geometry(format!(
                "segment bounds must be finite, got [{lower}, {upper}]"
            )));
        }
        if lower >= upper {
            return Err(VersionSpaceError::Geometry(format!(
                "empty segment [{lower}, {upper}]"
            )));
        }
        Ok(Self {
            geodesic,
            lower,
            upper,
        })
    }

    /// Lower parameter bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper parameter bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Underlying geodesic.
    pub fn geodesic(&self) -> &'a Geodesic {
        self.geodesic
    }

    /// Point at `lower + proportion · (upper − lower)`, for proportion in [0, 1].
    pub fn point(&self, proportion: f64) -> Result<Vector> {
        if !(0.0..=1.0).contains(&proportion) {
            return Err(VersionSpaceError::Validation(format!(
                "proportion must be in [0, 1], got {proportion}"
            )));
        }
        Ok(self
            .geodesic
            .point(self.lower + proportion * (self.upper - self.lower)))
    }

    /// Intersection of two segments of the same geodesic.
    pub fn intersect(&self, other: &GeodesicSegment<'_>) -> Result<GeodesicSegment<'a>> {
        if self.geodesic != other.geodesic {
            return Err(VersionSpaceError::validation(
                "cannot intersect segments of different geodesics",
            ));
        }
        GeodesicSegment::new(
            self.geodesic,
            self.lower.max(other.lower),
            self.upper.min(other.upper),
        )
    }
}
