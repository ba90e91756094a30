//! Reuse of results across active-learning iterations.
//!
//! Consecutive version spaces differ by a single constraint, so samples and
//! ellipsoids from the previous iteration are usually good starting points
//! for the next one:
//!
//! - [`SampleCache`]: the last sample batch; any cached sample still inside
//!   the new body replaces the LP interior point
//! - [`EllipsoidCache`]: the last fitted ellipsoid; reused as the starting
//!   ellipsoid of rounding when the body gained one dimension
//!
//! Both hand their result to the sampler through [`CachedBody`], which
//! overrides a single query of a body and delegates everything else.

use tracing::debug;

use crate::body::{ConvexBody, Ellipsoid, HyperPlane};
use crate::error::Result;
use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
use crate::types::{resize, Vector};

// =============================================================================
// CachedBody
// =============================================================================

/// A body with an optional precomputed interior point and containing
/// ellipsoid.
#[derive(Debug, Clone)]
pub struct CachedBody<'a> {
    body: &'a dyn ConvexBody,
    interior_point: Option<Vector>,
    containing_ellipsoid: Option<Ellipsoid>,
}

impl<'a> CachedBody<'a> {
    /// Wrap `body` without overriding anything.
    pub fn new(body: &'a dyn ConvexBody) -> Self {
        Self {
            body,
            interior_point: None,
            containing_ellipsoid: None,
        }
    }

    /// Override [`ConvexBody::interior_point`].
    pub fn with_interior_point(mut self, point: Vector) -> Self {
        self.interior_point = Some(point);
        self
    }

    /// Override [`ConvexBody::containing_ellipsoid`].
    pub fn with_containing_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.containing_ellipsoid = Some(ellipsoid);
        self
    }

    /// Wrapped body.
    pub fn inner(&self) -> &'a dyn ConvexBody {
        self.body
    }

    /// Whether the interior point comes from a cache.
    pub fn has_cached_interior_point(&self) -> bool {
        self.interior_point.is_some()
    }

    /// Whether the containing ellipsoid comes from a cache.
    pub fn has_cached_ellipsoid(&self) -> bool {
        self.containing_ellipsoid.is_some()
    }
}

impl ConvexBody for CachedBody<'_> {
    fn dim(&self) -> usize {
        self.body.dim()
    }

    fn manifold(&self) -> Manifold {
        self.body.manifold()
    }

    fn is_inside(&self, x: &Vector) -> bool {
        self.body.is_inside(x)
    }

    fn interior_point(&self) -> Result<Vector> {
        match &self.interior_point {
            Some(point) => Ok(point.clone()),
            None => self.body.interior_point(),
        }
    }

    fn compute_intersection<'g>(&self, geodesic: &'g Geodesic) -> Result<GeodesicSegment<'g>> {
        self.body.compute_intersection(geodesic)
    }

    fn separating_hyperplane(&self, x: &Vector) -> Option<HyperPlane> {
        self.body.separating_hyperplane(x)
    }

    fn containing_ellipsoid(&self) -> Result<Ellipsoid> {
        match &self.containing_ellipsoid {
            Some(ellipsoid) => Ok(ellipsoid.clone()),
            None => self.body.containing_ellipsoid(),
        }
    }

    fn attempt_to_reduce_ellipsoid(&self, ellipsoid: &mut Ellipsoid) -> Result<bool> {
        self.body.attempt_to_reduce_ellipsoid(ellipsoid)
    }
}

// =============================================================================
// SampleCache
// =============================================================================

/// Samples of the previous iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCache {
    enabled: bool,
    samples: Vec<Vector>,
}

impl SampleCache {
    /// Create an empty cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            samples: Vec::new(),
        }
    }

    /// A cache that stores nothing and never overrides a body.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether the cache is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached samples.
    pub fn samples(&self) -> &[Vector] {
        &self.samples
    }

    /// Replace the cached samples. Ignored when disabled.
    pub fn update_cache(&mut self, samples: &[Vector]) {
        if self.enabled {
            self.samples = samples.to_vec();
        }
    }

    /// Drop all cached samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Use the first cached sample inside `body` as its interior point.
    ///
    /// Cached samples are resized to `body.dim()` first (truncated or
    /// zero-padded). Without a match the body is returned unchanged.
    pub fn attempt_to_set_default_interior_point<'a>(
        &self,
        body: CachedBody<'a>,
    ) -> CachedBody<'a> {
        if !self.enabled {
            return body;
        }
        let dim = body.dim();
        match self
            .samples
            .iter()
            .map(|sample| resize(sample, dim))
            .find(|sample| body.is_inside(sample))
        {
            Some(point) => {
                debug!(cached = self.samples.len(), "interior point taken from sample cache");
                body.with_interior_point(point)
            }
            None => {
                debug!(cached = self.samples.len(), "sample cache miss");
                body
            }
        }
    }
}

// =============================================================================
// EllipsoidCache
// =============================================================================

/// Ellipsoid fitted in the previous iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EllipsoidCache {
    enabled: bool,
    ellipsoid: Option<Ellipsoid>,
}

impl EllipsoidCache {
    /// Create an empty cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ellipsoid: None,
        }
    }

    /// Whether the cache is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached ellipsoid, if any.
    pub fn ellipsoid(&self) -> Option<&Ellipsoid> {
        self.ellipsoid.as_ref()
    }

    /// Store the latest fitted ellipsoid. Ignored when disabled.
    pub fn update_cache(&mut self, ellipsoid: &Ellipsoid) {
        if self.enabled {
            self.ellipsoid = Some(ellipsoid.clone());
        }
    }

    /// Start rounding from the cached ellipsoid when `body` has exactly one
    /// more dimension than it; otherwise the cached ellipsoid is discarded.
    pub fn attempt_to_set_starting_ellipsoid<'a>(
        &mut self,
        body: CachedBody<'a>,
    ) -> CachedBody<'a> {
        let Some(cached) = self.ellipsoid.take() else {
            return body;
        };
        if !self.enabled || cached.dim() + 1 != body.dim() {
            debug!(
                cached_dim = cached.dim(),
                body_dim = body.dim(),
                "discarding cached ellipsoid"
            );
            return body;
        }
        debug!(body_dim = body.dim(), "starting rounding from cached ellipsoid");
        body.with_containing_ellipsoid(cached.extend_dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::UnitBallPolyhedralCone;
    use crate::types::Matrix;

    fn v(values: &[f64]) -> Vector {
        Vector::from_row_slice(values)
    }

    fn first_quadrant() -> UnitBallPolyhedralCone {
        UnitBallPolyhedralCone::with_default_solver(Matrix::identity(2, 2)).unwrap()
    }

    #[test]
    fn test_cached_body_overrides_only_interior_point() {
        let body = first_quadrant();
        let point = v(&[0.1, 0.2]);
        let cached = CachedBody::new(&body).with_interior_point(point.clone());

        assert_eq!(cached.interior_point().unwrap(), point);
        assert_eq!(cached.dim(), body.dim());
        assert_eq!(cached.manifold(), body.manifold());
        for x in [v(&[0.5, 0.5]), v(&[-0.5, 0.5]), v(&[0.9, 0.9])] {
            assert_eq!(cached.is_inside(&x), body.is_inside(&x));
        }
        assert_eq!(
            cached.containing_ellipsoid().unwrap(),
            body.containing_ellipsoid().unwrap()
        );

        let line = Manifold::Euclidean
            .geodesic(v(&[0.3, 0.3]), v(&[1.0, 0.5]))
            .unwrap();
        let a = cached.compute_intersection(&line).unwrap();
        let b = body.compute_intersection(&line).unwrap();
        assert_eq!((a.lower(), a.upper()), (b.lower(), b.upper()));
    }

    #[test]
    fn test_first_inside_sample_wins() {
        let body = first_quadrant();
        let mut cache = SampleCache::new(true);
        cache.update_cache(&[v(&[-0.5, 0.5]), v(&[0.2, 0.3]), v(&[0.4, 0.1])]);

        let cached = cache.attempt_to_set_default_interior_point(CachedBody::new(&body));
        assert!(cached.has_cached_interior_point());
        assert_eq!(cached.interior_point().unwrap(), v(&[0.2, 0.3]));
    }

    #[test]
    fn test_samples_are_resized() {
        let body = first_quadrant();
        let mut cache = SampleCache::new(true);
        // Truncated to (0.2, 0.3)
        cache.update_cache(&[v(&[0.2, 0.3, -7.0])]);
        let cached = cache.attempt_to_set_default_interior_point(CachedBody::new(&body));
        assert_eq!(cached.interior_point().unwrap(), v(&[0.2, 0.3]));

        // Padded to (0.2, 0.0): on the boundary, so no match
        cache.update_cache(&[v(&[0.2])]);
        let cached = cache.attempt_to_set_default_interior_point(CachedBody::new(&body));
        assert!(!cached.has_cached_interior_point());
    }

    #[test]
    fn test_update_replaces_contents() {
        let mut cache = SampleCache::new(true);
        cache.update_cache(&[v(&[1.0]), v(&[2.0])]);
        cache.update_cache(&[v(&[3.0])]);
        assert_eq!(cache.samples(), &[v(&[3.0])]);
        cache.clear();
        assert!(cache.samples().is_empty());
    }

    #[test]
    fn test_disabled_cache_passes_through() {
        let body = first_quadrant();
        let mut cache = SampleCache::disabled();
        cache.update_cache(&[v(&[0.2, 0.3])]);
        assert!(cache.samples().is_empty());
        let cached = cache.attempt_to_set_default_interior_point(CachedBody::new(&body));
        assert!(!cached.has_cached_interior_point());
    }

    #[test]
    fn test_ellipsoid_cache_applies_on_dimension_growth() {
        let body = first_quadrant();
        let mut cache = EllipsoidCache::new(true);
        cache.update_cache(&Ellipsoid::ball(1, 1.0).unwrap());

        let cached = cache.attempt_to_set_starting_ellipsoid(CachedBody::new(&body));
        assert!(cached.has_cached_ellipsoid());
        let e = cached.containing_ellipsoid().unwrap();
        assert_eq!(e.dim(), 2);
        assert!((e.scale()[(0, 0)] - 2.0).abs() < 1e-12);
        assert!((e.scale()[(1, 1)] - 2.0).abs() < 1e-12);
        // Consumed
        assert!(cache.ellipsoid().is_none());
    }

    #[test]
    fn test_ellipsoid_cache_discarded_otherwise() {
        let body = first_quadrant();
        let mut cache = EllipsoidCache::new(true);
        cache.update_cache(&Ellipsoid::ball(2, 0.5).unwrap());
        let cached = cache.attempt_to_set_starting_ellipsoid(CachedBody::new(&body));
        assert!(!cached.has_cached_ellipsoid());
        assert!(cache.ellipsoid().is_none());

        let mut disabled = EllipsoidCache::new(false);
        disabled.update_cache(&Ellipsoid::ball(1, 1.0).unwrap());
        assert!(disabled.ellipsoid().is_none());
    }
}
