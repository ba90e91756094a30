//! Hit-and-Run Markov chain.
//!
//! One transition from the current point p:
//!
//! ```text
//! v ~ DirectionSampler(p)
//! γ = geodesic(p, v)
//! [lo, hi] = γ ∩ body
//! t ~ U[0, 1)
//! p ← γ(lo + t·(hi − lo))
//! ```
//!
//! The stationary distribution is uniform on the body.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

use crate::body::ConvexBody;
use crate::constants::DEFAULT_DIRECTION_RETRIES;
use crate::error::{check_dim, Result, VersionSpaceError};
use crate::types::Vector;

use super::DirectionSampler;

/// A Markov chain over vectors.
pub trait MarkovChain {
    /// Apply `steps` transitions and return the resulting state.
    ///
    /// `advance(0)` returns the current state unchanged.
    fn advance(&mut self, steps: usize) -> Result<Vector>;

    /// Fork an independent chain starting at the current state.
    fn copy(&mut self) -> Self
    where
        Self: Sized;
}

/// Hit-and-Run random walk inside a convex body.
///
/// The chain owns its point and RNG stream; the body and the direction
/// sampler are shared with every chain forked from it.
#[derive(Debug, Clone)]
pub struct HitAndRunChain<'a> {
    body: &'a dyn ConvexBody,
    sampler: &'a DirectionSampler,
    point: Vector,
    rng: Xoshiro256PlusPlus,
    max_direction_retries: usize,
}

impl<'a> HitAndRunChain<'a> {
    /// Start a chain at `start`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` or `Validation` if `start` is not inside the body.
    pub fn new(
        body: &'a dyn ConvexBody,
        sampler: &'a DirectionSampler,
        start: Vector,
        seed: u64,
    ) -> Result<Self> {
        check_dim(body.dim(), start.len())?;
        if !body.is_inside(&start) {
            return Err(VersionSpaceError::validation(
                "chain must start inside the body",
            ));
        }
        Ok(Self {
            body,
            sampler,
            point: start,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            max_direction_retries: DEFAULT_DIRECTION_RETRIES,
        })
    }

    /// Set how many fresh directions are tried after a failed transition.
    pub fn with_max_direction_retries(mut self, retries: usize) -> Self {
        self.max_direction_retries = retries;
        self
    }

    /// Current point.
    pub fn point(&self) -> &Vector {
        &self.point
    }

    fn step(&mut self) -> Result<()> {
        let mut last_error = None;
        for attempt in 0..=self.max_direction_retries {
            match self.try_step() {
                Ok(next) => {
                    self.point = next;
                    return Ok(());
                }
                Err(err) if err.is_geometry() => {
                    debug!(attempt, error = %err, "transition failed, resampling direction");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        warn!(
            retries = self.max_direction_retries,
            "hit-and-run transition exhausted its direction retries"
        );
        let reason = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(VersionSpaceError::Geometry(format!(
            "no valid direction after {} attempts ({reason})",
            self.max_direction_retries + 1
        )))
    }

    fn try_step(&mut self) -> Result<Vector> {
        let velocity = self.sampler.sample_direction(&self.point, &mut self.rng)?;
        let geodesic = self.body.manifold().geodesic(self.point.clone(), velocity)?;
        let segment = self.body.compute_intersection(&geodesic)?;

        let t: f64 = self.rng.random();
        let next = segment.point(t)?;
        if !self.body.is_inside(&next) {
            return Err(VersionSpaceError::geometry(
                "sampled point fell on the boundary",
            ));
        }
        Ok(next)
    }
}

impl MarkovChain for HitAndRunChain<'_> {
    fn advance(&mut self, steps: usize) -> Result<Vector> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(self.point.clone())
    }

    fn copy(&mut self) -> Self {
        let child = self.clone();
        self.rng.jump();
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Ellipsoid, HyperPlane, UnitBallPolyhedralCone, UnitSpherePolyhedralCone};
    use crate::manifold::{Geodesic, GeodesicSegment, Manifold};
    use crate::types::Matrix;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn first_quadrant() -> UnitBallPolyhedralCone {
        UnitBallPolyhedralCone::with_default_solver(Matrix::identity(2, 2)).unwrap()
    }

    /// Body whose intersections always fail with a fixed error.
    #[derive(Debug)]
    struct FailingBody {
        error: VersionSpaceError,
        attempts: AtomicUsize,
    }

    impl FailingBody {
        fn new(error: VersionSpaceError) -> Self {
            Self {
                error,
                attempts: AtomicUsize::new(0),
            }
        }
    }

    impl ConvexBody for FailingBody {
        fn dim(&self) -> usize {
            2
        }
        fn manifold(&self) -> Manifold {
            Manifold::Euclidean
        }
        fn is_inside(&self, x: &Vector) -> bool {
            x.len() == 2
        }
        fn interior_point(&self) -> Result<Vector> {
            Ok(Vector::zeros(2))
        }
        fn compute_intersection<'g>(&self, _: &'g Geodesic) -> Result<GeodesicSegment<'g>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(self.error.clone())
        }
        fn separating_hyperplane(&self, _: &Vector) -> Option<HyperPlane> {
            None
        }
        fn containing_ellipsoid(&self) -> Result<Ellipsoid> {
            Ellipsoid::ball(2, 1.0)
        }
    }

    #[test]
    fn test_advance_zero_is_identity() {
        let body = first_quadrant();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let start = Vector::from_row_slice(&[0.3, 0.4]);
        let mut chain = HitAndRunChain::new(&body, &sampler, start.clone(), 1).unwrap();
        assert_eq!(chain.advance(0).unwrap(), start);
        assert_eq!(chain.point(), &start);
    }

    #[test]
    fn test_points_stay_inside() {
        let body = first_quadrant();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let start = body.interior_point().unwrap();
        let mut chain = HitAndRunChain::new(&body, &sampler, start, 42).unwrap();
        for _ in 0..200 {
            let p = chain.advance(1).unwrap();
            assert!(body.is_inside(&p), "{p} left the body");
        }
    }

    #[test]
    fn test_walk_on_sphere_stays_inside() {
        let a = Matrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let body = UnitSpherePolyhedralCone::with_default_solver(a).unwrap();
        let sampler = DirectionSampler::random(Manifold::UnitSphere);
        let start = body.interior_point().unwrap();
        let mut chain = HitAndRunChain::new(&body, &sampler, start, 9).unwrap();
        for _ in 0..100 {
            let p = chain.advance(3).unwrap();
            assert!(body.is_inside(&p), "{p} left the body");
        }
    }

    #[test]
    fn test_same_seed_same_path() {
        let body = first_quadrant();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let start = body.interior_point().unwrap();
        let mut a = HitAndRunChain::new(&body, &sampler, start.clone(), 7).unwrap();
        let mut b = HitAndRunChain::new(&body, &sampler, start, 7).unwrap();
        assert_eq!(a.advance(25).unwrap(), b.advance(25).unwrap());
    }

    #[test]
    fn test_copy_is_independent() {
        let body = first_quadrant();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let start = body.interior_point().unwrap();
        let mut parent = HitAndRunChain::new(&body, &sampler, start.clone(), 3).unwrap();

        let mut child = parent.copy();
        assert_eq!(child.point(), &start);

        let from_child = child.advance(5).unwrap();
        let from_parent = parent.advance(5).unwrap();
        assert_ne!(from_child, from_parent);
        // The child does not move the parent
        let mut second = parent.copy();
        assert_eq!(second.advance(0).unwrap(), from_parent);
    }

    #[test]
    fn test_start_must_be_inside() {
        let body = first_quadrant();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let outside = Vector::from_row_slice(&[-0.3, 0.4]);
        assert!(HitAndRunChain::new(&body, &sampler, outside, 1)
            .unwrap_err()
            .is_validation());
        assert!(HitAndRunChain::new(&body, &sampler, Vector::zeros(3), 1).is_err());
    }

    #[test]
    fn test_geometry_failures_are_retried_then_raised() {
        let body = FailingBody::new(VersionSpaceError::geometry("miss"));
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let mut chain = HitAndRunChain::new(&body, &sampler, Vector::zeros(2), 1)
            .unwrap()
            .with_max_direction_retries(3);
        assert!(chain.advance(1).unwrap_err().is_geometry());
        assert_eq!(body.attempts.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_validation_failures_are_not_retried() {
        let body = FailingBody::new(VersionSpaceError::validation("bad"));
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let mut chain = HitAndRunChain::new(&body, &sampler, Vector::zeros(2), 1).unwrap();
        assert!(chain.advance(1).unwrap_err().is_validation());
        assert_eq!(body.attempts.load(Ordering::SeqCst), 1);
    }
}
