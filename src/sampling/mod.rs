//! Hit-and-Run sampling from convex bodies.
//!
//! [`HitAndRunSampler`] wires the pieces together for one active-learning
//! iteration:
//!
//! 1. Optionally fit a rounding ellipsoid (starting from the ellipsoid cache)
//!    and use its shape to precondition directions. A center inside the body
//!    seeds the sample cache.
//! 2. Start a [`HitAndRunChain`] at a cached sample inside the body, or at the
//!    body's own interior point.
//! 3. Draw the batch with the [`SampleSelector`] and cache it for the next
//!    iteration.

mod chain;
mod direction;
mod rounding;
mod selector;

pub use chain::{HitAndRunChain, MarkovChain};
pub use direction::{DirectionSampler, EllipsoidSampler, RandomDirectionSampler};
pub use rounding::RoundingAlgorithm;
pub use selector::SampleSelector;

use tracing::debug;

use crate::body::ConvexBody;
use crate::cache::{CachedBody, EllipsoidCache, SampleCache};
use crate::config::Config;
use crate::constants::{DEFAULT_DIRECTION_RETRIES, DEFAULT_SEED};
use crate::error::{Result, VersionSpaceError};
use crate::manifold::Manifold;
use crate::types::Vector;

/// Stateful sampler that carries caches across calls.
#[derive(Debug, Clone)]
pub struct HitAndRunSampler {
    selector: SampleSelector,
    rounding: Option<RoundingAlgorithm>,
    sample_cache: SampleCache,
    ellipsoid_cache: EllipsoidCache,
    max_direction_retries: usize,
    seed: u64,
}

impl HitAndRunSampler {
    /// Random-direction sampler with the given selector and no caching.
    pub fn new(selector: SampleSelector) -> Self {
        Self {
            selector,
            rounding: None,
            sample_cache: SampleCache::disabled(),
            ellipsoid_cache: EllipsoidCache::new(false),
            max_direction_retries: DEFAULT_DIRECTION_RETRIES,
            seed: DEFAULT_SEED,
        }
    }

    /// Build a sampler from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let rounding = config
            .direction
            .rounding_iterations()
            .map(RoundingAlgorithm::new)
            .transpose()?;
        Ok(Self {
            selector: config.selector,
            rounding,
            sample_cache: SampleCache::new(config.sample_cache),
            ellipsoid_cache: EllipsoidCache::new(config.ellipsoid_cache),
            max_direction_retries: config.max_direction_retries,
            seed: config.seed,
        })
    }

    /// Enable rounding.
    pub fn with_rounding(mut self, rounding: RoundingAlgorithm) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// Replace the sample cache.
    pub fn with_sample_cache(mut self, cache: SampleCache) -> Self {
        self.sample_cache = cache;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sample cache.
    pub fn sample_cache(&self) -> &SampleCache {
        &self.sample_cache
    }

    /// Mutable sample cache, e.g. to prime it with known hypotheses.
    pub fn sample_cache_mut(&mut self) -> &mut SampleCache {
        &mut self.sample_cache
    }

    /// Ellipsoid cache.
    pub fn ellipsoid_cache(&self) -> &EllipsoidCache {
        &self.ellipsoid_cache
    }

    /// Draw `num_samples` approximately uniform samples from `body`.
    ///
    /// # Errors
    ///
    /// `Validation` if `num_samples` is zero; interior-point, rounding and
    /// chain errors are propagated.
    pub fn sample(&mut self, body: &dyn ConvexBody, num_samples: usize) -> Result<Vec<Vector>> {
        if num_samples == 0 {
            return Err(VersionSpaceError::validation("num_samples must be positive"));
        }

        let direction = match self.rounding {
            Some(rounding) => self.fit_direction_sampler(body, rounding)?,
            None => DirectionSampler::random(body.manifold()),
        };

        let cached = self
            .sample_cache
            .attempt_to_set_default_interior_point(CachedBody::new(body));
        let start = cached.interior_point()?;

        let mut chain = HitAndRunChain::new(&cached, &direction, start, self.seed)?
            .with_max_direction_retries(self.max_direction_retries);
        let samples = self.selector.select(&mut chain, num_samples)?;
        debug!(
            samples = samples.len(),
            transitions = self.selector.transitions(num_samples),
            "hit-and-run batch complete"
        );

        self.sample_cache.update_cache(&samples);
        Ok(samples)
    }

    fn fit_direction_sampler(
        &mut self,
        body: &dyn ConvexBody,
        rounding: RoundingAlgorithm,
    ) -> Result<DirectionSampler> {
        if body.manifold() != Manifold::Euclidean {
            return Err(VersionSpaceError::validation(
                "rounding requires a body in Euclidean space",
            ));
        }
        let start = self
            .ellipsoid_cache
            .attempt_to_set_starting_ellipsoid(CachedBody::new(body));

        let ellipsoid = match rounding.fit(&start) {
            Ok(ellipsoid) => ellipsoid,
            Err(err) if err.is_geometry() && start.has_cached_ellipsoid() => {
                debug!(error = %err, "cached ellipsoid unusable, rounding from scratch");
                rounding.fit(body)?
            }
            Err(err) => return Err(err),
        };
        self.ellipsoid_cache.update_cache(&ellipsoid);

        if body.is_inside(ellipsoid.center()) {
            self.sample_cache
                .update_cache(std::slice::from_ref(ellipsoid.center()));
        }
        Ok(EllipsoidSampler::from_ellipsoid(&ellipsoid)?.into())
    }
}
