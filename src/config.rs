//! Configuration for version-space sampling.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DIRECTION_RETRIES, DEFAULT_ROUNDING_ITERATIONS, DEFAULT_SEED, DEFAULT_THIN,
    DEFAULT_WARM_UP,
};
use crate::error::{Result, VersionSpaceError};
use crate::sampling::SampleSelector;

/// Configuration options for [`LinearVersionSpace`](crate::LinearVersionSpace)
/// and [`KernelVersionSpace`](crate::KernelVersionSpace).
///
/// Deserializing a partial document fills the missing fields from
/// [`Config::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Hit-and-Run
    // =========================================================================
    /// How step directions are drawn.
    ///
    /// Default: [`DirectionStrategy::Random`].
    pub direction: DirectionStrategy,

    /// How samples are extracted from the chain.
    ///
    /// Default: warm-up 100, thin 10.
    pub selector: SampleSelector,

    /// Fresh directions tried after a transition fails before giving up.
    ///
    /// Default: 10.
    pub max_direction_retries: usize,

    // =========================================================================
    // Caching across iterations
    // =========================================================================
    /// Reuse the previous sample batch as the starting point.
    ///
    /// Default: false.
    pub sample_cache: bool,

    /// Reuse the previous rounding ellipsoid when the body gains a dimension.
    ///
    /// Only effective with rounding. Default: false.
    pub ellipsoid_cache: bool,

    // =========================================================================
    // Version space geometry
    // =========================================================================
    /// Prepend a bias coordinate to every data point.
    ///
    /// Default: false.
    pub add_intercept: bool,

    /// Sample on the unit sphere instead of the unit ball.
    ///
    /// Incompatible with rounding. Default: false.
    pub spherical: bool,

    // =========================================================================
    // Reproducibility
    // =========================================================================
    /// Seed of the Hit-and-Run random stream.
    ///
    /// Same seed + same labels = same samples.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: DirectionStrategy::Random,
            selector: SampleSelector::WarmUpAndThin {
                warm_up: DEFAULT_WARM_UP,
                thin: DEFAULT_THIN,
            },
            max_direction_retries: DEFAULT_DIRECTION_RETRIES,
            sample_cache: false,
            ellipsoid_cache: false,
            add_intercept: false,
            spherical: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Short chains for interactive use and tests:
    /// - warm-up 20, thin 5
    /// - random directions
    pub fn quick() -> Self {
        Self {
            selector: SampleSelector::WarmUpAndThin {
                warm_up: 20,
                thin: 5,
            },
            ..Default::default()
        }
    }

    /// Rounded directions with the default chain lengths:
    /// - up to 1,000 rounding cuts
    /// - warm-up 100, thin 10
    pub fn balanced() -> Self {
        Self {
            direction: DirectionStrategy::Rounding {
                max_iterations: DEFAULT_ROUNDING_ITERATIONS,
            },
            ..Default::default()
        }
    }

    /// Long chains with rounding and both caches:
    /// - up to 5,000 rounding cuts
    /// - warm-up 500, thin 50
    pub fn thorough() -> Self {
        Self {
            direction: DirectionStrategy::Rounding {
                max_iterations: 5_000,
            },
            selector: SampleSelector::WarmUpAndThin {
                warm_up: 500,
                thin: 50,
            },
            sample_cache: true,
            ellipsoid_cache: true,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Draw isotropic random directions.
    pub fn random_directions(mut self) -> Self {
        self.direction = DirectionStrategy::Random;
        self
    }

    /// Precondition directions with an ellipsoid fitted in at most
    /// `max_iterations` cuts. Zero disables rounding.
    pub fn rounding(mut self, max_iterations: usize) -> Self {
        self.direction = DirectionStrategy::Rounding { max_iterations };
        self
    }

    /// Use a single chain with burn-in and thinning.
    pub fn warm_up_and_thin(mut self, warm_up: usize, thin: usize) -> Self {
        assert!(thin > 0, "thin must be positive");
        self.selector = SampleSelector::WarmUpAndThin { warm_up, thin };
        self
    }

    /// Use one forked chain of `chain_length` transitions per sample.
    pub fn independent_chains(mut self, chain_length: usize) -> Self {
        assert!(chain_length > 0, "chain_length must be positive");
        self.selector = SampleSelector::IndependentChains { chain_length };
        self
    }

    /// Set the number of direction retries after a failed transition.
    pub fn max_direction_retries(mut self, retries: usize) -> Self {
        self.max_direction_retries = retries;
        self
    }

    /// Enable or disable the sample cache.
    pub fn sample_cache(mut self, enabled: bool) -> Self {
        self.sample_cache = enabled;
        self
    }

    /// Enable or disable the ellipsoid cache.
    pub fn ellipsoid_cache(mut self, enabled: bool) -> Self {
        self.ellipsoid_cache = enabled;
        self
    }

    /// Enable or disable the bias coordinate.
    pub fn add_intercept(mut self, enabled: bool) -> Self {
        self.add_intercept = enabled;
        self
    }

    /// Sample on the unit sphere.
    pub fn spherical(mut self, enabled: bool) -> Self {
        self.spherical = enabled;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        self.selector.validate()?;
        if self.spherical && self.direction.rounding_iterations().is_some() {
            return Err(VersionSpaceError::validation(
                "rounding is not supported on the unit sphere",
            ));
        }
        Ok(())
    }
}

/// Direction strategy of the Hit-and-Run chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionStrategy {
    /// Isotropic directions from the manifold.
    #[default]
    Random,
    /// Directions preconditioned by a fitted ellipsoid.
    Rounding {
        /// Maximum number of ellipsoid cuts; zero disables rounding.
        max_iterations: usize,
    },
}

impl DirectionStrategy {
    /// Number of rounding cuts, or `None` when rounding is off.
    pub fn rounding_iterations(&self) -> Option<usize> {
        match *self {
            DirectionStrategy::Rounding { max_iterations } if max_iterations > 0 => {
                Some(max_iterations)
            }
            _ => None,
        }
    }
}
