//! Strategies for turning a Markov chain into a batch of samples.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THIN, DEFAULT_WARM_UP};
use crate::error::{Result, VersionSpaceError};
use crate::types::Vector;

use super::MarkovChain;

/// How samples are drawn from a chain.
///
/// - `WarmUpAndThin`: a single chain. The first sample is taken after
///   `warm_up` transitions and every further sample after `thin` more, for
///   `warm_up + (n − 1)·thin` transitions in total.
/// - `IndependentChains`: every sample comes from a fresh copy of the base
///   chain advanced `chain_length` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleSelector {
    /// Burn-in followed by thinning on one chain.
    WarmUpAndThin {
        /// Transitions discarded before the first sample.
        warm_up: usize,
        /// Transitions between consecutive samples (> 0).
        thin: usize,
    },
    /// One forked chain per sample.
    IndependentChains {
        /// Transitions per chain (> 0).
        chain_length: usize,
    },
}

impl Default for SampleSelector {
    fn default() -> Self {
        SampleSelector::WarmUpAndThin {
            warm_up: DEFAULT_WARM_UP,
            thin: DEFAULT_THIN,
        }
    }
}

impl SampleSelector {
    /// Warm-up-and-thin selector.
    ///
    /// # Errors
    ///
    /// `Validation` if `thin` is zero.
    pub fn warm_up_and_thin(warm_up: usize, thin: usize) -> Result<Self> {
        let selector = SampleSelector::WarmUpAndThin { warm_up, thin };
        selector.validate()?;
        Ok(selector)
    }

    /// Independent-chains selector.
    ///
    /// # Errors
    ///
    /// `Validation` if `chain_length` is zero.
    pub fn independent_chains(chain_length: usize) -> Result<Self> {
        let selector = SampleSelector::IndependentChains { chain_length };
        selector.validate()?;
        Ok(selector)
    }

    /// Check the selector parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SampleSelector::WarmUpAndThin { thin: 0, .. } => {
                Err(VersionSpaceError::validation("thin must be positive"))
            }
            SampleSelector::IndependentChains { chain_length: 0 } => {
                Err(VersionSpaceError::validation("chain_length must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Total number of transitions needed for `num_samples` samples.
    pub fn transitions(&self, num_samples: usize) -> usize {
        match *self {
            SampleSelector::WarmUpAndThin { warm_up, thin } => {
                warm_up + num_samples.saturating_sub(1) * thin
            }
            SampleSelector::IndependentChains { chain_length } => num_samples * chain_length,
        }
    }

    /// Draw `num_samples` samples from `chain`.
    ///
    /// # Errors
    ///
    /// `Validation` if `num_samples` is zero or the selector is invalid;
    /// chain errors are propagated.
    pub fn select<C: MarkovChain>(&self, chain: &mut C, num_samples: usize) -> Result<Vec<Vector>> {
        self.validate()?;
        if num_samples == 0 {
            return Err(VersionSpaceError::validation("num_samples must be positive"));
        }

        let mut samples = Vec::with_capacity(num_samples);
        match *self {
            SampleSelector::WarmUpAndThin { warm_up, thin } => {
                samples.push(chain.advance(warm_up)?);
                for _ in 1..num_samples {
                    samples.push(chain.advance(thin)?);
                }
            }
            SampleSelector::IndependentChains { chain_length } => {
                for _ in 0..num_samples {
                    samples.push(chain.copy().advance(chain_length)?);
                }
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Chain that records every `advance` and `copy` call.
    #[derive(Debug, Clone, Default)]
    struct RecordingChain {
        advances: Rc<RefCell<Vec<usize>>>,
        copies: Rc<RefCell<usize>>,
        state: f64,
    }

    impl MarkovChain for RecordingChain {
        fn advance(&mut self, steps: usize) -> Result<Vector> {
            self.advances.borrow_mut().push(steps);
            self.state += steps as f64;
            Ok(Vector::from_element(1, self.state))
        }

        fn copy(&mut self) -> Self {
            *self.copies.borrow_mut() += 1;
            self.clone()
        }
    }

    #[test]
    fn test_warm_up_and_thin_call_sequence() {
        let selector = SampleSelector::warm_up_and_thin(10, 5).unwrap();
        let mut chain = RecordingChain::default();
        let samples = selector.select(&mut chain, 3).unwrap();

        assert_eq!(*chain.advances.borrow(), vec![10, 5, 5]);
        assert_eq!(*chain.copies.borrow(), 0);
        let values: Vec<f64> = samples.iter().map(|s| s[0]).collect();
        assert_eq!(values, vec![10.0, 15.0, 20.0]);
        assert_eq!(selector.transitions(3), 20);
    }

    #[test]
    fn test_independent_chains_call_sequence() {
        let selector = SampleSelector::independent_chains(7).unwrap();
        let mut chain = RecordingChain::default();
        let samples = selector.select(&mut chain, 4).unwrap();

        assert_eq!(*chain.advances.borrow(), vec![7, 7, 7, 7]);
        assert_eq!(*chain.copies.borrow(), 4);
        // Every copy starts from the base state, which never moves
        assert!(samples.iter().all(|s| s[0] == 7.0));
        assert_eq!(chain.state, 0.0);
    }

    #[test]
    fn test_zero_warm_up_is_allowed() {
        let selector = SampleSelector::warm_up_and_thin(0, 1).unwrap();
        let mut chain = RecordingChain::default();
        selector.select(&mut chain, 2).unwrap();
        assert_eq!(*chain.advances.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SampleSelector::warm_up_and_thin(10, 0).unwrap_err().is_validation());
        assert!(SampleSelector::independent_chains(0).unwrap_err().is_validation());

        let selector = SampleSelector::default();
        let mut chain = RecordingChain::default();
        assert!(selector.select(&mut chain, 0).unwrap_err().is_validation());
        assert!(chain.advances.borrow().is_empty());

        let invalid = SampleSelector::WarmUpAndThin { warm_up: 1, thin: 0 };
        assert!(invalid.select(&mut chain, 1).is_err());
    }
}
