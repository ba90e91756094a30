//! # versionspace
//!
//! Version-space sampling for interactive data exploration.
//!
//! In an active-learning session a user labels points one at a time. After
//! every label the set of classifiers consistent with all labels so far, the
//! *version space*, shrinks. This crate draws near-uniform samples from it
//! with Hit-and-Run, so unlabeled points can be ranked by how much the
//! sampled hypotheses disagree on them.
//!
//! - Linear version spaces are polyhedral cones intersected with the unit
//!   ball (or the unit sphere)
//! - Interior points come from a feasibility linear program or from the
//!   previous iteration's samples
//! - Directions can be preconditioned by an ellipsoid fitted with the
//!   shallow-cut ellipsoid method
//!
//! ## Quick Start
//!
//! ```
//! use versionspace::{Config, Label, LabeledPoint, LinearVersionSpace, Vector};
//!
//! let labels = vec![
//!     LabeledPoint::from_slice(&[1.0, 0.2], Label::Positive),
//!     LabeledPoint::from_slice(&[-0.5, 1.0], Label::Negative),
//! ];
//!
//! let mut space = LinearVersionSpace::new(Config::quick()).unwrap();
//! let vote = space.sample(&labels, 8).unwrap();
//!
//! // Fraction of sampled hypotheses voting positive
//! let p = vote
//!     .predict_probability(&Vector::from_row_slice(&[0.3, 0.3]))
//!     .unwrap();
//! assert!((0.0..=1.0).contains(&p));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod types;

// Functional modules
pub mod body;
pub mod cache;
pub mod classifier;
pub mod linprog;
pub mod manifold;
pub mod sampling;
pub mod version_space;

// Re-exports for public API
pub use body::{
    ConvexBody, Ellipsoid, HyperPlane, PolyhedralCone, UnitBallPolyhedralCone,
    UnitSpherePolyhedralCone,
};
pub use cache::{CachedBody, EllipsoidCache, SampleCache};
pub use classifier::{
    GaussianKernel, Kernel, KernelMajorityVote, LinearClassifier, LinearKernel,
    LinearMajorityVote,
};
pub use config::{Config, DirectionStrategy};
pub use constants::DEFAULT_SEED;
pub use error::{Result, VersionSpaceError};
pub use linprog::{
    InequalitySign, LinearProgramSolver, LinearProgramSolverFactory, MinilpFactory, MinilpSolver,
};
pub use manifold::{Geodesic, GeodesicSegment, Manifold};
pub use sampling::{
    DirectionSampler, EllipsoidSampler, HitAndRunChain, HitAndRunSampler, MarkovChain,
    RandomDirectionSampler, RoundingAlgorithm, SampleSelector,
};
pub use types::{resize, Label, LabeledPoint, Matrix, Vector};
pub use version_space::{constraint_matrix, KernelVersionSpace, LinearVersionSpace};
