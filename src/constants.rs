//! Numerical constants used throughout the crate.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same labels = same samples.
/// The value `0x76657273696F6E` is "version" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x7665_7273_696F_6E;

/// Tolerance for the unit-norm constraint of the sphere manifold.
pub const SPHERE_TOLERANCE: f64 = 1e-10;

/// Relative tolerance for the tangent check `center · velocity = 0`.
pub const TANGENT_TOLERANCE: f64 = 1e-8;

/// Norm below which a direction is considered degenerate.
pub const MIN_NORM_EPSILON: f64 = 1e-15;

/// Norm of the LP interior point after rescaling into the unit ball.
pub const UNIT_BALL_INTERIOR_NORM: f64 = 0.9;

/// Slack below which the feasibility LP is considered to have found an
/// interior point: the optimum must satisfy `s* < -INTERIOR_SLACK`.
pub const INTERIOR_SLACK: f64 = 1e-12;

// =============================================================================
// Default configuration constants
// =============================================================================

/// Default number of transitions discarded before the first sample.
pub const DEFAULT_WARM_UP: usize = 100;

/// Default number of transitions between retained samples.
pub const DEFAULT_THIN: usize = 10;

/// Default number of fresh directions tried when a transition fails.
pub const DEFAULT_DIRECTION_RETRIES: usize = 10;

/// Default maximum number of ellipsoid cuts for rounding.
pub const DEFAULT_ROUNDING_ITERATIONS: usize = 1_000;
