//! Type aliases and common types.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Dense real vector (hypotheses, data points, directions).
pub type Vector = DVector<f64>;

/// Dense real matrix (constraint matrices, ellipsoid shapes).
pub type Matrix = DMatrix<f64>;

/// User label attached to a data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The user is interested in this point.
    Positive,
    /// The user is not interested in this point.
    Negative,
}

impl Label {
    /// Label as a sign: +1 for positive, -1 for negative.
    pub fn as_sign(&self) -> f64 {
        match self {
            Label::Positive => 1.0,
            Label::Negative => -1.0,
        }
    }

    /// Label from the sign of a margin. Zero maps to negative.
    pub fn from_margin(margin: f64) -> Self {
        if margin > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// A data point together with the label the user gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    /// Feature vector.
    pub features: Vector,
    /// User label.
    pub label: Label,
}

impl LabeledPoint {
    /// Create a labeled point.
    pub fn new(features: Vector, label: Label) -> Self {
        Self { features, label }
    }

    /// Convenience constructor from a slice of features.
    pub fn from_slice(features: &[f64], label: Label) -> Self {
        Self::new(Vector::from_row_slice(features), label)
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Resize a vector to `dim` entries, truncating or padding with zeros.
///
/// The version space can change dimension between active-learning iterations
/// (e.g. kernel version spaces grow with every label), so cached vectors are
/// always brought to the current dimension before use.
pub fn resize(vector: &Vector, dim: usize) -> Vector {
    Vector::from_fn(dim, |i, _| if i < vector.len() { vector[i] } else { 0.0 })
}
