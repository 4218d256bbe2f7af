//! Error taxonomy shared by the collection, map and fitting layers.
//!
//! Collection/validation errors are fatal to the call that raised them and are
//! returned unchanged. [`RmError::FitConvergence`] is the only variant with
//! local recovery semantics: the RM map builder catches it per pixel.
use crate::types::{FrequencyKey, Stokes};
use crate::grid::PixelGrid;
use thiserror::Error;

/// Errors produced by the rotation-measure and bootstrap-error engine.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RmError {
    #[error("image grid {found:?} does not match the collection grid {expected:?}")]
    GridMismatch {
        expected: PixelGrid,
        found: PixelGrid,
    },

    #[error("{what}: need at least {required}, got {actual}")]
    InsufficientInput {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("no images at {frequency:?} / {stokes:?}")]
    EmptyCollection {
        frequency: Option<FrequencyKey>,
        stokes: Option<Stokes>,
    },

    #[error("ambiguous selection: {candidates} candidate {what} values, choose one explicitly")]
    AmbiguousSelection {
        what: &'static str,
        candidates: usize,
    },

    #[error("Stokes {stokes} missing at frequency {frequency}")]
    MissingStokes {
        frequency: FrequencyKey,
        stokes: Stokes,
    },

    #[error("replica count mismatch at {context}: {left} vs {right}")]
    CountMismatch {
        context: String,
        left: usize,
        right: usize,
    },

    #[error("fit failed: {reason}")]
    FitConvergence { reason: String },

    #[error("{what} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("replica index {index} out of range ({count} replicas)")]
    ReplicaOutOfRange { index: usize, count: usize },

    #[error("pixel ({x}, {y}) lies outside a {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("credible mass must lie in (0, 1], got {0}")]
    InvalidCredibleMass(f64),

    #[error("run cancelled after {completed} of {total} pixels")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, RmError>;

impl RmError {
    pub(crate) fn fit(reason: impl Into<String>) -> Self {
        RmError::FitConvergence {
            reason: reason.into(),
        }
    }
}
