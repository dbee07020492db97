//! Error types for the classical-quantum map algebra
//!
//! Every failure is raised eagerly, at construction or composition time,
//! and carries a rendering of the objects that disagreed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CqError {
    #[error("cannot compose: codomain {left} does not match domain {right}")]
    Composability { left: String, right: String },

    #[error("array of shape {got:?} does not fit declared type {dom} -> {cod}")]
    ShapeMismatch {
        dom: String,
        cod: String,
        got: Vec<usize>,
    },

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("no mapping for box {0}")]
    MissingMapping(String),

    #[error("one of array or data must be given")]
    MalformedConstruction,

    #[error("expected parameters of shape {expected}, got {got}")]
    ParamShape { expected: String, got: String },

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, CqError>;

impl CqError {
    pub(crate) fn composability(left: impl std::fmt::Display, right: impl std::fmt::Display) -> Self {
        CqError::Composability {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}
