//! Error types for construction-time configuration checks

use thiserror::Error;

/// Errors raised while building a discretizer, agent or trainer
///
/// Training itself never fails; every variant here describes a configuration that
/// would otherwise produce a malformed value table.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("dimension mismatch: expected {expected} values, got {got} for `{what}`")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid bin count 0 for dimension {dim} (must be at least 1)")]
    InvalidBins { dim: usize },

    #[error("invalid bounds for dimension {dim}: low {low} must be finite and below high {high}")]
    InvalidBounds { dim: usize, low: f32, high: f32 },

    #[error("environment exposes no actions")]
    NoActions,

    #[error("invalid value {value} for `{name}`: must be in the interval [{low}, {high}]")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("invalid decay schedule: {message}")]
    InvalidDecay { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
