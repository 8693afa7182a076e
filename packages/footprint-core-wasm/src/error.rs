//! Error types for ring parsing and JS-supplied input.

use thiserror::Error;

/// Failure to read a `POLYGON ((...))` string back into a ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected POLYGON ((...)), found {text:?}")]
    MissingWrapper { text: String },

    #[error("coordinate pair {index} {pair:?} has {tokens} tokens (expected 2)")]
    PairArity {
        index: usize,
        pair: String,
        tokens: usize,
    },

    #[error("coordinate pair {index} has non-numeric token {token:?}")]
    InvalidNumber { index: usize, token: String },
}

/// Malformed coordinates or JSON handed over by the JS side.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing or invalid field '{0}'")]
    MissingField(&'static str),

    #[error("coordinate {index} is not a numeric [x, y] pair")]
    BadCoordinate { index: usize },

    #[error("flat coordinate list has odd length {0}")]
    OddLength(usize),

    #[error("invalid config value for '{field}': {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}
