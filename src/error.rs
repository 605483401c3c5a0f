//! Error types for the Affront library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`AffrontError`] enum. A run is a single batch pass, so nothing is retried:
//! any error aborts the run and is surfaced to the caller.
//!
//! # Examples
//!
//! ```
//! use affront::error::{AffrontError, Result};
//!
//! fn check_alpha(alpha: f64) -> Result<()> {
//!     if alpha <= 0.0 {
//!         return Err(AffrontError::invalid_hyperparameter("alpha", alpha, "> 0"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_alpha(0.0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Affront operations.
#[derive(Error, Debug)]
pub enum AffrontError {
    /// Malformed or missing input data.
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// No documents (or no usable tokens) to build a vocabulary from.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// Misaligned feature/label dimensions.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A hyperparameter outside of its valid range.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        param: String,
        value: String,
        constraint: String,
    },

    /// A model or transformer was used before being fitted.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with AffrontError.
pub type Result<T> = std::result::Result<T, AffrontError>;

impl AffrontError {
    /// Create a new data load error.
    pub fn data_load<S: Into<String>>(msg: S) -> Self {
        AffrontError::DataLoad(msg.into())
    }

    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        AffrontError::EmptyCorpus(msg.into())
    }

    /// Create a new shape mismatch error.
    pub fn shape_mismatch<E: ToString, A: ToString>(expected: E, actual: A) -> Self {
        AffrontError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a new invalid hyperparameter error.
    pub fn invalid_hyperparameter<P, V, C>(param: P, value: V, constraint: C) -> Self
    where
        P: Into<String>,
        V: ToString,
        C: Into<String>,
    {
        AffrontError::InvalidHyperparameter {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Create a new not fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        AffrontError::NotFitted(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        AffrontError::Analysis(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AffrontError::Config(msg.into())
    }
}
