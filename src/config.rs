//! Experiment configuration.
//!
//! Every field has a default, so a JSON config file only needs to name the
//! values it changes:
//!
//! ```json
//! {
//!   "test_size": 0.25,
//!   "alphas": { "start": -1.0, "stop": 1.0, "num": 9 },
//!   "vectorizer": { "stop_words": true }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetConfig;
use crate::error::{AffrontError, Result};
use crate::model_selection::logspace;
use crate::naive_bayes::{validate_alpha, validate_binarize};
use crate::vectorize::VectorizerConfig;

/// Sentences classified at the end of a run when none are given.
pub const DEFAULT_SAMPLES: [&str; 3] = [
    "I totally agree with you.",
    "You are so stupid.",
    "I love you.",
];

/// Candidate smoothing strengths for the grid search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphaGrid {
    /// An explicit list of candidates.
    List(Vec<f64>),
    /// `num` values log-spaced from `10^start` to `10^stop`.
    LogSpace { start: f64, stop: f64, num: usize },
}

impl Default for AlphaGrid {
    fn default() -> Self {
        AlphaGrid::LogSpace {
            start: -2.0,
            stop: 2.0,
            num: 50,
        }
    }
}

impl AlphaGrid {
    /// The candidate values, in search order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            AlphaGrid::List(values) => values.clone(),
            AlphaGrid::LogSpace { start, stop, num } => logspace(*start, *stop, *num),
        }
    }
}

/// How the training subset is split into cross-validation folds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvStrategy {
    /// Plain k-fold.
    KFold,
    /// K-fold preserving the class balance in every fold.
    #[default]
    Stratified,
}

/// Configuration for one experiment run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub dataset: DatasetConfig,
    pub vectorizer: VectorizerConfig,
    /// Fraction of rows held out for the final test score.
    pub test_size: f64,
    /// Seed for the train/test split and the fold shuffle.
    pub seed: u64,
    /// Number of cross-validation folds.
    pub n_folds: usize,
    pub cv: CvStrategy,
    pub alphas: AlphaGrid,
    /// Presence threshold for binarizing features.
    pub binarize: f64,
    /// Number of most discriminating terms to report.
    pub top_n: usize,
    /// Sentences to classify after training.
    pub samples: Vec<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            dataset: DatasetConfig::default(),
            vectorizer: VectorizerConfig::default(),
            test_size: 0.2,
            seed: 42,
            n_folds: 5,
            cv: CvStrategy::default(),
            alphas: AlphaGrid::default(),
            binarize: 0.0,
            top_n: 10,
            samples: DEFAULT_SAMPLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExperimentConfig {
    /// Read a JSON configuration file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AffrontError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values that can never work.
    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;
        self.vectorizer.validate()?;

        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AffrontError::invalid_hyperparameter(
                "test_size",
                self.test_size,
                "in (0, 1)",
            ));
        }
        if self.n_folds < 2 {
            return Err(AffrontError::invalid_hyperparameter(
                "n_folds",
                self.n_folds,
                ">= 2",
            ));
        }
        validate_binarize(self.binarize)?;

        let alphas = self.alphas.values();
        if alphas.is_empty() {
            return Err(AffrontError::invalid_hyperparameter(
                "alphas",
                "[]",
                "at least one candidate",
            ));
        }
        alphas.into_iter().try_for_each(validate_alpha)
    }
}
