//! # Affront
//!
//! Insult detection for short comments: a TF-IDF bag-of-words representation
//! fed to a Bernoulli Naive Bayes classifier whose smoothing strength is
//! chosen by cross-validation.
//!
//! ## Pipeline
//!
//! - [`dataset`] loads labeled comments from a CSV file
//! - [`analysis`] tokenizes and normalizes text
//! - [`vectorize`] builds the vocabulary and the sparse TF-IDF matrix
//! - [`naive_bayes`] fits and applies the classifier
//! - [`model_selection`] splits data and searches the smoothing grid
//! - [`experiment`] ties the steps together and reports the results
//!
//! ```no_run
//! use affront::config::ExperimentConfig;
//! use affront::experiment::Experiment;
//!
//! let experiment = Experiment::new(ExperimentConfig::default())?;
//! let run = experiment.run("train.csv")?;
//! println!("test accuracy: {:.3}", run.report.test_accuracy);
//! # Ok::<(), affront::error::AffrontError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod model_selection;
pub mod naive_bayes;
pub mod sparse;
pub mod traits;
pub mod vectorize;

pub mod prelude {
    pub use crate::config::ExperimentConfig;
    pub use crate::dataset::{Dataset, Document, Label};
    pub use crate::error::{AffrontError, Result};
    pub use crate::experiment::{Experiment, InsultClassifier};
    pub use crate::naive_bayes::{BernoulliNb, FittedBernoulliNb};
    pub use crate::sparse::CsrMatrix;
    pub use crate::traits::{Estimator, Predictor};
    pub use crate::vectorize::TfIdfVectorizer;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
