//! Exhaustive search over the smoothing strength of Bernoulli Naive Bayes.
//!
//! Every `(alpha, fold)` pair is an independent fit-and-score task. Tasks run
//! on the rayon pool against shared read-only inputs, and their scores are
//! collected before being reduced to one mean accuracy per alpha.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use super::split::CrossValidator;
use super::evaluate_fold;
use crate::dataset::Label;
use crate::error::{AffrontError, Result};
use crate::naive_bayes::{BernoulliNb, DEFAULT_BINARIZE, FittedBernoulliNb};
use crate::sparse::CsrMatrix;

/// Cross-validated accuracy of one smoothing strength.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlphaScore {
    pub alpha: f64,
    /// Mean accuracy over the folds.
    pub mean: f64,
    /// Population standard deviation of the fold accuracies.
    pub std: f64,
    /// Accuracy on each fold, in fold order.
    pub fold_scores: Vec<f64>,
}

/// Outcome of [`GridSearch::fit`].
#[derive(Clone, Debug)]
pub struct GridSearchResult {
    pub best_alpha: f64,
    /// Mean cross-validated accuracy of `best_alpha`.
    pub best_score: f64,
    /// One entry per candidate, in the order the candidates were given.
    pub cv_results: Vec<AlphaScore>,
    /// A classifier with `best_alpha`, fitted on every row given to `fit`.
    pub best_estimator: FittedBernoulliNb,
}

/// Grid search over `alpha` using k-fold cross-validated accuracy.
#[derive(Clone, Debug)]
pub struct GridSearch<C: CrossValidator> {
    alphas: Vec<f64>,
    cv: C,
    binarize: f64,
}

impl<C: CrossValidator> GridSearch<C> {
    pub fn new(alphas: Vec<f64>, cv: C) -> Self {
        GridSearch {
            alphas,
            cv,
            binarize: DEFAULT_BINARIZE,
        }
    }

    /// Presence threshold passed on to every candidate classifier. It is
    /// checked by [`GridSearch::fit`] together with the alphas.
    pub fn with_binarize(mut self, threshold: f64) -> Self {
        self.binarize = threshold;
        self
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn cv(&self) -> &C {
        &self.cv
    }

    /// Score every candidate, pick the best and refit it on all of `x`.
    ///
    /// All candidates are validated before any fold is evaluated, so an
    /// invalid alpha anywhere in the grid fails fast. Among candidates with
    /// equal mean accuracy the smallest alpha wins.
    pub fn fit(&self, x: &CsrMatrix, y: &[Label]) -> Result<GridSearchResult> {
        if self.alphas.is_empty() {
            return Err(AffrontError::invalid_hyperparameter(
                "alphas",
                "[]",
                "at least one candidate",
            ));
        }
        let estimators = self
            .alphas
            .iter()
            .map(|&alpha| BernoulliNb::new(alpha)?.with_binarize(self.binarize))
            .collect::<Result<Vec<_>>>()?;

        if x.n_rows() != y.len() {
            return Err(AffrontError::shape_mismatch(
                format!("{} labels (one per feature row)", x.n_rows()),
                format!("{} labels", y.len()),
            ));
        }

        let folds = self.cv.split(y)?;
        if folds.is_empty() {
            return Err(AffrontError::invalid_hyperparameter(
                "n_splits",
                0,
                ">= 2",
            ));
        }
        info!(
            "Grid search: {} candidates x {} folds on {} rows",
            estimators.len(),
            folds.len(),
            y.len()
        );

        let tasks: Vec<(usize, usize)> = (0..estimators.len())
            .flat_map(|a| (0..folds.len()).map(move |f| (a, f)))
            .collect();
        let scores = tasks
            .par_iter()
            .map(|&(a, f)| evaluate_fold(&estimators[a], x, y, &folds[f]))
            .collect::<Result<Vec<f64>>>()?;

        // `tasks` is alpha-major, so each candidate owns a contiguous chunk.
        let cv_results: Vec<AlphaScore> = self
            .alphas
            .iter()
            .zip(scores.chunks(folds.len()))
            .map(|(&alpha, fold_scores)| {
                let (mean, std) = mean_std(fold_scores);
                debug!("alpha = {alpha:.6}: mean accuracy {mean:.4} (std {std:.4})");
                AlphaScore {
                    alpha,
                    mean,
                    std,
                    fold_scores: fold_scores.to_vec(),
                }
            })
            .collect();

        let best = best_index(&cv_results);
        let best_alpha = cv_results[best].alpha;
        let best_score = cv_results[best].mean;
        info!("Best alpha = {best_alpha:.6} with cross-validated accuracy {best_score:.4}");

        let best_estimator = estimators[best].fit(x, y)?;

        Ok(GridSearchResult {
            best_alpha,
            best_score,
            cv_results,
            best_estimator,
        })
    }
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Highest mean first, then smallest alpha.
fn best_index(results: &[AlphaScore]) -> usize {
    let mut best = 0;
    for (i, candidate) in results.iter().enumerate().skip(1) {
        let current = &results[best];
        if candidate.mean > current.mean
            || (candidate.mean == current.mean && candidate.alpha < current.alpha)
        {
            best = i;
        }
    }
    best
}
