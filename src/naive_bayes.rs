//! Bernoulli Naive Bayes over binarized TF-IDF features.
//!
//! Every column is treated as a present/absent indicator (`value > binarize`).
//! For class `c` with `n_c` training rows, of which `count_cj` have column `j`
//! present:
//!
//! ```text
//! p_cj     = (count_cj + alpha) / (n_c + 2 * alpha)
//! prior_c  = ln(n_c / n)
//! score_c  = prior_c + Σ_j ln(1 - p_cj) + Σ_{j present} (ln p_cj - ln(1 - p_cj))
//! ```
//!
//! The second form of `score_c` only touches the stored entries of a sparse
//! row. The predicted label is the class with the highest score; ties go to
//! the class that sorts first ([`Label::NotInsulting`]).

use log::debug;

use crate::dataset::Label;
use crate::error::{AffrontError, Result};
use crate::sparse::{CsrMatrix, SparseRow};
use crate::traits::{Estimator, Predictor};

/// Default presence threshold: any non-zero weight counts as present.
pub const DEFAULT_BINARIZE: f64 = 0.0;

/// Unfitted Bernoulli Naive Bayes configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BernoulliNb {
    alpha: f64,
    binarize: f64,
}

impl BernoulliNb {
    /// Create a classifier with additive smoothing `alpha`.
    ///
    /// Fails with [`AffrontError::InvalidHyperparameter`] unless `alpha` is
    /// finite and strictly positive.
    pub fn new(alpha: f64) -> Result<Self> {
        validate_alpha(alpha)?;
        Ok(BernoulliNb {
            alpha,
            binarize: DEFAULT_BINARIZE,
        })
    }

    /// Set the presence threshold.
    ///
    /// Implicit zeros of a sparse row are always absent, so the threshold
    /// must be finite and non-negative.
    pub fn with_binarize(mut self, threshold: f64) -> Result<Self> {
        validate_binarize(threshold)?;
        self.binarize = threshold;
        Ok(self)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn binarize(&self) -> f64 {
        self.binarize
    }

    /// Estimate class priors and per-feature presence probabilities.
    pub fn fit(&self, x: &CsrMatrix, y: &[Label]) -> Result<FittedBernoulliNb> {
        if x.n_rows() != y.len() {
            return Err(AffrontError::shape_mismatch(
                format!("{} labels (one per feature row)", x.n_rows()),
                format!("{} labels", y.len()),
            ));
        }
        if y.is_empty() {
            return Err(AffrontError::empty_corpus(
                "cannot fit a classifier on zero rows",
            ));
        }

        let mut classes: Vec<Label> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let n_features = x.n_cols();
        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0usize; n_features]; classes.len()];

        for (row, label) in x.rows().zip(y) {
            // `classes` holds every label of `y`, so the search always succeeds.
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_count[c] += 1;
            for (col, value) in row.iter() {
                if value > self.binarize {
                    feature_count[c][col] += 1;
                }
            }
        }

        let n = y.len() as f64;
        let class_log_prior: Vec<f64> = class_count
            .iter()
            .map(|&count| (count as f64 / n).ln())
            .collect();

        let mut feature_log_prob = Vec::with_capacity(classes.len());
        let mut absent_log_prob = Vec::with_capacity(classes.len());
        for (c, counts) in feature_count.iter().enumerate() {
            let denominator = class_count[c] as f64 + 2.0 * self.alpha;
            let present: Vec<f64> = counts
                .iter()
                .map(|&count| ((count as f64 + self.alpha) / denominator).ln())
                .collect();
            let absent: Vec<f64> = counts
                .iter()
                .map(|&count| {
                    ((class_count[c] as f64 - count as f64 + self.alpha) / denominator).ln()
                })
                .collect();
            feature_log_prob.push(present);
            absent_log_prob.push(absent);
        }
        let absent_log_prob_sum = absent_log_prob
            .iter()
            .map(|row| row.iter().sum())
            .collect();

        debug!(
            "fitted BernoulliNb(alpha={}) on {} rows x {} features, class counts {:?}",
            self.alpha,
            y.len(),
            n_features,
            class_count
        );

        Ok(FittedBernoulliNb {
            alpha: self.alpha,
            binarize: self.binarize,
            n_features,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
            absent_log_prob,
            absent_log_prob_sum,
        })
    }
}

impl Estimator for BernoulliNb {
    type Model = FittedBernoulliNb;

    fn fit(&self, x: &CsrMatrix, y: &[Label]) -> Result<FittedBernoulliNb> {
        BernoulliNb::fit(self, x, y)
    }
}

/// Check that a smoothing strength is usable.
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(AffrontError::invalid_hyperparameter(
            "alpha",
            alpha,
            "a finite value > 0",
        ));
    }
    Ok(())
}

pub fn validate_binarize(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(AffrontError::invalid_hyperparameter(
            "binarize",
            threshold,
            "a finite value >= 0",
        ));
    }
    Ok(())
}

/// A trained Bernoulli Naive Bayes model. Immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedBernoulliNb {
    alpha: f64,
    binarize: f64,
    n_features: usize,
    /// Labels seen during fit, sorted.
    classes: Vec<Label>,
    class_count: Vec<usize>,
    class_log_prior: Vec<f64>,
    /// `ln p_cj` per class, per feature.
    feature_log_prob: Vec<Vec<f64>>,
    /// `ln (1 - p_cj)` per class, per feature.
    absent_log_prob: Vec<Vec<f64>>,
    absent_log_prob_sum: Vec<f64>,
}

impl FittedBernoulliNb {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Labels seen during fit, in class order.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Training rows per class, aligned with [`classes`](Self::classes).
    pub fn class_count(&self) -> &[usize] {
        &self.class_count
    }

    /// Log prior per class, aligned with [`classes`](Self::classes).
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// `ln P(feature present | label)` for every feature, if `label` was seen.
    pub fn feature_log_prob(&self, label: Label) -> Option<&[f64]> {
        self.class_index(label)
            .map(|c| self.feature_log_prob[c].as_slice())
    }

    /// Joint log-likelihood of one row for every class.
    pub fn joint_log_likelihood(&self, row: SparseRow<'_>) -> Vec<f64> {
        (0..self.classes.len())
            .map(|c| {
                let present: f64 = row
                    .iter()
                    .filter(|&(_, value)| value > self.binarize)
                    .map(|(col, _)| self.feature_log_prob[c][col] - self.absent_log_prob[c][col])
                    .sum();
                self.class_log_prior[c] + self.absent_log_prob_sum[c] + present
            })
            .collect()
    }

    /// Predict the label of every row.
    pub fn predict(&self, x: &CsrMatrix) -> Result<Vec<Label>> {
        self.check_features(x)?;
        Ok(x.rows().map(|row| self.predict_row(row)).collect())
    }

    /// Predict a single row.
    pub fn predict_row(&self, row: SparseRow<'_>) -> Label {
        let scores = self.joint_log_likelihood(row);
        let mut best = 0;
        for (c, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = c;
            }
        }
        self.classes[best]
    }

    /// Posterior probability of every class for every row, aligned with
    /// [`classes`](Self::classes).
    pub fn predict_proba(&self, x: &CsrMatrix) -> Result<Vec<Vec<f64>>> {
        self.check_features(x)?;
        Ok(x
            .rows()
            .map(|row| {
                let scores = self.joint_log_likelihood(row);
                let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let log_norm = max + scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln();
                scores.iter().map(|s| (s - log_norm).exp()).collect()
            })
            .collect())
    }

    /// Posterior probability of `label` for every row (zero if never seen).
    pub fn probability_of(&self, x: &CsrMatrix, label: Label) -> Result<Vec<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(match self.class_index(label) {
            Some(c) => proba.iter().map(|row| row[c]).collect(),
            None => vec![0.0; x.n_rows()],
        })
    }

    /// Accuracy of the predictions on `x` against `y`.
    pub fn score(&self, x: &CsrMatrix, y: &[Label]) -> Result<f64> {
        let predicted = self.predict(x)?;
        crate::metrics::accuracy(y, &predicted)
    }

    /// `ln p_insulting,j - ln p_not_insulting,j` for every feature.
    ///
    /// `None` unless both labels were seen during fit.
    pub fn feature_log_odds(&self) -> Option<Vec<f64>> {
        let insulting = self.feature_log_prob(Label::Insulting)?;
        let not_insulting = self.feature_log_prob(Label::NotInsulting)?;
        Some(
            insulting
                .iter()
                .zip(not_insulting)
                .map(|(i, n)| i - n)
                .collect(),
        )
    }

    /// The `n` features most indicative of an insult, as `(column, log-odds)`
    /// sorted by decreasing log-odds, ties by column.
    pub fn top_features(&self, n: usize) -> Vec<(usize, f64)> {
        let Some(log_odds) = self.feature_log_odds() else {
            return Vec::new();
        };
        let mut ranked: Vec<(usize, f64)> = log_odds.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    fn class_index(&self, label: Label) -> Option<usize> {
        self.classes.binary_search(&label).ok()
    }

    fn check_features(&self, x: &CsrMatrix) -> Result<()> {
        if x.n_cols() != self.n_features {
            return Err(AffrontError::shape_mismatch(
                format!("{} feature columns", self.n_features),
                format!("{} feature columns", x.n_cols()),
            ));
        }
        Ok(())
    }
}

impl Predictor for FittedBernoulliNb {
    fn predict(&self, x: &CsrMatrix) -> Result<Vec<Label>> {
        FittedBernoulliNb::predict(self, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Label::{Insulting as I, NotInsulting as N};

    /// Columns: 0 = "idiot", 1 = "stupid", 2 = "thanks", 3 = "you".
    fn toy() -> (CsrMatrix, Vec<Label>) {
        let x = CsrMatrix::from_rows(
            4,
            vec![
                vec![(0, 0.7), (3, 0.7)],
                vec![(1, 0.7), (3, 0.7)],
                vec![(0, 0.5), (1, 0.5), (3, 0.7)],
                vec![(2, 0.9), (3, 0.4)],
                vec![(2, 1.0)],
            ],
        )
        .unwrap();
        (x, vec![I, I, I, N, N])
    }

    #[test]
    fn test_invalid_alpha() {
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                BernoulliNb::new(alpha),
                Err(AffrontError::InvalidHyperparameter { .. })
            ));
        }
    }

    #[test]
    fn test_fit_probabilities() {
        let (x, y) = toy();
        let model = BernoulliNb::new(1.0).unwrap().fit(&x, &y).unwrap();

        assert_eq!(model.classes(), &[N, I]);
        assert_eq!(model.class_count(), &[2, 3]);
        assert!((model.class_log_prior()[1] - (3.0f64 / 5.0).ln()).abs() < 1e-12);

        // "idiot" appears in 2 of 3 insults: (2 + 1) / (3 + 2)
        let insulting = model.feature_log_prob(I).unwrap();
        assert!((insulting[0] - (3.0f64 / 5.0).ln()).abs() < 1e-12);
        // "you" appears in 1 of 2 non-insults: (1 + 1) / (2 + 2)
        let not_insulting = model.feature_log_prob(N).unwrap();
        assert!((not_insulting[3] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_predict_and_score() {
        let (x, y) = toy();
        let model = BernoulliNb::new(1.0).unwrap().fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), y);
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);

        let query = CsrMatrix::from_rows(4, vec![vec![(1, 1.0)], vec![(2, 1.0)]]).unwrap();
        assert_eq!(model.predict(&query).unwrap(), vec![I, N]);
    }

    #[test]
    fn test_predictions_come_from_seen_labels() {
        let x = CsrMatrix::from_rows(2, vec![vec![(0, 1.0)], vec![(1, 1.0)]]).unwrap();
        let model = BernoulliNb::new(0.5).unwrap().fit(&x, &[N, N]).unwrap();

        let query = CsrMatrix::from_rows(2, vec![vec![(0, 1.0)], vec![], vec![(1, 0.3)]]).unwrap();
        assert!(model.predict(&query).unwrap().iter().all(|&l| l == N));
        assert!(model.feature_log_odds().is_none());
        assert!(model.top_features(5).is_empty());
        assert_eq!(model.probability_of(&query, I).unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn test_ties_go_to_first_class() {
        // Perfectly symmetric data: an empty row scores identically for both classes.
        let x = CsrMatrix::from_rows(2, vec![vec![(0, 1.0)], vec![(1, 1.0)]]).unwrap();
        let model = BernoulliNb::new(1.0).unwrap().fit(&x, &[I, N]).unwrap();

        let empty = CsrMatrix::zeros(1, 2);
        assert_eq!(model.predict(&empty).unwrap(), vec![N]);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let (x, y) = toy();
        let model = BernoulliNb::new(0.1).unwrap().fit(&x, &y).unwrap();

        for row in model.predict_proba(&x).unwrap() {
            assert_eq!(row.len(), 2);
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
        let insult = model.probability_of(&x, I).unwrap();
        assert!(insult[0] > 0.5);
        assert!(insult[4] < 0.5);
    }

    #[test]
    fn test_top_features() {
        let (x, y) = toy();
        let model = BernoulliNb::new(1.0).unwrap().fit(&x, &y).unwrap();
        let top: Vec<usize> = model.top_features(2).into_iter().map(|(col, _)| col).collect();

        // "idiot" and "stupid" tie; the lower column comes first.
        assert_eq!(top, vec![0, 1]);
        assert_eq!(model.top_features(10).len(), 4);
        assert_eq!(model.top_features(10)[3].0, 2);
    }

    #[test]
    fn test_binarize_threshold() {
        let (x, y) = toy();
        let model = BernoulliNb::new(1.0)
            .unwrap()
            .with_binarize(0.6)
            .unwrap()
            .fit(&x, &y)
            .unwrap();

        // Row 2 has "idiot" at 0.5, below the threshold: only row 0 counts.
        let insulting = model.feature_log_prob(I).unwrap();
        assert!((insulting[0] - (2.0f64 / 5.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_binarize_must_be_finite_and_non_negative() {
        let nb = BernoulliNb::new(1.0).unwrap();
        for threshold in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                nb.with_binarize(threshold),
                Err(AffrontError::InvalidHyperparameter { ref param, .. }) if param == "binarize"
            ));
        }
        assert_eq!(nb.with_binarize(0.0).unwrap().binarize(), 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let (x, _) = toy();
        let result = BernoulliNb::new(1.0).unwrap().fit(&x, &[I, N]);
        assert!(matches!(result, Err(AffrontError::ShapeMismatch { .. })));

        let (x, y) = toy();
        let model = BernoulliNb::new(1.0).unwrap().fit(&x, &y).unwrap();
        let narrow = CsrMatrix::zeros(1, 3);
        assert!(matches!(
            model.predict(&narrow),
            Err(AffrontError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_without_rows() {
        let x = CsrMatrix::zeros(0, 3);
        let result = BernoulliNb::new(1.0).unwrap().fit(&x, &[]);
        assert!(matches!(result, Err(AffrontError::EmptyCorpus(_))));
    }
}
