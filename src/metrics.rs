//! Evaluation metrics for binary comment classification.

use serde::Serialize;

use crate::dataset::Label;
use crate::error::{AffrontError, Result};

/// Fraction of positions where `predicted` equals `truth`, in [0, 1].
pub fn accuracy(truth: &[Label], predicted: &[Label]) -> Result<f64> {
    check_lengths(truth, predicted)?;
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Confusion counts with [`Label::Insulting`] as the positive class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn new(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        check_lengths(truth, predicted)?;
        let mut matrix = ConfusionMatrix::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            match (p, t) {
                (Label::Insulting, Label::Insulting) => matrix.true_positives += 1,
                (Label::Insulting, Label::NotInsulting) => matrix.false_positives += 1,
                (Label::NotInsulting, Label::NotInsulting) => matrix.true_negatives += 1,
                (Label::NotInsulting, Label::Insulting) => matrix.false_negatives += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// TP / (TP + FP); zero when nothing was predicted insulting.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN); zero when nothing is insulting.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn check_lengths(truth: &[Label], predicted: &[Label]) -> Result<()> {
    if truth.len() != predicted.len() {
        return Err(AffrontError::shape_mismatch(
            format!("{} predictions", truth.len()),
            format!("{} predictions", predicted.len()),
        ));
    }
    if truth.is_empty() {
        return Err(AffrontError::empty_corpus("no samples to evaluate"));
    }
    Ok(())
}
