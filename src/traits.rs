//! Estimator contracts shared by the classifier and model selection.

use crate::dataset::Label;
use crate::error::Result;
use crate::sparse::CsrMatrix;

/// An unfitted, reusable model configuration.
///
/// `fit` borrows `self` immutably so one estimator can be fitted on many
/// cross-validation folds at once.
pub trait Estimator: Send + Sync {
    /// The fitted model produced by [`Estimator::fit`].
    type Model: Predictor;

    /// Fit a model on feature rows `x` with aligned labels `y`.
    fn fit(&self, x: &CsrMatrix, y: &[Label]) -> Result<Self::Model>;
}

/// A fitted model that assigns labels to feature rows.
pub trait Predictor: Send + Sync {
    /// Predict one label per row of `x`.
    fn predict(&self, x: &CsrMatrix) -> Result<Vec<Label>>;

    /// Fraction of rows of `x` whose predicted label equals `y`.
    fn score(&self, x: &CsrMatrix, y: &[Label]) -> Result<f64> {
        let predicted = self.predict(x)?;
        crate::metrics::accuracy(y, &predicted)
    }
}
