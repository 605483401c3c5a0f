//! Data splitting, cross-validation and hyperparameter search.

pub mod grid_search;
pub mod split;

pub use grid_search::{AlphaScore, GridSearch, GridSearchResult};
pub use split::{CrossValidator, Fold, KFold, StratifiedKFold, train_test_split};

use crate::dataset::Label;
use crate::error::{AffrontError, Result};
use crate::sparse::CsrMatrix;
use crate::traits::{Estimator, Predictor};

/// `num` values spaced evenly on a log scale from `10^start` to `10^stop`.
///
/// Both endpoints are included. `num == 1` yields `[10^start]`.
pub fn logspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    let exponent = if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    };
                    10f64.powf(exponent)
                })
                .collect()
        }
    }
}

/// Accuracy of `estimator` on every fold produced by `cv`.
///
/// Folds are evaluated sequentially; [`GridSearch`] parallelizes across
/// folds and hyperparameters itself.
pub fn cross_val_score<E, C>(estimator: &E, x: &CsrMatrix, y: &[Label], cv: &C) -> Result<Vec<f64>>
where
    E: Estimator,
    C: CrossValidator + ?Sized,
{
    if x.n_rows() != y.len() {
        return Err(AffrontError::shape_mismatch(
            format!("{} labels", x.n_rows()),
            format!("{} labels", y.len()),
        ));
    }

    cv.split(y)?
        .iter()
        .map(|fold| evaluate_fold(estimator, x, y, fold))
        .collect()
}

/// Fit on the fold's training rows and score on its validation rows.
pub(crate) fn evaluate_fold<E: Estimator>(
    estimator: &E,
    x: &CsrMatrix,
    y: &[Label],
    fold: &Fold,
) -> Result<f64> {
    let x_train = x.select_rows(&fold.train)?;
    let y_train = select(y, &fold.train);
    let x_valid = x.select_rows(&fold.validation)?;
    let y_valid = select(y, &fold.validation);

    let model = estimator.fit(&x_train, &y_train)?;
    model.score(&x_valid, &y_valid)
}

/// Gather `values[i]` for each index, in index order.
pub fn select<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}
