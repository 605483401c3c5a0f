//! Train/test splitting and k-fold cross-validation splitters.

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::dataset::Label;
use crate::error::{AffrontError, Result};

/// One cross-validation partition of row indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    /// Rows the model is fitted on.
    pub train: Vec<usize>,
    /// Rows the fitted model is scored on.
    pub validation: Vec<usize>,
}

/// Produces cross-validation folds over a labeled sample.
pub trait CrossValidator: Send + Sync {
    /// Number of folds `split` returns.
    fn n_splits(&self) -> usize;

    /// Partition the indices `0..labels.len()` into folds.
    ///
    /// Every index appears in exactly one validation set.
    fn split(&self, labels: &[Label]) -> Result<Vec<Fold>>;
}

fn rng_for(random_state: Option<u64>) -> StdRng {
    match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn check_n_splits(n_splits: usize, n_samples: usize) -> Result<()> {
    if n_splits < 2 {
        return Err(AffrontError::invalid_hyperparameter(
            "n_splits",
            n_splits,
            ">= 2",
        ));
    }
    if n_splits > n_samples {
        return Err(AffrontError::invalid_hyperparameter(
            "n_splits",
            n_splits,
            format!("<= number of samples ({n_samples})"),
        ));
    }
    Ok(())
}

/// Sizes of `n_splits` contiguous chunks covering `n` items; the first
/// `n % n_splits` chunks are one larger.
fn fold_sizes(n: usize, n_splits: usize) -> impl Iterator<Item = usize> {
    let base = n / n_splits;
    let remainder = n % n_splits;
    (0..n_splits).map(move |i| base + usize::from(i < remainder))
}

fn folds_from_assignment(assignment: &[usize], n_splits: usize) -> Vec<Fold> {
    (0..n_splits)
        .map(|k| {
            let (validation, train): (Vec<usize>, Vec<usize>) =
                (0..assignment.len()).partition(|&i| assignment[i] == k);
            Fold { train, validation }
        })
        .collect()
}

/// K-fold cross-validation.
///
/// Splits the sample into `n_splits` consecutive folds, optionally after a
/// seeded shuffle. Each fold is used once as the validation set.
#[derive(Clone, Debug)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        KFold {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed the shuffle; implies `with_shuffle(true)`.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_state = Some(seed);
        self
    }
}

impl CrossValidator for KFold {
    fn n_splits(&self) -> usize {
        self.n_splits
    }

    fn split(&self, labels: &[Label]) -> Result<Vec<Fold>> {
        let n_samples = labels.len();
        check_n_splits(self.n_splits, n_samples)?;

        let mut order: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            order.shuffle(&mut rng_for(self.random_state));
        }

        let mut assignment = vec![0; n_samples];
        let mut start = 0;
        for (k, size) in fold_sizes(n_samples, self.n_splits).enumerate() {
            for &i in &order[start..start + size] {
                assignment[i] = k;
            }
            start += size;
        }

        Ok(folds_from_assignment(&assignment, self.n_splits))
    }
}

/// K-fold cross-validation that preserves the class balance in every fold.
///
/// The rows of each class are dealt out over the folds separately, so every
/// validation set holds roughly `1 / n_splits` of each class.
#[derive(Clone, Debug)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        StratifiedKFold {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed the shuffle; implies `with_shuffle(true)`.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_state = Some(seed);
        self
    }
}

impl CrossValidator for StratifiedKFold {
    fn n_splits(&self) -> usize {
        self.n_splits
    }

    fn split(&self, labels: &[Label]) -> Result<Vec<Fold>> {
        let n_samples = labels.len();
        check_n_splits(self.n_splits, n_samples)?;

        let mut rng = rng_for(self.random_state);
        let mut assignment = vec![0; n_samples];

        // Offset the chunk order per class so the larger chunks of one class
        // don't all land on the same folds as those of the other.
        let mut offset = 0;
        for label in Label::ALL {
            let mut members: Vec<usize> = (0..n_samples).filter(|&i| labels[i] == label).collect();
            if members.is_empty() {
                continue;
            }
            if members.len() < self.n_splits {
                warn!(
                    "class {label} has {} members, fewer than n_splits = {}",
                    members.len(),
                    self.n_splits
                );
            }
            if self.shuffle {
                members.shuffle(&mut rng);
            }

            let mut start = 0;
            for (k, size) in fold_sizes(members.len(), self.n_splits).enumerate() {
                let fold = (k + offset) % self.n_splits;
                for &i in &members[start..start + size] {
                    assignment[i] = fold;
                }
                start += size;
            }
            offset += members.len() % self.n_splits;
        }

        Ok(folds_from_assignment(&assignment, self.n_splits))
    }
}

/// Shuffle `0..n_samples` with `seed` and split off a test subset.
///
/// The test subset has `ceil(test_size * n_samples)` rows. Returns
/// `(train, test)`; both are non-empty.
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    seed: Option<u64>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(AffrontError::invalid_hyperparameter(
            "test_size",
            test_size,
            "in (0, 1)",
        ));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(AffrontError::invalid_hyperparameter(
            "test_size",
            test_size,
            format!("leaving both subsets non-empty for {n_samples} samples"),
        ));
    }

    let mut order: Vec<usize> = (0..n_samples).collect();
    order.shuffle(&mut rng_for(seed));
    let train = order.split_off(n_test);

    Ok((train, order))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pattern: &[u8]) -> Vec<Label> {
        pattern
            .iter()
            .map(|&v| Label::from_u8(v).unwrap())
            .collect()
    }

    fn assert_partition(folds: &[Fold], n: usize) {
        let mut seen = vec![0; n];
        for fold in folds {
            assert_eq!(fold.train.len() + fold.validation.len(), n);
            for &i in &fold.validation {
                seen[i] += 1;
                assert!(!fold.train.contains(&i));
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_kfold_sizes() {
        let y = vec![Label::NotInsulting; 10];
        let folds = KFold::new(3).split(&y).unwrap();

        assert_eq!(folds.len(), 3);
        let sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(folds[0].validation, vec![0, 1, 2, 3]);
        assert_partition(&folds, 10);
    }

    #[test]
    fn test_kfold_shuffle_is_reproducible() {
        let y = vec![Label::Insulting; 25];
        let a = KFold::new(5).with_random_state(42).split(&y).unwrap();
        let b = KFold::new(5).with_random_state(42).split(&y).unwrap();

        assert_eq!(a, b);
        assert_partition(&a, 25);
    }

    #[test]
    fn test_kfold_invalid_splits() {
        let y = vec![Label::Insulting; 4];
        assert!(matches!(
            KFold::new(1).split(&y),
            Err(AffrontError::InvalidHyperparameter { .. })
        ));
        assert!(matches!(
            KFold::new(5).split(&y),
            Err(AffrontError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_stratified_kfold_keeps_balance() {
        // 8 insulting, 4 not insulting.
        let y = labels(&[1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0]);
        let folds = StratifiedKFold::new(4)
            .with_random_state(7)
            .split(&y)
            .unwrap();

        assert_partition(&folds, y.len());
        for fold in &folds {
            let insulting = fold
                .validation
                .iter()
                .filter(|&&i| y[i] == Label::Insulting)
                .count();
            assert_eq!(insulting, 2);
            assert_eq!(fold.validation.len(), 3);
        }
    }

    #[test]
    fn test_stratified_kfold_spreads_remainders() {
        // 3 of each class over 2 folds: 2+1 and 1+2 rather than 4+2.
        let y = labels(&[0, 0, 0, 1, 1, 1]);
        let folds = StratifiedKFold::new(2).split(&y).unwrap();

        assert_partition(&folds, 6);
        assert_eq!(folds[0].validation.len(), 3);
        assert_eq!(folds[1].validation.len(), 3);
    }

    #[test]
    fn test_train_test_split() {
        let (train, test) = train_test_split(10, 0.2, Some(3)).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        assert_eq!(train_test_split(10, 0.2, Some(3)).unwrap(), (train, test));
    }

    #[test]
    fn test_train_test_split_rounds_test_size_up() {
        let (train, test) = train_test_split(7, 0.2, Some(0)).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 5);
    }

    #[test]
    fn test_train_test_split_invalid() {
        assert!(train_test_split(10, 0.0, None).is_err());
        assert!(train_test_split(10, 1.0, None).is_err());
        assert!(train_test_split(10, f64::NAN, None).is_err());
        assert!(train_test_split(1, 0.5, None).is_err());
    }
}
