//! The end-to-end insult detection run.
//!
//! ```text
//! load CSV -> fit TF-IDF on all comments -> train/test split
//!          -> grid search alpha on train (k-fold) -> score best model on test
//!          -> top terms -> classify sample sentences
//! ```

use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::config::{CvStrategy, ExperimentConfig};
use crate::dataset::{Dataset, Label};
use crate::error::{AffrontError, Result};
use crate::metrics::{ConfusionMatrix, accuracy};
use crate::model_selection::{
    AlphaScore, CrossValidator, GridSearch, GridSearchResult, KFold, StratifiedKFold, select,
    train_test_split,
};
use crate::naive_bayes::FittedBernoulliNb;
use crate::sparse::CsrMatrix;
use crate::vectorize::TfIdfVectorizer;

/// Classification of one sentence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub text: String,
    pub label: Label,
    /// Posterior probability of [`Label::Insulting`].
    pub insult_probability: f64,
}

/// A vocabulary term with its insult log-odds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub log_odds: f64,
}

/// A fitted vectorizer and classifier that share one column layout.
#[derive(Debug)]
pub struct InsultClassifier {
    vectorizer: TfIdfVectorizer,
    model: FittedBernoulliNb,
}

impl InsultClassifier {
    /// Pair a fitted vectorizer with a model trained on its columns.
    pub fn new(vectorizer: TfIdfVectorizer, model: FittedBernoulliNb) -> Result<Self> {
        let columns = vectorizer.vocabulary()?.len();
        if columns != model.n_features() {
            return Err(AffrontError::shape_mismatch(
                format!("{} feature columns", columns),
                format!("{} feature columns", model.n_features()),
            ));
        }
        Ok(InsultClassifier { vectorizer, model })
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &FittedBernoulliNb {
        &self.model
    }

    /// Vectorize and classify each text.
    pub fn predict_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Prediction>> {
        let x = self.vectorizer.transform(texts)?;
        let labels = self.model.predict(&x)?;
        let probabilities = self.model.probability_of(&x, Label::Insulting)?;

        Ok(texts
            .iter()
            .zip(labels)
            .zip(probabilities)
            .map(|((text, label), insult_probability)| Prediction {
                text: text.as_ref().to_string(),
                label,
                insult_probability,
            })
            .collect())
    }

    /// Probability that `text` is insulting.
    pub fn insult_probability(&self, text: &str) -> Result<f64> {
        let x = self.vectorizer.transform_one(text)?;
        let probabilities = self.model.probability_of(&x, Label::Insulting)?;
        Ok(probabilities.first().copied().unwrap_or(0.0))
    }

    /// The `n` terms most indicative of an insult.
    pub fn top_terms(&self, n: usize) -> Result<Vec<TermWeight>> {
        let vocabulary = self.vectorizer.vocabulary()?;
        self.model
            .top_features(n)
            .into_iter()
            .map(|(column, log_odds)| -> Result<TermWeight> {
                let term = vocabulary.term(column).ok_or_else(|| {
                    AffrontError::shape_mismatch(
                        format!("column < {}", vocabulary.len()),
                        column,
                    )
                })?;
                Ok(TermWeight {
                    term: term.to_string(),
                    log_odds,
                })
            })
            .collect()
    }
}

/// Everything a run measured.
#[derive(Clone, Debug, Serialize)]
pub struct ExperimentReport {
    pub n_documents: usize,
    pub n_insulting: usize,
    pub vocabulary_size: usize,
    /// Fraction of non-zero cells in the feature matrix.
    pub density: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub n_folds: usize,
    pub best_alpha: f64,
    /// Mean cross-validated accuracy of `best_alpha` on the training rows.
    pub cv_accuracy: f64,
    /// Accuracy of the refitted best model on the held-out rows.
    pub test_accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub grid: Vec<AlphaScore>,
    pub top_terms: Vec<TermWeight>,
    pub predictions: Vec<Prediction>,
}

/// A finished run: the report and the classifier it produced.
#[derive(Debug)]
pub struct ExperimentRun {
    pub report: ExperimentReport,
    pub classifier: InsultClassifier,
}

/// Runs the insult detection walkthrough with one configuration.
#[derive(Clone, Debug, Default)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Experiment { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Load the dataset at `path` and run on it.
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<ExperimentRun> {
        let dataset = Dataset::load(path, &self.config.dataset)?;
        self.run_on(&dataset)
    }

    /// Run on an already loaded dataset.
    pub fn run_on(&self, dataset: &Dataset) -> Result<ExperimentRun> {
        let config = &self.config;
        if dataset.is_empty() {
            return Err(AffrontError::empty_corpus("the dataset has no documents"));
        }

        let texts = dataset.texts();
        let labels = dataset.labels();

        let mut vectorizer = TfIdfVectorizer::new(config.vectorizer.clone())?;
        let x = vectorizer.fit_transform(&texts)?;
        info!(
            "Feature matrix: {} x {} ({:.4}% non-zero)",
            x.n_rows(),
            x.n_cols(),
            x.density() * 100.0
        );

        let (train, test) = train_test_split(dataset.len(), config.test_size, Some(config.seed))?;
        let x_train = x.select_rows(&train)?;
        let y_train = select(&labels, &train);
        let x_test = x.select_rows(&test)?;
        let y_test = select(&labels, &test);
        info!("Split: {} training rows, {} test rows", train.len(), test.len());

        if Label::ALL
            .iter()
            .any(|label| !y_train.contains(label))
        {
            warn!("The training rows hold a single class; every prediction will be that class");
        }

        let search = match config.cv {
            CvStrategy::KFold => self.search(
                KFold::new(config.n_folds).with_random_state(config.seed),
                &x_train,
                &y_train,
            )?,
            CvStrategy::Stratified => self.search(
                StratifiedKFold::new(config.n_folds).with_random_state(config.seed),
                &x_train,
                &y_train,
            )?,
        };

        let predicted = search.best_estimator.predict(&x_test)?;
        let test_accuracy = accuracy(&y_test, &predicted)?;
        let confusion = ConfusionMatrix::new(&y_test, &predicted)?;
        info!("Test accuracy: {test_accuracy:.4}");

        let classifier = InsultClassifier::new(vectorizer, search.best_estimator)?;
        let top_terms = classifier.top_terms(config.top_n)?;
        let predictions = classifier.predict_texts(&config.samples)?;

        let report = ExperimentReport {
            n_documents: dataset.len(),
            n_insulting: dataset.count(Label::Insulting),
            vocabulary_size: x.n_cols(),
            density: x.density(),
            n_train: train.len(),
            n_test: test.len(),
            n_folds: config.n_folds,
            best_alpha: search.best_alpha,
            cv_accuracy: search.best_score,
            test_accuracy,
            confusion,
            grid: search.cv_results,
            top_terms,
            predictions,
        };

        Ok(ExperimentRun { report, classifier })
    }

    fn search<C: CrossValidator>(
        &self,
        cv: C,
        x: &CsrMatrix,
        y: &[Label],
    ) -> Result<GridSearchResult> {
        GridSearch::new(self.config.alphas.values(), cv)
            .with_binarize(self.config.binarize)
            .fit(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlphaGrid;
    use crate::dataset::Document;

    fn corpus() -> Dataset {
        let insults = [
            "You are so stupid.",
            "You are an idiot.",
            "Shut up, you stupid idiot.",
            "What a stupid moron you are.",
            "You idiot, nobody cares.",
        ];
        let friendly = [
            "I totally agree with you.",
            "Thanks for sharing this.",
            "I love this idea.",
            "Great point, I agree.",
            "Have a nice day.",
        ];
        let mut documents = Vec::new();
        for _ in 0..4 {
            documents.extend(insults.iter().map(|t| Document::new(Label::Insulting, *t)));
            documents.extend(friendly.iter().map(|t| Document::new(Label::NotInsulting, *t)));
        }
        Dataset::new(documents)
    }

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            n_folds: 3,
            alphas: AlphaGrid::List(vec![0.1, 1.0, 10.0]),
            top_n: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_on_corpus() {
        let experiment = Experiment::new(small_config()).unwrap();
        let run = experiment.run_on(&corpus()).unwrap();
        let report = &run.report;

        assert_eq!(report.n_documents, 40);
        assert_eq!(report.n_insulting, 20);
        assert_eq!(report.n_test, 8);
        assert_eq!(report.n_train, 32);
        assert_eq!(report.grid.len(), 3);
        assert_eq!(report.top_terms.len(), 5);
        assert_eq!(report.confusion.total(), 8);
        assert!(report.test_accuracy >= 0.0 && report.test_accuracy <= 1.0);
        assert!(report.density > 0.0 && report.density < 1.0);

        let predictions = &report.predictions;
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[1].text, "You are so stupid.");
        assert_eq!(predictions[1].label, Label::Insulting);
        assert!(predictions[1].insult_probability > 0.5);
    }

    #[test]
    fn test_top_terms_are_insults() {
        let experiment = Experiment::new(small_config()).unwrap();
        let run = experiment.run_on(&corpus()).unwrap();
        let terms: Vec<&str> = run
            .report
            .top_terms
            .iter()
            .map(|t| t.term.as_str())
            .collect();

        assert!(terms.contains(&"stupid"));
        assert!(terms.contains(&"idiot"));
        assert!(
            run.report
                .top_terms
                .windows(2)
                .all(|w| w[0].log_odds >= w[1].log_odds)
        );
    }

    #[test]
    fn test_classifier_handles_unseen_words() {
        let experiment = Experiment::new(small_config()).unwrap();
        let run = experiment.run_on(&corpus()).unwrap();

        let predictions = run
            .classifier
            .predict_texts(&["zzz qqq", "stupid idiot"])
            .unwrap();
        assert_eq!(predictions[1].label, Label::Insulting);

        let p = run.classifier.insult_probability("zzz qqq").unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_empty_dataset() {
        let experiment = Experiment::new(small_config()).unwrap();
        let result = experiment.run_on(&Dataset::default());
        assert!(matches!(result, Err(AffrontError::EmptyCorpus(_))));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = ExperimentConfig {
            alphas: AlphaGrid::List(vec![0.0]),
            ..Default::default()
        };
        assert!(matches!(
            Experiment::new(config),
            Err(AffrontError::InvalidHyperparameter { .. })
        ));
    }
}
