//! TF-IDF vectorizer for text feature extraction.
//!
//! Weighting, for term `t` in document `d` over a corpus of `n` documents:
//!
//! ```text
//! tf(t, d)  = count of t in d                  (1 + ln(count) when sublinear)
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1    (ln(n / df(t)) + 1 without smoothing)
//! w(t, d)   = tf(t, d) * idf(t), then each row is normalized
//! ```
//!
//! Every weight is non-negative because `idf(t) >= 1`.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::{debug, info};

use super::vocabulary::Vocabulary;
use super::{Norm, VectorizerConfig};
use crate::analysis::analyzer::Analyzer;
use crate::error::{AffrontError, Result};
use crate::sparse::CsrMatrix;

/// State learned by [`TfIdfVectorizer::fit`].
#[derive(Clone, Debug)]
struct Fitted {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    n_documents: usize,
}

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
    fitted: Option<Fitted>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary_size())
            .field("n_documents", &self.fitted.as_ref().map(|f| f.n_documents))
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer from a configuration.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = config.build_analyzer()?;
        Ok(Self {
            config,
            analyzer,
            fitted: None,
        })
    }

    /// Create an unfitted vectorizer that tokenizes with the given analyzer.
    ///
    /// The tokenization settings of `config` are ignored in favour of `analyzer`.
    pub fn with_analyzer(config: VectorizerConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            analyzer,
            fitted: None,
        })
    }

    /// Learn the vocabulary and document frequencies of `documents`.
    ///
    /// Fails with [`AffrontError::EmptyCorpus`] when there are no documents or
    /// when no term survives tokenization and the `min_df` cut.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        // A failed refit leaves the vectorizer unfitted.
        self.fitted = None;
        if documents.is_empty() {
            return Err(AffrontError::empty_corpus(
                "cannot fit a vocabulary on zero documents",
            ));
        }

        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();
        for doc in documents {
            let unique_terms: AHashSet<String> =
                self.analyzer.terms(doc.as_ref())?.into_iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let min_df = self.config.min_df;
        let vocabulary = Vocabulary::from_terms(
            document_frequency
                .iter()
                .filter(|&(_, &df)| df >= min_df)
                .map(|(term, _)| term.clone()),
        );
        if vocabulary.is_empty() {
            return Err(AffrontError::empty_corpus(format!(
                "{} documents produced no terms with document frequency >= {min_df}",
                documents.len()
            )));
        }

        let n_documents = documents.len();
        let idf = vocabulary
            .terms()
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0);
                self.idf_weight(n_documents, df)
            })
            .collect();

        info!(
            "fitted vocabulary of {} terms over {} documents ({} distinct before min_df)",
            vocabulary.len(),
            n_documents,
            document_frequency.len()
        );

        self.fitted = Some(Fitted {
            vocabulary,
            idf,
            n_documents,
        });

        Ok(())
    }

    /// Transform documents into TF-IDF rows over the fitted vocabulary.
    ///
    /// Terms that are not in the vocabulary are dropped; a document without
    /// any known term becomes an all-zero row.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<CsrMatrix> {
        let fitted = self.fitted()?;

        let mut rows = Vec::with_capacity(documents.len());
        for doc in documents {
            rows.push(self.weigh_document(fitted, doc.as_ref())?);
        }

        let matrix = CsrMatrix::from_rows(fitted.vocabulary.len(), rows)?;
        debug!(
            "transformed {} documents into {} non-zero entries",
            matrix.n_rows(),
            matrix.nnz()
        );
        Ok(matrix)
    }

    /// Transform a single document.
    pub fn transform_one(&self, document: &str) -> Result<CsrMatrix> {
        self.transform(&[document])
    }

    /// Fit on `documents`, then transform them.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<CsrMatrix> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Check if the vectorizer has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The fitted vocabulary.
    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        Ok(&self.fitted()?.vocabulary)
    }

    /// Inverse document frequency per column.
    pub fn idf(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.idf)
    }

    /// Get the size of the vocabulary (zero before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.vocabulary.len())
    }

    /// The configuration this vectorizer was built with.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted
            .as_ref()
            .ok_or_else(|| AffrontError::not_fitted("TfIdfVectorizer has not been fitted"))
    }

    fn idf_weight(&self, n_documents: usize, df: usize) -> f64 {
        let (n, df) = (n_documents as f64, df as f64);
        if self.config.smooth_idf {
            ((n + 1.0) / (df + 1.0)).ln() + 1.0
        } else {
            (n / df).ln() + 1.0
        }
    }

    fn weigh_document(&self, fitted: &Fitted, document: &str) -> Result<Vec<(usize, f64)>> {
        let mut counts: AHashMap<usize, usize> = AHashMap::new();
        for term in self.analyzer.terms(document)? {
            if let Some(idx) = fitted.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (idx, tf * fitted.idf[idx])
            })
            .collect();

        let norm = match self.config.norm {
            Norm::L2 => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Norm::L1 => weights.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, w) in &mut weights {
                *w /= norm;
            }
        }

        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard::StandardAnalyzer;

    fn corpus() -> Vec<String> {
        vec![
            "I love you.".to_string(),
            "You are so stupid.".to_string(),
            "You are a stupid idiot, stupid!".to_string(),
        ]
    }

    fn fitted_vectorizer() -> TfIdfVectorizer {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        vectorizer.fit(&corpus()).unwrap();
        vectorizer
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let vectorizer = fitted_vectorizer();
        let vocabulary = vectorizer.vocabulary().unwrap();

        assert_eq!(
            vocabulary.terms(),
            &["are", "idiot", "love", "so", "stupid", "you"]
        );
        assert_eq!(vectorizer.vocabulary_size(), 6);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = fitted_vectorizer();
        let vocabulary = vectorizer.vocabulary().unwrap();
        let idf = vectorizer.idf().unwrap();

        // "you" appears in all 3 documents, "love" in 1.
        let you = idf[vocabulary.get("you").unwrap()];
        let love = idf[vocabulary.get("love").unwrap()];
        assert!((you - 1.0).abs() < 1e-12);
        assert!((love - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_l2_normalized_and_non_negative() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let matrix = vectorizer.fit_transform(&corpus()).unwrap();

        assert_eq!(matrix.shape(), (3, 6));
        assert!(matrix.values().iter().all(|&v| v >= 0.0));
        for row in matrix.rows() {
            let norm: f64 = row.data().iter().map(|v| v * v).sum();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_term_frequency_counts_repeats() {
        let config = VectorizerConfig {
            norm: Norm::None,
            smooth_idf: false,
            ..Default::default()
        };
        let mut vectorizer = TfIdfVectorizer::new(config).unwrap();
        vectorizer.fit(&corpus()).unwrap();

        let matrix = vectorizer.transform_one("stupid stupid").unwrap();
        let col = vectorizer.vocabulary().unwrap().get("stupid").unwrap();
        let expected = 2.0 * ((3.0f64 / 2.0).ln() + 1.0);
        assert!((matrix.get(0, col) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let vectorizer = fitted_vectorizer();
        let first = vectorizer.transform_one("You are so stupid.").unwrap();
        let second = vectorizer.transform_one("You are so stupid.").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_terms_yield_zero_row() {
        let vectorizer = fitted_vectorizer();
        let matrix = vectorizer.transform_one("Wonderful weather today").unwrap();

        assert_eq!(matrix.shape(), (1, 6));
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_refit_corpus_keeps_column_count() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let fitted = vectorizer.fit_transform(&corpus()).unwrap();
        let again = vectorizer.transform(&corpus()).unwrap();
        assert_eq!(fitted.n_cols(), again.n_cols());
        assert_eq!(fitted, again);
    }

    #[test]
    fn test_empty_corpus() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let documents: Vec<String> = Vec::new();

        let result = vectorizer.fit(&documents);
        assert!(matches!(result, Err(AffrontError::EmptyCorpus(_))));
        assert!(!vectorizer.is_fitted());
        assert!(vectorizer.vocabulary().is_err());
    }

    #[test]
    fn test_corpus_without_terms() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let result = vectorizer.fit(&["!!!", "a b c"]);
        assert!(matches!(result, Err(AffrontError::EmptyCorpus(_))));
    }

    #[test]
    fn test_failed_refit_clears_previous_fit() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        vectorizer.fit(&corpus()).unwrap();
        assert!(vectorizer.is_fitted());

        let result = vectorizer.fit(&["!!!"]);
        assert!(matches!(result, Err(AffrontError::EmptyCorpus(_))));
        assert!(!vectorizer.is_fitted());
        assert_eq!(vectorizer.vocabulary_size(), 0);
        assert!(matches!(
            vectorizer.transform_one("stupid"),
            Err(AffrontError::NotFitted(_))
        ));
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let config = VectorizerConfig {
            min_df: 2,
            ..Default::default()
        };
        let mut vectorizer = TfIdfVectorizer::new(config).unwrap();
        vectorizer.fit(&corpus()).unwrap();

        assert_eq!(
            vectorizer.vocabulary().unwrap().terms(),
            &["are", "stupid", "you"]
        );
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let result = vectorizer.transform_one("hello");
        assert!(matches!(result, Err(AffrontError::NotFitted(_))));
    }

    #[test]
    fn test_with_custom_analyzer() {
        let analyzer = Arc::new(StandardAnalyzer::with_stop_words().unwrap());
        let mut vectorizer =
            TfIdfVectorizer::with_analyzer(VectorizerConfig::default(), analyzer).unwrap();
        vectorizer.fit(&corpus()).unwrap();

        assert!(!vectorizer.vocabulary().unwrap().contains("are"));
    }
}
