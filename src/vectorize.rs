//! Bag-of-words feature extraction.
//!
//! [`TfIdfVectorizer`] turns raw comments into a sparse
//! [`CsrMatrix`](crate::sparse::CsrMatrix) whose columns are the terms of a
//! [`Vocabulary`] fitted on the training corpus.

pub mod tfidf;
pub mod vocabulary;

pub use tfidf::TfIdfVectorizer;
pub use vocabulary::Vocabulary;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
use crate::error::{AffrontError, Result};

/// Row normalization applied after TF-IDF weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale each row to unit Euclidean length.
    #[default]
    L2,
    /// Scale each row so its values sum to one.
    L1,
    /// Leave rows unscaled.
    None,
}

/// Configuration for the TF-IDF vectorizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Regex whose matches are the tokens.
    pub token_pattern: String,
    /// Fold tokens to lowercase.
    pub lowercase: bool,
    /// Drop the default English stop words.
    pub stop_words: bool,
    /// Minimum number of documents a term must appear in to enter the vocabulary.
    pub min_df: usize,
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Add one to document frequencies, as if an extra document held every term.
    pub smooth_idf: bool,
    /// Row normalization.
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            stop_words: false,
            min_df: 1,
            sublinear_tf: false,
            smooth_idf: true,
            norm: Norm::L2,
        }
    }
}

impl VectorizerConfig {
    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> Result<()> {
        if self.min_df == 0 {
            return Err(AffrontError::invalid_hyperparameter("min_df", 0, ">= 1"));
        }
        if self.token_pattern.is_empty() {
            return Err(AffrontError::config("token_pattern must not be empty"));
        }
        Ok(())
    }

    /// Build the analyzer described by this configuration.
    pub fn build_analyzer(&self) -> Result<Arc<dyn Analyzer>> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if self.stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }
        Ok(Arc::new(analyzer))
    }
}
