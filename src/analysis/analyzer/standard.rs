//! Standard analyzer used by the TF-IDF vectorizer.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (`\b\w\w+\b`)
//! 2. LowercaseFilter
//! 3. StopFilter (only with [`StandardAnalyzer::with_stop_words`])
//!
//! # Examples
//!
//! ```
//! use affront::analysis::analyzer::Analyzer;
//! use affront::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let terms = analyzer.terms("You are so STUPID.").unwrap();
//!
//! assert_eq!(terms, vec!["you", "are", "so", "stupid"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// A standard analyzer: regex tokenization and lowercasing.
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with the default token pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN)
    }

    /// Create a standard analyzer with a custom token pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(pattern)?);
        let analyzer = PipelineAnalyzer::new(tokenizer).add_filter(Arc::new(LowercaseFilter::new()));

        Ok(StandardAnalyzer { inner: analyzer })
    }

    /// Create a standard analyzer that also drops English stop words.
    pub fn with_stop_words() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()));

        Ok(StandardAnalyzer { inner: analyzer })
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
