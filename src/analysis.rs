//! Text analysis for comment classification.
//!
//! Raw comment text flows through an [`Analyzer`](analyzer::Analyzer): a
//! tokenizer splits it into [`Token`](token::Token)s and a chain of filters
//! normalizes them. The vectorizer only ever sees the resulting term strings.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
