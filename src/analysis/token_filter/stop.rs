//! Stop word removal.
//!
//! The built-in list is a short English one without pronouns.
//!
//! ```
//! use affront::analysis::token::Token;
//! use affront::analysis::token_filter::Filter;
//! use affront::analysis::token_filter::stop::StopFilter;
//!
//! let tokens = vec![Token::new("the"), Token::new("worst"), Token::new("troll")];
//! let kept: Vec<String> = StopFilter::new()
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(kept, vec!["worst", "troll"]);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Built-in English stop words.
pub const ENGLISH_STOP_WORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static ENGLISH: LazyLock<Arc<HashSet<String>>> =
    LazyLock::new(|| Arc::new(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect()));

/// Drops tokens whose text is a stop word.
///
/// Matching is exact, so put this filter after [`LowercaseFilter`] to catch
/// capitalized stop words.
///
/// [`LowercaseFilter`]: crate::analysis::token_filter::LowercaseFilter
#[derive(Clone, Debug)]
pub struct StopFilter {
    words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// A filter over [`ENGLISH_STOP_WORDS`].
    pub fn new() -> Self {
        StopFilter {
            words: Arc::clone(&ENGLISH),
        }
    }

    /// A filter over a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words = Arc::clone(&self.words);
        Ok(Box::new(tokens.filter(move |token| !words.contains(&token.text))))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn run(filter: &StopFilter, words: &[&str]) -> Vec<Token> {
        let tokens: Vec<Token> = words.iter().map(|w| Token::new(*w)).collect();
        filter.filter(Box::new(tokens.into_iter())).unwrap().collect()
    }

    #[test]
    fn test_drops_stop_words() {
        let filter = StopFilter::from_words(["the", "and", "or"]);
        let kept: Vec<String> = run(&filter, &["shut", "the", "door", "and", "go"])
            .into_iter()
            .map(|t| t.text)
            .collect();

        assert_eq!(kept, vec!["shut", "door", "go"]);
    }

    #[test]
    fn test_english_list_keeps_pronouns() {
        let filter = StopFilter::new();
        assert!(filter.is_stop_word("the"));
        assert!(!filter.is_stop_word("you"));
        assert!(!filter.is_stop_word("The"));
        assert_eq!(filter.len(), ENGLISH_STOP_WORDS.len());
    }
}
