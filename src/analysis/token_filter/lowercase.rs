//! Case folding.
//!
//! ```
//! use affront::analysis::token::Token;
//! use affront::analysis::token_filter::Filter;
//! use affront::analysis::token_filter::lowercase::LowercaseFilter;
//!
//! let tokens = vec![Token::new("You"), Token::new("IDIOT")];
//! let folded: Vec<String> = LowercaseFilter::new()
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(folded, vec!["you", "idiot"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Lowercases every token.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

fn fold(text: &str) -> String {
    if text.is_ascii() {
        text.to_ascii_lowercase()
    } else {
        text.to_lowercase()
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| token.map_text(fold))))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_folds_ascii_and_unicode() {
        let tokens = vec![
            Token::new("LOSER"),
            Token::new("ÉNORME"),
            Token::new("troll"),
        ];

        let result: Vec<Token> = LowercaseFilter::new()
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result[0].text, "loser");
        assert_eq!(result[1].text, "énorme");
        assert_eq!(result[2].text, "troll");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("YoU"), "you");
        assert_eq!(fold("ÇA"), "ça");
    }
}
