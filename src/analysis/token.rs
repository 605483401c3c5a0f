//! Tokens passed from a tokenizer through the filter chain.
//!
//! ```
//! use affront::analysis::token::Token;
//!
//! let token = Token::new("Idiot").map_text(str::to_lowercase);
//! assert_eq!(token.text, "idiot");
//! ```

use std::fmt;

/// One word of a comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Current text; filters may rewrite it.
    pub text: String,
}

impl Token {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token { text: text.into() }
    }

    /// Replace the text.
    pub fn map_text<F: FnOnce(&str) -> String>(mut self, f: F) -> Self {
        self.text = f(&self.text);
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Tokens of one comment, in order.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
