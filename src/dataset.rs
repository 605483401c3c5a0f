//! Labeled comment datasets.
//!
//! A dataset is read once from a delimited file with a header row. The label
//! and text columns are picked by header name; every other column is ignored.
//!
//! ```csv
//! Insult,Date,Comment
//! 1,20120618192155Z,"You are so stupid."
//! 0,20120528192215Z,"I love you."
//! ```
//!
//! Any malformed row fails the whole load; rows are never dropped silently.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::ReaderBuilder;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{AffrontError, Result};

/// Binary comment label.
///
/// The declaration order is the class order used everywhere else:
/// `NotInsulting` sorts first and wins prediction ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NotInsulting,
    Insulting,
}

impl Label {
    /// Both labels in class order.
    pub const ALL: [Label; 2] = [Label::NotInsulting, Label::Insulting];

    /// `0` for not insulting, `1` for insulting.
    pub fn as_u8(self) -> u8 {
        match self {
            Label::NotInsulting => 0,
            Label::Insulting => 1,
        }
    }

    /// Inverse of [`Label::as_u8`].
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::NotInsulting),
            1 => Some(Label::Insulting),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::NotInsulting => write!(f, "not insulting"),
            Label::Insulting => write!(f, "insulting"),
        }
    }
}

impl FromStr for Label {
    type Err = AffrontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" => Ok(Label::NotInsulting),
            "1" | "true" => Ok(Label::Insulting),
            other => Err(AffrontError::data_load(format!(
                "invalid label {other:?}, expected 0 or 1"
            ))),
        }
    }
}

/// One comment and its label. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub label: Label,
    pub text: String,
}

impl Document {
    pub fn new<S: Into<String>>(label: Label, text: S) -> Self {
        Document {
            label,
            text: text.into(),
        }
    }
}

/// Where to find labels and texts in the input file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Header of the label column.
    pub label_column: String,
    /// Header of the text column.
    pub text_column: String,
    /// Field delimiter.
    pub delimiter: char,
    /// Decode literal `\n`, `\xNN`, `\uNNNN`, ... escapes in the text column.
    pub unescape: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            label_column: "Insult".to_string(),
            text_column: "Comment".to_string(),
            delimiter: ',',
            unescape: false,
        }
    }
}

impl DatasetConfig {
    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(AffrontError::config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.label_column == self.text_column {
            return Err(AffrontError::config(
                "label_column and text_column must differ",
            ));
        }
        Ok(())
    }
}

/// An ordered collection of labeled documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    documents: Vec<Document>,
}

impl Dataset {
    pub fn new(documents: Vec<Document>) -> Self {
        Dataset { documents }
    }

    /// Load a dataset from a file.
    pub fn load<P: AsRef<Path>>(path: P, config: &DatasetConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AffrontError::data_load(format!("cannot open {}: {e}", path.display()))
        })?;
        let dataset = Self::from_reader(file, config)?;
        info!(
            "loaded {} documents from {} ({} insulting)",
            dataset.len(),
            path.display(),
            dataset.count(Label::Insulting)
        );
        Ok(dataset)
    }

    /// Read a dataset from any reader producing delimited text.
    pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<Self> {
        config.validate()?;

        let mut reader = ReaderBuilder::new()
            .delimiter(config.delimiter as u8)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AffrontError::data_load(format!("failed to read header: {e}")))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AffrontError::data_load(format!("missing column {name:?}")))
        };
        let label_idx = column(&config.label_column)?;
        let text_idx = column(&config.text_column)?;

        let mut documents = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| AffrontError::data_load(format!("{e}")))?;
            let line = record.position().map_or(0, |p| p.line());

            let label = match record.get(label_idx).map(str::trim) {
                Some(raw) if !raw.is_empty() => raw
                    .parse::<Label>()
                    .map_err(|e| AffrontError::data_load(format!("line {line}: {e}")))?,
                _ => {
                    return Err(AffrontError::data_load(format!(
                        "line {line}: missing label"
                    )));
                }
            };
            let text = match record.get(text_idx) {
                Some(raw) if !raw.trim().is_empty() => {
                    if config.unescape {
                        unescape(raw)
                    } else {
                        raw.to_string()
                    }
                }
                _ => {
                    return Err(AffrontError::data_load(format!(
                        "line {line}: missing text"
                    )));
                }
            };

            documents.push(Document { label, text });
        }

        Ok(Dataset { documents })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Texts in document order.
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    /// Labels in document order.
    pub fn labels(&self) -> Vec<Label> {
        self.documents.iter().map(|d| d.label).collect()
    }

    /// Number of documents carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.documents.iter().filter(|d| d.label == label).count()
    }
}

/// Decode the backslash escapes found in scraped comment text.
///
/// Unknown escapes are kept verbatim.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some(q @ ('\\' | '\'' | '"')) => {
                chars.next();
                out.push(q);
            }
            Some(kind @ ('x' | 'u')) => {
                let width = if kind == 'x' { 2 } else { 4 };
                let digits: String = chars.clone().skip(1).take(width).collect();
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        for _ in 0..=width {
                            chars.next();
                        }
                        out.push(ch);
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Insult,Date,Comment\n\
        1,20120618192155Z,\"You are so stupid.\"\n\
        0,20120528192215Z,\"I love you.\"\n\
        0,,\"\"\"Quoted\"\", she said\"\n";

    #[test]
    fn test_load_from_reader() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes(), &DatasetConfig::default()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.labels(),
            vec![Label::Insulting, Label::NotInsulting, Label::NotInsulting]
        );
        assert_eq!(dataset.texts()[0], "You are so stupid.");
        assert_eq!(dataset.texts()[2], "\"Quoted\", she said");
        assert_eq!(dataset.count(Label::Insulting), 1);
    }

    #[test]
    fn test_missing_column() {
        let config = DatasetConfig {
            text_column: "Body".to_string(),
            ..Default::default()
        };
        let result = Dataset::from_reader(SAMPLE.as_bytes(), &config);
        assert!(matches!(result, Err(AffrontError::DataLoad(_))));
    }

    #[test]
    fn test_missing_label_fails_whole_load() {
        let data = "Insult,Comment\n1,fine\n,no label here\n";
        let err = Dataset::from_reader(data.as_bytes(), &DatasetConfig::default()).unwrap_err();
        assert!(matches!(err, AffrontError::DataLoad(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_short_row_is_missing_text() {
        let data = "Insult,Comment\n1\n";
        let err = Dataset::from_reader(data.as_bytes(), &DatasetConfig::default()).unwrap_err();
        assert!(err.to_string().contains("missing text"));
    }

    #[test]
    fn test_invalid_label() {
        let data = "Insult,Comment\n2,hello there\n";
        let err = Dataset::from_reader(data.as_bytes(), &DatasetConfig::default()).unwrap_err();
        assert!(err.to_string().contains("invalid label"));
    }

    #[test]
    fn test_custom_delimiter_and_columns() {
        let data = "label\ttext\ntrue\tgo away troll\nfalse\tnice post\n";
        let config = DatasetConfig {
            label_column: "label".to_string(),
            text_column: "text".to_string(),
            delimiter: '\t',
            unescape: false,
        };
        let dataset = Dataset::from_reader(data.as_bytes(), &config).unwrap();
        assert_eq!(dataset.labels(), vec![Label::Insulting, Label::NotInsulting]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"\xa0You\nidiot"), "\u{a0}You\nidiot");
        assert_eq!(unescape(r"café \'ok\'"), "café 'ok'");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
        assert_eq!(unescape(r"bad \xZZ and \q"), r"bad \xZZ and \q");
        assert_eq!(unescape(r"trailing \"), r"trailing \");
    }

    #[test]
    fn test_label_order_and_parsing() {
        assert!(Label::NotInsulting < Label::Insulting);
        assert_eq!("1".parse::<Label>().unwrap(), Label::Insulting);
        assert_eq!(" FALSE ".parse::<Label>().unwrap(), Label::NotInsulting);
        assert_eq!(Label::from_u8(1), Some(Label::Insulting));
        assert_eq!(Label::Insulting.as_u8(), 1);
        assert_eq!(Label::Insulting.to_string(), "insulting");
    }
}
