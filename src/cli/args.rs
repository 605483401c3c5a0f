//! Command line argument parsing for the Affront CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AlphaGrid, ExperimentConfig};
use crate::error::Result;

/// Affront - insult detection with TF-IDF and Bernoulli Naive Bayes
#[derive(Parser, Debug, Clone)]
#[command(name = "affront")]
#[command(about = "Detect insulting comments with TF-IDF features and Bernoulli Naive Bayes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AffrontArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Experiment configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AffrontArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train, cross-validate and evaluate on a labeled CSV file
    Run(RunArgs),

    /// Train on a labeled CSV file, then classify the given sentences
    Predict(PredictArgs),
}

/// Settings shared by every command that trains a model.
///
/// Flags override the values of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct TrainArgs {
    /// Labeled CSV file with a header row
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Header of the label column
    #[arg(long)]
    pub label_column: Option<String>,

    /// Header of the text column
    #[arg(long)]
    pub text_column: Option<String>,

    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Decode literal escape sequences (\n, \xNN, \uNNNN) in the text column
    #[arg(long, overrides_with = "no_unescape")]
    pub unescape: bool,

    /// Keep escape sequences as they are
    #[arg(long, overrides_with = "unescape")]
    pub no_unescape: bool,

    /// Drop English stop words
    #[arg(long, overrides_with = "no_stop_words")]
    pub stop_words: bool,

    /// Keep English stop words
    #[arg(long, overrides_with = "stop_words")]
    pub no_stop_words: bool,

    /// Fraction of rows held out for testing
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Number of cross-validation folds
    #[arg(long)]
    pub folds: Option<usize>,

    /// Seed for splitting and shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Explicit smoothing candidates (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub alphas: Vec<f64>,
}

impl TrainArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(column) = &self.label_column {
            config.dataset.label_column = column.clone();
        }
        if let Some(column) = &self.text_column {
            config.dataset.text_column = column.clone();
        }
        if let Some(delimiter) = self.delimiter {
            config.dataset.delimiter = delimiter;
        }
        if let Some(unescape) = switch(self.unescape, self.no_unescape) {
            config.dataset.unescape = unescape;
        }
        if let Some(stop_words) = switch(self.stop_words, self.no_stop_words) {
            config.vectorizer.stop_words = stop_words;
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(folds) = self.folds {
            config.n_folds = folds;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if !self.alphas.is_empty() {
            config.alphas = AlphaGrid::List(self.alphas.clone());
        }
    }
}

/// Resolve a `--flag` / `--no-flag` pair; `None` leaves the config value alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Arguments for a full run
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    /// Number of top insult terms to report
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Show the score of every alpha candidate
    #[arg(long)]
    pub show_grid: bool,
}

/// Arguments for classifying sentences
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    /// Sentences to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Build the experiment configuration from the config file and the flags.
pub fn load_config(args: &AffrontArgs, train: &TrainArgs) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_file(path)?,
        None => ExperimentConfig::default(),
    };
    train.apply(&mut config);
    Ok(config)
}
