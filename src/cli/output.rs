//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{AffrontArgs, OutputFormat};
use crate::error::Result;
use crate::experiment::{ExperimentReport, Prediction};

/// Result structure for the predict command.
#[derive(Debug, Serialize)]
pub struct PredictionResults {
    pub best_alpha: f64,
    pub predictions: Vec<Prediction>,
}

/// Output the report of a full run in the selected format.
pub fn output_report(report: &ExperimentReport, show_grid: bool, args: &AffrontArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", render_report(report, show_grid));
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

/// Output ad-hoc predictions in the selected format.
pub fn output_predictions(results: &PredictionResults, args: &AffrontArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", render_predictions(&results.predictions));
            Ok(())
        }
        OutputFormat::Json => output_json(results, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &AffrontArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render a run report for a terminal.
pub fn render_report(report: &ExperimentReport, show_grid: bool) -> String {
    let mut out = String::new();

    out.push_str("Dataset:\n");
    out.push_str("════════\n");
    out.push_str(&format!(
        "Documents: {} ({} insulting)\n",
        report.n_documents, report.n_insulting
    ));
    out.push_str(&format!("Vocabulary size: {}\n", report.vocabulary_size));
    out.push_str(&format!(
        "Matrix density: {}\n",
        format_percent(report.density)
    ));
    out.push_str(&format!(
        "Train / test rows: {} / {}\n",
        report.n_train, report.n_test
    ));

    out.push('\n');
    out.push_str("Model Selection:\n");
    out.push_str("════════════════\n");
    out.push_str(&format!("Best alpha: {:.4}\n", report.best_alpha));
    out.push_str(&format!(
        "Cross-validated accuracy ({} folds): {}\n",
        report.n_folds,
        format_percent(report.cv_accuracy)
    ));
    if show_grid {
        out.push('\n');
        out.push_str(&format!("{:>12}  {:>8}  {:>8}\n", "alpha", "mean", "std"));
        for score in &report.grid {
            out.push_str(&format!(
                "{:>12.4}  {:>8.4}  {:>8.4}\n",
                score.alpha, score.mean, score.std
            ));
        }
    }

    out.push('\n');
    out.push_str("Test Set:\n");
    out.push_str("═════════\n");
    out.push_str(&format!(
        "Accuracy: {}\n",
        format_percent(report.test_accuracy)
    ));
    let confusion = &report.confusion;
    out.push_str(&format!(
        "Precision: {:.3}  Recall: {:.3}  F1: {:.3}\n",
        confusion.precision(),
        confusion.recall(),
        confusion.f1()
    ));
    out.push_str(&format!(
        "TP: {}  FP: {}  TN: {}  FN: {}\n",
        confusion.true_positives,
        confusion.false_positives,
        confusion.true_negatives,
        confusion.false_negatives
    ));

    if !report.top_terms.is_empty() {
        out.push('\n');
        out.push_str("Top Insult Terms:\n");
        out.push_str("─────────────────\n");
        for (i, term) in report.top_terms.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {} ({:.3})\n",
                i + 1,
                term.term,
                term.log_odds
            ));
        }
    }

    if !report.predictions.is_empty() {
        out.push('\n');
        out.push_str(&render_predictions(&report.predictions));
    }

    out
}

/// Render predictions for a terminal.
pub fn render_predictions(predictions: &[Prediction]) -> String {
    let mut out = String::new();
    out.push_str("Predictions:\n");
    out.push_str("────────────\n");
    for prediction in predictions {
        out.push_str(&format!(
            "[{}] {:>6} {}\n",
            prediction.label,
            format_percent(prediction.insult_probability),
            prediction.text
        ));
    }
    out
}

/// Format a fraction as a percentage.
fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
