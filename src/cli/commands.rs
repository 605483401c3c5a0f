//! Command implementations for the Affront CLI.

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::experiment::Experiment;

/// Execute a CLI command.
pub fn execute_command(args: AffrontArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_experiment(run_args.clone(), &args),
        Command::Predict(predict_args) => predict_texts(predict_args.clone(), &args),
    }
}

/// Run the full walkthrough and print its report.
fn run_experiment(args: RunArgs, cli_args: &AffrontArgs) -> Result<()> {
    let mut config = load_config(cli_args, &args.train)?;
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }

    let experiment = Experiment::new(config)?;
    let run = experiment.run(&args.train.data)?;

    output_report(&run.report, args.show_grid, cli_args)
}

/// Train, then classify the sentences given on the command line.
fn predict_texts(args: PredictArgs, cli_args: &AffrontArgs) -> Result<()> {
    let mut config = load_config(cli_args, &args.train)?;
    config.samples = args.texts;

    let experiment = Experiment::new(config)?;
    let run = experiment.run(&args.train.data)?;

    let results = PredictionResults {
        best_alpha: run.report.best_alpha,
        predictions: run.report.predictions,
    };
    output_predictions(&results, cli_args)
}
