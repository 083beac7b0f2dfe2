//! Command-line parsing for the ideal function matcher.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! matching code. Every data/tuning option can also be supplied through the
//! environment (or a `.env` file), e.g. `IDEAL_TOLERANCE_FACTOR=1.4142`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{DEFAULT_TOLERANCE_FACTOR, MissingSamplePolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ideal", version, about = "Match training curves to ideal functions and classify test points")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select ideal functions, classify the test points, print/plot/export the results.
    Run(RunArgs),
    /// Select ideal functions and print their tolerances only.
    Select(SelectArgs),
    /// Plot a previously exported run summary JSON.
    Plot(PlotArgs),
}

/// Inputs shared by `run` and `select`.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Candidate (ideal) functions CSV: `x,y1,...,yN`.
    #[arg(long, value_name = "CSV", env = "IDEAL_DATA_IDEAL")]
    pub ideal: PathBuf,

    /// Training functions CSV: `x,y1,...,yM` on the same x-grid as the ideal file.
    #[arg(long, value_name = "CSV", env = "IDEAL_DATA_TRAIN")]
    pub train: PathBuf,

    /// Multiplier applied to the largest training deviation (commonly 1.41421356 = √2).
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_FACTOR, env = "IDEAL_TOLERANCE_FACTOR")]
    pub tolerance_factor: f64,
}

/// Plot options shared by every subcommand that renders.
#[derive(Debug, Args, Clone)]
pub struct PlotOpts {
    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}

/// Options for a full matching run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Test points CSV: `x,y`.
    #[arg(long, value_name = "CSV", env = "IDEAL_DATA_TEST")]
    pub test: PathBuf,

    /// What to do when an ideal function has no sample at a test point's x.
    #[arg(long, value_enum, default_value_t = MissingSamplePolicy::Skip, env = "IDEAL_ON_MISSING")]
    pub on_missing: MissingSamplePolicy,

    /// Write `training.csv`, `ideal.csv` and `mapping.csv` into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Write the run summary (selections + mapping) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotOpts,
}

/// Options for selection-only runs.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotOpts,
}

/// Options for plotting a saved run.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Summary JSON file produced by `ideal run --export-summary`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_paths_and_policy() {
        let cli = Cli::try_parse_from([
            "ideal",
            "-vv",
            "run",
            "--ideal",
            "ideal.csv",
            "--train",
            "train.csv",
            "--test",
            "test.csv",
            "--tolerance-factor",
            "1.5",
            "--on-missing",
            "abort",
            "--no-plot",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.data.ideal, PathBuf::from("ideal.csv"));
        assert_eq!(args.test, PathBuf::from("test.csv"));
        assert_eq!(args.data.tolerance_factor, 1.5);
        assert_eq!(args.on_missing, MissingSamplePolicy::Abort);
        assert!(args.plot.no_plot);
    }

    #[test]
    fn select_does_not_require_test_file() {
        let cli = Cli::try_parse_from(["ideal", "select", "--ideal", "i.csv", "--train", "t.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Select(_)));
    }
}
