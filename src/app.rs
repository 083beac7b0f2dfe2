//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - runs selection + classification
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Command, PlotArgs, RunArgs, SelectArgs};
use crate::domain::{ChosenIdeal, MatchConfig, MissingSamplePolicy};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ideal` binary.
pub fn run() -> Result<(), AppError> {
    // Environment values feed clap's `env = ...` fallbacks.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Select(args) => handle_select(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = match_config_from_run_args(&args);
    pipeline::validate_config(&config)?;
    let run = pipeline::run_match(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_selections(&run.chosen));
    println!("{}", crate::report::format_classifications(&run.classifications));
    let tally = crate::report::tally_classifications(&run.chosen, &run.classifications);
    println!("{}", crate::report::format_tally(&tally));

    if config.plot {
        print_selection_plots(&run.chosen, config.plot_width, config.plot_height);
        for c in unique_ideals(&run.chosen) {
            println!(
                "{}",
                crate::plot::render_classification_plot(
                    c.ideal(),
                    c.tolerance,
                    &run.classifications,
                    config.plot_width,
                    config.plot_height,
                )
            );
        }
    }

    // Optional exports.
    if let Some(dir) = &config.export_dir {
        pipeline::ensure_export_dir(dir)?;
        crate::io::export::write_curve_table_csv(&dir.join("training.csv"), &run.training.set, " (training function)")?;
        crate::io::export::write_curve_table_csv(&dir.join("ideal.csv"), &run.ideal.set, " (ideal function)")?;
        crate::io::export::write_mapping_csv(&dir.join("mapping.csv"), &run.classifications)?;
        tracing::info!(dir = %dir.display(), "wrote CSV tables");
    }
    if let Some(path) = &config.export_summary {
        let summary = crate::io::summary::build_run_summary(
            &run.chosen,
            &run.classifications,
            config.tolerance_factor,
            config.on_missing,
        );
        crate::io::summary::write_run_summary_json(path, &summary)?;
        tracing::info!(path = %path.display(), "wrote run summary");
    }

    Ok(())
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = match_config_from_select_args(&args);
    pipeline::validate_config(&config)?;
    let run = pipeline::run_match(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_selections(&run.chosen));

    if config.plot {
        print_selection_plots(&run.chosen, config.plot_width, config.plot_height);
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_run_summary_json(&args.summary)?;

    let chosen = crate::io::summary::chosen_from_summary(&summary);

    print_selection_plots(&chosen, args.width, args.height);
    for c in unique_ideals(&chosen) {
        println!(
            "{}",
            crate::plot::render_classification_plot(
                c.ideal(),
                c.tolerance,
                &summary.classifications,
                args.width,
                args.height,
            )
        );
    }
    Ok(())
}

/// Selection plots, ordered by training curve name.
fn print_selection_plots(chosen: &[ChosenIdeal], width: usize, height: usize) {
    let mut sorted: Vec<&ChosenIdeal> = chosen.iter().collect();
    sorted.sort_by(|a, b| a.training().name().cmp(b.training().name()));
    for c in sorted {
        println!("{}", crate::plot::render_selection_plot(c, width, height));
    }
}

/// First occurrence of each distinct ideal.
fn unique_ideals(chosen: &[ChosenIdeal]) -> Vec<&ChosenIdeal> {
    let mut out: Vec<&ChosenIdeal> = Vec::new();
    for c in chosen {
        if !out.iter().any(|o| o.ideal().name() == c.ideal().name()) {
            out.push(c);
        }
    }
    out
}

pub fn match_config_from_run_args(args: &RunArgs) -> MatchConfig {
    MatchConfig {
        ideal_path: args.data.ideal.clone(),
        train_path: args.data.train.clone(),
        test_path: Some(args.test.clone()),
        tolerance_factor: args.data.tolerance_factor,
        on_missing: args.on_missing,
        plot: !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_dir: args.export_dir.clone(),
        export_summary: args.export_summary.clone(),
    }
}

pub fn match_config_from_select_args(args: &SelectArgs) -> MatchConfig {
    MatchConfig {
        ideal_path: args.data.ideal.clone(),
        train_path: args.data.train.clone(),
        test_path: None,
        tolerance_factor: args.data.tolerance_factor,
        on_missing: MissingSamplePolicy::default(),
        plot: !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_dir: None,
        export_summary: None,
    }
}
