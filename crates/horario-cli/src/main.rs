// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anyhow::{bail, Context, Result};
use clap::Parser;
use horario_model::loading::{CatalogLoader, InvalidRowPolicy};
use horario_solver::{
    config::{ScheduleConfig, DEFAULT_CONFIG_FILENAME},
    solver::ScheduleSolverBuilder,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};
use tracing::{debug, info};

/// Build every conflict-free weekly schedule for a set of subjects
#[derive(Debug, Parser)]
#[command(name = "horario", version)]
#[command(about = "Build every conflict-free weekly class schedule", long_about = None)]
struct Cli {
    /// Class offerings catalog (.csv)
    data: PathBuf,

    /// Filter configuration; created from a template when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILENAME)]
    config: PathBuf,

    /// Stop after this many schedules
    #[arg(long)]
    limit: Option<u64>,

    /// Stop searching after this many seconds
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Worker threads (defaults to the available cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Skip malformed catalog rows instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Print only the number of schedules
    #[arg(long)]
    count_only: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn run(cli: Cli) -> Result<ExitCode> {
    if !is_csv_path(&cli.data) {
        bail!("catalog file must be a .csv file: {}", cli.data.display());
    }

    let config = match ScheduleConfig::from_path(&cli.config) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => {
            ScheduleConfig::write_template(&cli.config)?;
            println!(
                "No configuration found. Created {}, edit it and run again.",
                cli.config.display()
            );
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    let loader = if cli.skip_invalid {
        CatalogLoader::new().on_invalid_row(InvalidRowPolicy::Skip)
    } else {
        CatalogLoader::new()
    };
    let mut builder = ScheduleSolverBuilder::new()
        .with_loader(loader)
        .with_progress_log(Duration::from_secs(5));
    if let Some(limit) = cli.limit {
        builder = builder.with_solution_limit(limit);
    }
    if let Some(secs) = cli.time_limit {
        builder = builder.with_time_limit(Duration::from_secs(secs));
    }
    if let Some(threads) = cli.threads {
        builder = builder.with_threads(threads);
    }
    let solver = builder.build();
    debug!(%solver, "solver configured");

    let catalog = solver
        .load_catalog(&cli.data)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    info!(offerings = catalog.len(), "catalog loaded");

    let outcome = solver.solve(&catalog, &config)?;
    debug!("{}", outcome.statistics());

    if !cli.count_only {
        for table in outcome.tables(&catalog) {
            println!("{table}");
            println!();
        }
    }

    let suffix = if outcome.is_complete() {
        String::new()
    } else {
        format!(" ({})", outcome.termination_reason())
    };
    println!("{} schedule(s) found{}", outcome.len(), suffix);

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(verbose = cli.verbose, "horario started");

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
