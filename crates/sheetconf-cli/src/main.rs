//! sheetconf CLI - generate config assets from workbooks

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sheetconf::prelude::*;
use sheetconf::watch::{watch_directory, WatchLoop};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetconf")]
#[command(
    author,
    version,
    about = "Generate client and server configuration files from spreadsheets"
)]
struct Cli {
    /// Configuration file (JSON)
    config: PathBuf,

    /// Keep running and regenerate whenever a workbook changes
    #[arg(short, long)]
    watch: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration '{}'", cli.config.display()))?;
    let generator = Generator::new(config);

    if cli.watch {
        watch(generator)
    } else {
        run_once(&generator)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_once(generator: &Generator) -> Result<()> {
    generator
        .run(&mut TracingReporter)
        .with_context(|| input_context(&generator.config().input))?;
    Ok(())
}

/// One full run, then regenerate on every workbook change until the watcher
/// goes away
fn watch(generator: Generator) -> Result<()> {
    let input = generator.config().input.clone();
    let mut reporter = TracingReporter;

    // Only a missing input directory is fatal here; sheet errors are
    // reported and fixed while watching
    if let Err(e @ Error::InvalidInputPath(_)) = generator.run(&mut reporter) {
        return Err(e).with_context(|| input_context(&input));
    }

    let (_watcher, events) = watch_directory(&input)
        .with_context(|| format!("Failed to watch '{}'", input.display()))?;

    let mut watch_loop = WatchLoop::new(move || -> sheetconf::Result<()> {
        generator.run(&mut reporter).map(|_| ())
    });
    let regenerations = watch_loop.run(events);

    info!(regenerations, "watcher stopped");
    Ok(())
}

fn input_context(input: &Path) -> String {
    format!("Generation from '{}' failed", input.display())
}
