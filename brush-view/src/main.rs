//! Application entry point for the track brush.
//!
//! This binary parses the command line, loads the growth configuration,
//! sets up eframe/egui and delegates all interactive logic and rendering
//! to [`Viewer`] from the `viewer` module.

mod viewer;

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use brush_core::Config;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Growth configuration file (TOML). Defaults are used for missing keys.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the growth random source; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration cannot be loaded or eframe fails to create
///   the native window or event loop.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, max_levels = cfg.max_levels, "starting track brush");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Track Brush",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, seed)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

/// Loads the configuration from `path`, or the defaults when no path is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("failed to load config {}", path.display()))
}

fn parse_config(text: &str) -> anyhow::Result<Config> {
    let cfg: Config = toml::from_str(text)?;
    cfg.validate()?;
    Ok(cfg)
}
