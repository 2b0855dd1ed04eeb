//! # CLI Behavior
//!
//! The CLI is the only place that knows about terminal I/O, exit codes, and
//! output formatting.
//!
//! ## Context
//!
//! The storage root is resolved in this order:
//! 1. `--root <path>`
//! 2. `FILEMAP_BASE_DIR` or `base_dir` in the file given by `--config`
//! 3. The platform data directory
//!
//! Values are arbitrary JSON. `set` parses its argument as JSON unless `--raw`
//! is given, in which case it is stored as a JSON string.
//!
//! ## Module Structure
//!
//! - `commands`: per-command handlers that call the library and format output
//! - `render`: output formatting
//! - `setup`: argument parsing via clap, logging setup

mod commands;
mod render;
pub mod setup;

use anyhow::{Context, Result};
use clap::Parser;
use filemap::{MapConfig, StorageRoot};
use setup::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    setup::init_logging(cli.verbose);

    let mut config = MapConfig::load_layered(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(root) = &cli.root {
        config.base_dir = Some(root.clone());
    }
    if cli.pretty {
        config.pretty = true;
    }

    let root = StorageRoot::from_config(&config)?;
    tracing::debug!(root = %root.path().display(), map = %cli.map, "resolved storage root");
    let ctx = commands::AppContext {
        root,
        map_name: cli.map,
        codec: config.codec(),
    };
    commands::dispatch(&ctx, cli.command)
}
