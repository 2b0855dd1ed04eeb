use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filemap", bin_name = "filemap", version)]
#[command(about = "Inspect and edit directory-backed key/value maps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Name of the map directory under the storage root
    #[arg(short, long, global = true, default_value = "default", help_heading = "Options")]
    pub map: String,

    /// Storage root (overrides configuration)
    #[arg(long, global = true, help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Write indented JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List keys and values in key order
    #[command(alias = "ls")]
    List {
        /// Only print keys
        #[arg(long)]
        keys: bool,
    },

    /// Print the value stored under a key
    Get { key: String },

    /// Store a value under a key
    Set {
        key: String,
        /// JSON value (or plain text with --raw)
        value: String,
        /// Store the value as a JSON string instead of parsing it
        #[arg(long)]
        raw: bool,
    },

    /// Remove a key
    #[command(alias = "rm")]
    Remove { key: String },

    /// Remove every entry in the map
    Clear,

    /// List the files actually present in the map directory
    Files,

    /// Compare the in-memory view with the directory and report problems
    Doctor,

    /// Delete the map directory and everything in it
    Drop,
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "filemap=debug,filemap_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
