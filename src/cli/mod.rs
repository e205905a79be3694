pub mod def_file;
pub mod format;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rulestack",
    version,
    about = "Resolve layered lint-rule configurations into one effective rule set per file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective rule set for files or directories
    Resolve {
        /// Files or directories to resolve
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Layer to resolve against
        #[arg(short, long, default_value = "base")]
        layer: String,

        /// Layer definitions file (TOML or JSON); built-in presets when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory paths are normalized against before glob matching
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Show which layer or override supplied each effective rule for a file
    Explain {
        /// File to explain
        path: PathBuf,

        /// Layer to resolve against
        #[arg(short, long, default_value = "base")]
        layer: String,

        /// Layer definitions file (TOML or JSON); built-in presets when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory paths are normalized against before glob matching
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// List the known layers with their parents and override counts
    Layers {
        /// Layer definitions file (TOML or JSON); built-in presets when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}
