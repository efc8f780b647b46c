//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filo")]
#[command(
    version,
    about = "filo - a file organizer that learns your habits",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Directory to organize
    pub dir: Option<PathBuf>,

    /// Target directory (default: <dir>/Organized)
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Model to use for this run
    #[arg(short, long)]
    pub model: Option<String>,

    /// Preview without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Review low-confidence results interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Scan subdirectories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Disable learning for this run
    #[arg(long)]
    pub no_learning: bool,

    /// Skip the execution confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and show file statistics
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Scan subdirectories recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// Show learning statistics
    Stats,

    /// Undo a previous organization run
    Undo {
        /// Batch to undo (default: the most recent one)
        batch: Option<String>,

        /// List undoable batches
        #[arg(short, long)]
        list: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List installed models and performance statistics
    Models {
        /// Show accumulated performance statistics
        #[arg(long)]
        stats: bool,
    },

    /// Show or update configuration
    Config {
        /// Update a field, e.g. --set llm_model=qwen3:8b
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Clear learned state
    Reset {
        /// What to clear
        #[arg(value_enum)]
        target: ResetTarget,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check the Ollama service and suggest models
    Setup,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResetTarget {
    History,
    Rules,
    Vectors,
    All,
}
