//! CLI Module
//!
//! Command-line interface for running import/export commands against a
//! document file.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nueva Automation - scriptable import and export
#[derive(Parser, Debug)]
#[command(name = "nueva-automation")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty document file
    #[command(name = "new-document")]
    NewDocument {
        /// Path for the new document
        path: PathBuf,

        /// Document name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Project sample rate in Hz
        #[arg(long, default_value_t = crate::document::DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Set the selected time region
    #[command(name = "select")]
    Select {
        /// Path to the document
        #[arg(short, long)]
        document: PathBuf,

        /// Region start in seconds
        t0: f64,

        /// Region end in seconds
        t1: f64,
    },

    /// Import a WAV or label file into the document
    #[command(name = "import")]
    Import {
        /// Path to the document
        #[arg(short, long)]
        document: PathBuf,

        /// File to import
        #[arg(short, long)]
        filename: String,
    },

    /// Export the document; the extension picks the format
    #[command(name = "export")]
    Export {
        /// Path to the document
        #[arg(short, long)]
        document: PathBuf,

        /// Target file (.txt exports labels)
        #[arg(short, long, default_value = crate::commands::export::DEFAULT_EXPORT_FILENAME)]
        filename: String,

        /// Number of output channels (0 = one per track)
        #[arg(
            short = 'n',
            long,
            default_value_t = crate::commands::export::DEFAULT_CHANNELS,
            allow_negative_numbers = true
        )]
        channels: i64,
    },

    /// Run script lines such as 'Export: Filename=labels.txt'
    #[command(name = "run")]
    Run {
        /// Path to the document
        #[arg(short, long)]
        document: PathBuf,

        /// Script lines, run in order
        #[arg(required = true)]
        lines: Vec<String>,
    },
}
