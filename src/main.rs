//! Nueva Automation CLI
//!
//! Runs import/export commands against a document file.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use nueva_automation::cli::commands;
use nueva_automation::cli::{Cli, Commands};
use nueva_automation::config::AutomationConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Nueva Automation v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AutomationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AutomationConfig::default(),
    };

    let ok = match cli.command {
        Some(cmd) => handle_command(cmd, &config)?,
        None => {
            println!("Nueva Automation v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn handle_command(cmd: Commands, config: &AutomationConfig) -> anyhow::Result<bool> {
    let ok = match cmd {
        Commands::NewDocument {
            path,
            name,
            sample_rate,
        } => commands::new_document(&path, name.as_deref(), sample_rate)
            .with_context(|| format!("creating document {}", path.display()))?,
        Commands::Select { document, t0, t1 } => commands::select(&document, t0, t1)
            .with_context(|| format!("updating document {}", document.display()))?,
        Commands::Import { document, filename } => commands::import(&document, &filename, config)
            .with_context(|| format!("opening document {}", document.display()))?,
        Commands::Export {
            document,
            filename,
            channels,
        } => commands::export(&document, &filename, channels, config)
            .with_context(|| format!("opening document {}", document.display()))?,
        Commands::Run { document, lines } => commands::run(&document, &lines, config)
            .with_context(|| format!("opening document {}", document.display()))?,
    };
    Ok(ok)
}
