//! CLI Command Implementations
//!
//! Each handler returns whether every command it ran succeeded.

use std::path::Path;

use log::{debug, info};

use crate::commands::{
    run_script_line, Command, CommandContext, ExportCommand, ImportCommand, ReportSink, Services,
};
use crate::config::AutomationConfig;
use crate::document::{Document, SelectedRegion};
use crate::engine::{FileImporter, WavExportBackend};
use crate::error::Result;
use crate::export::OsFileSystem;

/// Prints status messages to stdout and errors to stderr
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn status(&mut self, message: &str) {
        info!("{}", message);
        println!("{}", message);
    }

    fn error(&mut self, message: &str) {
        debug!("Command failed: {}", message);
        eprintln!("Error: {}", message);
    }
}

/// Load the document, run `f` with a fully wired context, and save the
/// document back if `save` is set.
fn with_context<F>(
    document_path: &Path,
    config: &AutomationConfig,
    save: bool,
    f: F,
) -> Result<bool>
where
    F: FnOnce(&mut CommandContext<'_>) -> bool,
{
    let mut document = Document::load(document_path)?;
    let importer = FileImporter;
    let backend = WavExportBackend::new(config.wav_bit_depth);
    let fs = OsFileSystem;
    let services = Services::new(&importer, &backend, &fs, config);
    let mut sink = ConsoleSink;

    let ok = {
        let mut context = CommandContext::new(&mut document, services, &mut sink);
        f(&mut context)
    };

    if save {
        document.save(document_path)?;
        debug!("Saved {}", document_path.display());
    }

    Ok(ok)
}

/// Create an empty document file.
pub fn new_document(path: &Path, name: Option<&str>, sample_rate: u32) -> Result<bool> {
    info!("Creating document at: {}", path.display());

    let name = name.map(str::to_string).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let mut document = Document::new(name);
    document.sample_rate = sample_rate;
    document.save(path)?;

    println!("Document created: {}", path.display());
    Ok(true)
}

/// Set the selected region of a document.
pub fn select(document_path: &Path, t0: f64, t1: f64) -> Result<bool> {
    let region = SelectedRegion::checked(t0, t1)?;
    let mut document = Document::load(document_path)?;
    document.set_selection(region);
    document.save(document_path)?;

    let region = document.selection();
    println!("Selected {:.3}s..{:.3}s", region.t0, region.t1);
    Ok(true)
}

/// Import a file into the document and save it.
pub fn import(document_path: &Path, filename: &str, config: &AutomationConfig) -> Result<bool> {
    info!("Importing {} into {}", filename, document_path.display());

    let command = ImportCommand::new(filename);
    with_context(document_path, config, true, |context| command.apply(context))
}

/// Export the document.
pub fn export(
    document_path: &Path,
    filename: &str,
    channels: i64,
    config: &AutomationConfig,
) -> Result<bool> {
    info!("Exporting {} to {}", document_path.display(), filename);

    let command = ExportCommand::new(filename, channels);
    with_context(document_path, config, false, |context| command.apply(context))
}

/// Run script lines in order, continuing past failures.
pub fn run(document_path: &Path, lines: &[String], config: &AutomationConfig) -> Result<bool> {
    info!("Running {} script line(s) on {}", lines.len(), document_path.display());

    with_context(document_path, config, true, |context| {
        lines
            .iter()
            .map(|line| run_script_line(line, context))
            .fold(true, |all_ok, ok| all_ok && ok)
    })
}
