//! Export dispatch
//!
//! Chooses an exporter from the target file's extension: `.txt` goes to the
//! label exporter, anything else to the generic media backend, which may
//! itself reject formats it does not know.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::document::Document;
use crate::engine::backend::{ExportBackend, MediaExportRequest};
use crate::error::{AutomationError, Result};
use crate::export::fs::FileSystem;
use crate::export::labels::LabelExporter;

/// Extension (uppercased) that selects label export
pub const LABEL_FORMAT: &str = "TXT";

/// Which exporter handles a target path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Plain-text labels
    Labels,
    /// Anything else, handed to the media backend under this format token
    Media { format: String },
}

impl ExportTarget {
    /// Uppercase format token used in messages.
    pub fn format(&self) -> &str {
        match self {
            ExportTarget::Labels => LABEL_FORMAT,
            ExportTarget::Media { format } => format,
        }
    }
}

/// Classify a target path by the text after its last `.`.
///
/// The whole path is searched, so a dot in a directory name counts.
pub fn classify(path: &str) -> Result<ExportTarget> {
    let extension = match path.rfind('.') {
        Some(index) if index + 1 < path.len() => path[index + 1..].to_uppercase(),
        _ => {
            return Err(AutomationError::MissingExtension {
                path: path.to_string(),
            })
        }
    };

    if extension == LABEL_FORMAT {
        Ok(ExportTarget::Labels)
    } else {
        Ok(ExportTarget::Media { format: extension })
    }
}

/// A single export invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    target_path: String,
    channel_count: u32,
    time_range_start: f64,
    time_range_end: f64,
}

impl ExportRequest {
    /// Build a request; a negative channel count is clamped to 0 (unspecified).
    pub fn new(target_path: impl Into<String>, channel_count: i64, t0: f64, t1: f64) -> Self {
        Self {
            target_path: target_path.into(),
            channel_count: channel_count.clamp(0, u32::MAX as i64) as u32,
            time_range_start: t0,
            time_range_end: t1,
        }
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    pub fn time_range(&self) -> (f64, f64) {
        (self.time_range_start, self.time_range_end)
    }
}

/// Outcome of one export, ready to be reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub success: bool,
    pub message: String,
}

/// Routes export requests to the label exporter or the media backend
pub struct ExportDispatcher<'a> {
    fs: &'a dyn FileSystem,
    backend: &'a dyn ExportBackend,
    backup_suffix: &'a str,
}

impl<'a> ExportDispatcher<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        backend: &'a dyn ExportBackend,
        backup_suffix: &'a str,
    ) -> Self {
        Self {
            fs,
            backend,
            backup_suffix,
        }
    }

    /// Run one export and return the success message.
    ///
    /// Errors other than a missing extension are reported as
    /// `ExportFailed` for the classified format; the cause is logged.
    pub fn dispatch(&self, document: &Document, request: &ExportRequest) -> Result<String> {
        let target = classify(request.target_path())?;
        let path = PathBuf::from(request.target_path());
        debug!("Dispatching export of {} as {:?}", path.display(), target);

        let outcome = match &target {
            ExportTarget::Labels => {
                LabelExporter::new(self.fs, self.backup_suffix).export(document, &path)
            }
            ExportTarget::Media { format } => {
                let (t0, t1) = request.time_range();
                let media = MediaExportRequest {
                    channels: request.channel_count(),
                    format: format.clone(),
                    path: path.clone(),
                    selected_only: true,
                    t0,
                    t1,
                };
                self.backend.process(document, &media)
            }
        };

        match outcome {
            Ok(()) => Ok(format!(
                "Exported to {} format: {}",
                target.format(),
                request.target_path()
            )),
            Err(e) => {
                warn!("Export to {} failed: {} [{}]", path.display(), e, e.error_code());
                for suggestion in e.recovery_suggestions() {
                    info!("  {}", suggestion);
                }
                Err(AutomationError::ExportFailed {
                    format: target.format().to_string(),
                })
            }
        }
    }

    /// Like [`ExportDispatcher::dispatch`], flattened into an [`ExportResult`].
    pub fn run(&self, document: &Document, request: &ExportRequest) -> ExportResult {
        match self.dispatch(document, request) {
            Ok(message) => ExportResult {
                success: true,
                message,
            },
            Err(e) => ExportResult {
                success: false,
                message: e.to_string(),
            },
        }
    }
}
