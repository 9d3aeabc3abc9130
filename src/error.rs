//! Error handling for Nueva automation commands
//!
//! Every failure a command can hit maps to one of four kinds (validation,
//! missing data, I/O, backend). None of them is fatal to the process: the
//! command layer turns them into a single error message for the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for automation operations
pub type Result<T> = std::result::Result<T, AutomationError>;

/// Broad classification of a failure, independent of the concrete variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request; nothing was touched
    Validation,
    /// The document holds nothing of the requested kind
    NoData,
    /// A file could not be opened, created or written
    Io,
    /// The export/import backend rejected the request
    Backend,
}

/// Main error type for automation commands
#[derive(Error, Debug)]
pub enum AutomationError {
    // Validation Errors
    #[error("Export filename must have an extension!")]
    MissingExtension { path: String },

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown parameter '{name}' for command '{command}'")]
    UnknownParameter { command: String, name: String },

    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("Malformed command line: {reason}")]
    MalformedCommand { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Data Errors
    #[error("Document has no label tracks to export")]
    NoLabelData,

    #[error("Document has no audio tracks to export")]
    NoAudioTracks,

    #[error("Nothing to export: time range {t0:.3}s..{t1:.3}s is empty")]
    EmptySelection { t0: f64, t1: f64 },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Could not move {path} aside to {backup}: {source}")]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open {path} for writing: {source}")]
    FileOpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Format Errors
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid label file, line {line}: {reason}")]
    InvalidLabels { line: usize, reason: String },

    #[error("Could not export to {format} format!")]
    ExportFailed { format: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutomationError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AutomationError::MissingExtension { .. } => "MISSING_EXTENSION",
            AutomationError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AutomationError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            AutomationError::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            AutomationError::MalformedCommand { .. } => "MALFORMED_COMMAND",
            AutomationError::InvalidConfig { .. } => "INVALID_CONFIG",
            AutomationError::NoLabelData => "NO_LABEL_DATA",
            AutomationError::NoAudioTracks => "NO_AUDIO_TRACKS",
            AutomationError::EmptySelection { .. } => "EMPTY_SELECTION",
            AutomationError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AutomationError::BackupFailed { .. } => "BACKUP_FAILED",
            AutomationError::FileOpenError { .. } => "FILE_OPEN_ERROR",
            AutomationError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            AutomationError::FileReadError { .. } => "FILE_READ_ERROR",
            AutomationError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AutomationError::InvalidAudio { .. } => "INVALID_AUDIO",
            AutomationError::InvalidLabels { .. } => "INVALID_LABELS",
            AutomationError::ExportFailed { .. } => "EXPORT_FAILED",
            AutomationError::Serialization(_) => "SERIALIZATION_ERROR",
            AutomationError::Io(_) => "IO_ERROR",
        }
    }

    /// Classify this error into one of the four failure kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            AutomationError::MissingExtension { .. }
            | AutomationError::InvalidParameter { .. }
            | AutomationError::UnknownParameter { .. }
            | AutomationError::UnknownCommand { .. }
            | AutomationError::MalformedCommand { .. }
            | AutomationError::InvalidConfig { .. } => ErrorKind::Validation,
            AutomationError::NoLabelData
            | AutomationError::NoAudioTracks
            | AutomationError::EmptySelection { .. } => ErrorKind::NoData,
            AutomationError::FileNotFound { .. }
            | AutomationError::BackupFailed { .. }
            | AutomationError::FileOpenError { .. }
            | AutomationError::FileWriteError { .. }
            | AutomationError::FileReadError { .. }
            | AutomationError::Serialization(_)
            | AutomationError::Io(_) => ErrorKind::Io,
            AutomationError::UnsupportedFormat { .. }
            | AutomationError::InvalidAudio { .. }
            | AutomationError::InvalidLabels { .. }
            | AutomationError::ExportFailed { .. } => ErrorKind::Backend,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AutomationError::MissingExtension { .. } => vec![
                "Add a file extension such as .wav or .txt",
                "Use .txt to export labels",
            ],
            AutomationError::NoLabelData => vec![
                "Import or create a label track before exporting labels",
                "Use an audio extension such as .wav to export audio instead",
            ],
            AutomationError::NoAudioTracks => vec!["Import audio before exporting it"],
            AutomationError::EmptySelection { .. } => {
                vec!["Select a time range before exporting"]
            }
            AutomationError::BackupFailed { .. } | AutomationError::FileOpenError { .. } => vec![
                "Check that the target directory exists and is writable",
                "Close other applications that may hold the file open",
            ],
            AutomationError::UnsupportedFormat { .. } => vec![
                "Supported export formats: WAV, TXT (labels)",
                "Supported import formats: WAV, TXT (labels)",
            ],
            _ => vec![],
        }
    }
}
