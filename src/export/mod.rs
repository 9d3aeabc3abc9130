//! Export Module
//!
//! - Extension-based dispatch between label and media export
//! - Label text export
//! - Backup-then-write file protocol

pub mod dispatch;
pub mod fs;
pub mod labels;
pub mod safe_writer;

pub use dispatch::{
    classify, ExportDispatcher, ExportRequest, ExportResult, ExportTarget, LABEL_FORMAT,
};
pub use fs::{FileSystem, OsFileSystem, OutputFile};
pub use labels::LabelExporter;
pub use safe_writer::{backup_path_for, SafeFileWriter};
