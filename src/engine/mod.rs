//! Media Engine Module
//!
//! Concrete collaborators behind the import/export commands:
//! - WAV file I/O
//! - Generic media export backend
//! - File import

pub mod backend;
pub mod import;
pub mod io;

pub use backend::{ExportBackend, MediaExportRequest, WavExportBackend};
pub use import::{FileImporter, Importer};
pub use io::{read_wav, write_wav, WavData};
