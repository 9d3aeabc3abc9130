//! Label export
//!
//! Writes every label track of a document, in track order, into one text
//! file through [`SafeFileWriter`].

use std::path::Path;

use log::{debug, info, warn};

use crate::document::Document;
use crate::error::{AutomationError, Result};
use crate::export::fs::FileSystem;
use crate::export::safe_writer::SafeFileWriter;

/// Serializes label tracks to a text file
pub struct LabelExporter<'a> {
    fs: &'a dyn FileSystem,
    backup_suffix: &'a str,
}

impl<'a> LabelExporter<'a> {
    pub fn new(fs: &'a dyn FileSystem, backup_suffix: &'a str) -> Self {
        Self { fs, backup_suffix }
    }

    /// Export all label tracks of `document` to `path`.
    ///
    /// Fails with `NoLabelData` without touching the disk when the document
    /// has no label tracks. A failure while writing leaves the partially
    /// written file in place.
    pub fn export(&self, document: &Document, path: &Path) -> Result<()> {
        let label_tracks = document.label_tracks();
        let track_count = label_tracks.clone().count();
        if track_count == 0 {
            return Err(AutomationError::NoLabelData);
        }

        let mut writer = SafeFileWriter::open(self.fs, path, self.backup_suffix)?;
        if let Some(backup) = writer.backup_path() {
            info!("Previous {} kept as {}", path.display(), backup.display());
        }

        let mut label_count = 0;
        for track in label_tracks {
            if let Err(e) = track.serialize(&mut writer) {
                warn!("Label export to {} stopped mid-file", path.display());
                return Err(AutomationError::FileWriteError {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            label_count += track.len();
        }

        writer.finish()?;

        debug!(
            "Wrote {} label(s) from {} track(s) to {}",
            label_count,
            track_count,
            path.display()
        );
        Ok(())
    }
}
