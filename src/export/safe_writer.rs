//! Backup-then-write file protocol
//!
//! Opening a [`SafeFileWriter`] on a path that already holds a file first
//! moves that file aside to `<path><suffix>`, replacing any older backup,
//! then creates a fresh empty file at the path. The backup slot therefore
//! holds exactly one generation: the content the path had before this open.
//!
//! The rename and the create are separate steps. A crash between them
//! leaves the path absent and the previous content in the backup.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{AutomationError, Result};
use crate::export::fs::{FileSystem, OutputFile};

/// Backup location for `path`: the path with `suffix` appended.
pub fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Text sink that preserves whatever was previously at its path
pub struct SafeFileWriter {
    path: PathBuf,
    backup: Option<PathBuf>,
    file: Box<dyn OutputFile>,
}

impl SafeFileWriter {
    /// Move any existing file at `path` aside and open a new one.
    ///
    /// If the backup steps fail, nothing is created and the existing file is
    /// left where it was. If only the create fails, the backup stays in
    /// place.
    pub fn open(fs: &dyn FileSystem, path: &Path, backup_suffix: &str) -> Result<Self> {
        let mut backup = None;

        if fs.exists(path) {
            let backup_path = backup_path_for(path, backup_suffix);
            let backup_err = |source: io::Error| AutomationError::BackupFailed {
                path: path.to_path_buf(),
                backup: backup_path.clone(),
                source,
            };

            if fs.exists(&backup_path) {
                debug!("Removing stale backup {}", backup_path.display());
                fs.remove_file(&backup_path).map_err(backup_err)?;
            }

            debug!("Moving {} to {}", path.display(), backup_path.display());
            fs.rename(path, &backup_path).map_err(backup_err)?;
            backup = Some(backup_path);
        }

        let file = fs.create(path).map_err(|e| AutomationError::FileOpenError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            backup,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the previous content went, if there was any.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// Flush and close the file. The write only counts once this succeeds.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        self.file
            .close()
            .map_err(|e| AutomationError::FileWriteError { path, source: e })
    }
}

impl Write for SafeFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
