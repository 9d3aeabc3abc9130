//! Filesystem seam used by the label writer
//!
//! Everything the safe-write protocol does to the disk goes through
//! [`FileSystem`], so tests can observe or fake each step.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A writable file that must be closed explicitly to learn whether the
/// data reached the disk.
pub trait OutputFile: Write {
    /// Flush buffered data and release the file.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Minimal filesystem operations needed by [`super::SafeFileWriter`]
pub trait FileSystem {
    /// Whether a regular file is at `path`. Directories do not count.
    fn exists(&self, path: &Path) -> bool;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Create an empty file for writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile>>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

impl OutputFile for BufWriter<File> {
    fn close(self: Box<Self>) -> io::Result<()> {
        let file = (*self).into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}
