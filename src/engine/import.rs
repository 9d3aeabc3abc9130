//! Import collaborator
//!
//! Turns a file on disk into new tracks appended to a document. On failure
//! the document is left exactly as it was.

use std::fs;
use std::path::Path;

use log::info;

use crate::document::{AudioTrack, Document, LabelTrack, Track};
use crate::engine::io::read_wav;
use crate::error::{AutomationError, Result};

/// Something that can append the contents of a file to a document
pub trait Importer {
    fn import(&self, document: &mut Document, path: &Path) -> Result<()>;
}

/// Imports WAV audio and `.txt` label files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImporter;

impl FileImporter {
    fn load_tracks(path: &Path) -> Result<Vec<Track>> {
        if !path.is_file() {
            return Err(AutomationError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Imported".to_string());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => {
                let text = fs::read_to_string(path).map_err(|e| AutomationError::FileReadError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                let labels = LabelTrack::parse(&text)?;
                Ok(vec![Track::label(stem, labels)])
            }
            "wav" => {
                let data = read_wav(path)?;
                let count = data.channels.len();
                let tracks = data
                    .channels
                    .into_iter()
                    .enumerate()
                    .map(|(i, samples)| {
                        let name = if count == 1 {
                            stem.clone()
                        } else {
                            format!("{} {}", stem, i + 1)
                        };
                        Track::audio(name, AudioTrack::new(data.sample_rate, samples))
                    })
                    .collect();
                Ok(tracks)
            }
            other => Err(AutomationError::UnsupportedFormat {
                format: if other.is_empty() {
                    "file without extension".to_string()
                } else {
                    other.to_uppercase()
                },
            }),
        }
    }
}

impl Importer for FileImporter {
    fn import(&self, document: &mut Document, path: &Path) -> Result<()> {
        // Decode everything before touching the document.
        let tracks = Self::load_tracks(path)?;
        let count = tracks.len();

        for track in tracks {
            document.append_track(track);
        }

        info!("Imported {} track(s) from {}", count, path.display());
        Ok(())
    }
}
