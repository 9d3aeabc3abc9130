//! Document model
//!
//! The document is what commands operate on: an ordered list of tracks and
//! the currently selected time region. Commands only read it, except for
//! import, which appends tracks.

pub mod label;
pub mod track;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AutomationError, Result};

pub use label::{Label, LabelTrack};
pub use track::{AudioTrack, Track, TrackContent, TrackKind};

/// Default project sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// The (t0, t1) time interval currently selected, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedRegion {
    pub t0: f64,
    pub t1: f64,
}

impl SelectedRegion {
    /// Create a region, swapping the bounds if given in reverse.
    pub fn new(t0: f64, t1: f64) -> Self {
        if t1 < t0 {
            Self { t0: t1, t1: t0 }
        } else {
            Self { t0, t1 }
        }
    }

    /// Like [`SelectedRegion::new`], but rejects bounds that cannot be
    /// saved in a document file.
    pub fn checked(t0: f64, t1: f64) -> Result<Self> {
        if !t0.is_finite() || !t1.is_finite() {
            return Err(AutomationError::InvalidParameter {
                name: "selection".to_string(),
                reason: format!("bounds must be finite seconds, got {}..{}", t0, t1),
            });
        }
        Ok(Self::new(t0, t1))
    }

    pub fn duration(&self) -> f64 {
        self.t1 - self.t0
    }
}

/// An editable document: tracks plus selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document name
    pub name: String,
    /// Project sample rate used for rendering
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Timestamp of the last track change
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    selection: SelectedRegion,
    #[serde(default)]
    tracks: Vec<Track>,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Document {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            modified_at: Utc::now(),
            selection: SelectedRegion::default(),
            tracks: Vec::new(),
        }
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AutomationError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| AutomationError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let document: Document = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Save the document as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| AutomationError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// All tracks in document order.
    ///
    /// The returned iterator is `Clone`, so a consumer can walk the tracks
    /// more than once without touching shared iteration state.
    pub fn tracks(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Label tracks in document order.
    pub fn label_tracks(&self) -> impl Iterator<Item = &LabelTrack> + Clone + '_ {
        self.tracks.iter().filter_map(Track::as_labels)
    }

    /// Audio tracks in document order.
    pub fn audio_tracks(&self) -> impl Iterator<Item = &AudioTrack> + Clone + '_ {
        self.tracks.iter().filter_map(Track::as_audio)
    }

    /// Number of tracks of the given kind.
    pub fn count_kind(&self, kind: TrackKind) -> usize {
        self.tracks.iter().filter(|t| t.kind() == kind).count()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Append a track at the end of the document.
    pub fn append_track(&mut self, track: Track) {
        self.tracks.push(track);
        self.modified_at = Utc::now();
    }

    pub fn selection(&self) -> SelectedRegion {
        self.selection
    }

    pub fn set_selection(&mut self, region: SelectedRegion) {
        self.selection = region;
    }

    /// Length of the longest audio track in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.audio_tracks()
            .map(AudioTrack::duration_secs)
            .fold(0.0, f64::max)
    }
}
