//! Tracks held by a document

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::label::LabelTrack;

/// Kind tag of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Audio,
    Label,
}

/// Mono audio at its own sample rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Samples in the range [-1.0, 1.0]
    pub samples: Vec<f32>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Track payload, tagged by kind in the document file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackContent {
    Audio(AudioTrack),
    Label(LabelTrack),
}

/// A named track with a stable identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(flatten)]
    pub content: TrackContent,
}

impl Track {
    pub fn audio(name: impl Into<String>, audio: AudioTrack) -> Self {
        Self::with_content(name, TrackContent::Audio(audio))
    }

    pub fn label(name: impl Into<String>, labels: LabelTrack) -> Self {
        Self::with_content(name, TrackContent::Label(labels))
    }

    fn with_content(name: impl Into<String>, content: TrackContent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            content,
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self.content {
            TrackContent::Audio(_) => TrackKind::Audio,
            TrackContent::Label(_) => TrackKind::Label,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioTrack> {
        match &self.content {
            TrackContent::Audio(audio) => Some(audio),
            TrackContent::Label(_) => None,
        }
    }

    pub fn as_labels(&self) -> Option<&LabelTrack> {
        match &self.content {
            TrackContent::Label(labels) => Some(labels),
            TrackContent::Audio(_) => None,
        }
    }
}
