//! Generic media export backend
//!
//! The command layer hands every non-label export to an [`ExportBackend`].
//! [`WavExportBackend`] is the built-in implementation: it mixes the
//! document's audio tracks over the requested time range and writes WAV.

use std::path::PathBuf;

use log::{debug, info};

use crate::document::Document;
use crate::engine::io::{resample_linear, write_wav};
use crate::error::{AutomationError, Result};

/// Arguments the command layer derives for a media export
#[derive(Debug, Clone, PartialEq)]
pub struct MediaExportRequest {
    /// Output channel count; 0 lets the backend decide
    pub channels: u32,
    /// Uppercase format token, e.g. `WAV`
    pub format: String,
    pub path: PathBuf,
    /// Export only `t0..t1` rather than the whole document
    pub selected_only: bool,
    pub t0: f64,
    pub t1: f64,
}

/// Something that can render a document to a media file
pub trait ExportBackend {
    /// Render `document` as described by `request`. A single attempt.
    fn process(&self, document: &Document, request: &MediaExportRequest) -> Result<()>;
}

/// Largest channel count a WAV header can declare
pub const MAX_CHANNELS: usize = u16::MAX as usize;

/// Mixes audio tracks down to WAV using hound
#[derive(Debug, Clone)]
pub struct WavExportBackend {
    bit_depth: u16,
}

impl Default for WavExportBackend {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WAV_BIT_DEPTH)
    }
}

impl WavExportBackend {
    /// Format token this backend accepts
    pub const FORMAT: &'static str = "WAV";

    pub fn new(bit_depth: u16) -> Self {
        Self { bit_depth }
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    /// Mix the document's audio tracks into `channels` buffers covering
    /// `t0..t1` at the document sample rate.
    ///
    /// Track `i` lands in channel `i % channels`; a channel count of 0 gives
    /// every track its own channel.
    pub fn render(
        &self,
        document: &Document,
        channels: u32,
        t0: f64,
        t1: f64,
    ) -> Result<Vec<Vec<f32>>> {
        let track_count = document.audio_tracks().count();
        if track_count == 0 {
            return Err(AutomationError::NoAudioTracks);
        }

        let channel_count = if channels == 0 {
            track_count
        } else {
            channels as usize
        };
        if channel_count > MAX_CHANNELS {
            return Err(AutomationError::InvalidParameter {
                name: "NumChannels".to_string(),
                reason: format!(
                    "WAV holds at most {} channels, got {}",
                    MAX_CHANNELS, channel_count
                ),
            });
        }

        if !t0.is_finite() || !t1.is_finite() {
            return Err(AutomationError::EmptySelection { t0, t1 });
        }

        let rate = document.sample_rate;
        let start = (t0.max(0.0) * rate as f64).round();
        let end = (t1.max(0.0) * rate as f64).round();
        if end <= start {
            return Err(AutomationError::EmptySelection { t0, t1 });
        }

        // The data chunk size is a u32 in the WAV header
        let frames = end - start;
        let bytes = frames * channel_count as f64 * f64::from(self.bit_depth / 8);
        if bytes > u32::MAX as f64 {
            return Err(AutomationError::InvalidParameter {
                name: "selection".to_string(),
                reason: format!("{:.3}s..{:.3}s is too long for one WAV file", t0, t1),
            });
        }

        let start = start as usize;
        let mut mix = vec![vec![0.0f32; frames as usize]; channel_count];

        for (index, track) in document.audio_tracks().enumerate() {
            let samples = resample_linear(&track.samples, track.sample_rate, rate);
            let target = &mut mix[index % channel_count];

            for (out, sample) in target.iter_mut().zip(samples.iter().skip(start)) {
                *out += *sample;
            }
        }

        for sample in mix.iter_mut().flatten() {
            *sample = sample.clamp(-1.0, 1.0);
        }

        Ok(mix)
    }
}

impl ExportBackend for WavExportBackend {
    fn process(&self, document: &Document, request: &MediaExportRequest) -> Result<()> {
        if request.format != Self::FORMAT {
            return Err(AutomationError::UnsupportedFormat {
                format: request.format.clone(),
            });
        }

        let (t0, t1) = if request.selected_only {
            (request.t0, request.t1)
        } else {
            (0.0, document.duration_secs())
        };

        debug!(
            "Rendering {:.3}s..{:.3}s to {} channel(s) at {} Hz",
            t0, t1, request.channels, document.sample_rate
        );

        let mix = self.render(document, request.channels, t0, t1)?;
        write_wav(&request.path, &mix, document.sample_rate, self.bit_depth)?;

        info!(
            "Wrote {} channel(s), {} frames to {}",
            mix.len(),
            mix.first().map(Vec::len).unwrap_or(0),
            request.path.display()
        );

        Ok(())
    }
}
