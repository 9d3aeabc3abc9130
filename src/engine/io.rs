//! WAV file I/O
//!
//! Reads WAV files into per-channel `f32` buffers and writes interleaved
//! buffers back out at 16-bit, 24-bit or 32-bit float.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{AutomationError, Result};

/// Decoded WAV contents
#[derive(Debug, Clone)]
pub struct WavData {
    pub sample_rate: u32,
    /// One buffer per channel
    pub channels: Vec<Vec<f32>>,
}

/// Read a WAV file and split it into channels.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the bit depth cannot be decoded
pub fn read_wav(path: &Path) -> Result<WavData> {
    if !path.exists() {
        return Err(AutomationError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| AutomationError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AutomationError::InvalidAudio {
            reason: "WAV file declares zero channels".to_string(),
            source: None,
        });
    }

    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    Ok(WavData {
        sample_rate: spec.sample_rate,
        channels: deinterleave(&samples, channels),
    })
}

/// Write per-channel buffers to a WAV file.
///
/// `bit_depth` 32 writes IEEE float; 16 and 24 write integer PCM.
pub fn write_wav(
    path: &Path,
    channels: &[Vec<f32>],
    sample_rate: u32,
    bit_depth: u16,
) -> Result<()> {
    if !matches!(bit_depth, 16 | 24 | 32) {
        return Err(AutomationError::UnsupportedFormat {
            format: format!("{}-bit audio (only 16, 24, 32 supported)", bit_depth),
        });
    }

    let channel_count = u16::try_from(channels.len())
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| AutomationError::UnsupportedFormat {
            format: format!("WAV with {} channels", channels.len()),
        })?;

    let spec = WavSpec {
        channels: channel_count,
        sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let write_err = |e: hound::Error| AutomationError::FileWriteError {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| AutomationError::FileOpenError {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;

    for sample in interleave(channels) {
        match bit_depth {
            16 => {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(write_err)?;
            }
            24 => {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled).map_err(write_err)?;
            }
            _ => writer.write_sample(sample).map_err(write_err)?,
        }
    }

    writer.finalize().map_err(write_err)?;

    Ok(())
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let invalid = |e: hound::Error| AutomationError::InvalidAudio {
        reason: format!("Failed to read {}-bit samples: {}", bits_per_sample, e),
        source: Some(Box::new(e)),
    };

    match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid),
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid),
        (SampleFormat::Int, bits) => Err(AutomationError::UnsupportedFormat {
            format: format!("{}-bit integer audio", bits),
        }),
    }
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for (i, sample) in samples.iter().enumerate() {
        result[i % channels].push(*sample);
    }

    result
}

/// Interleave channels from [[L,L,...], [R,R,...]] to [L,R,L,R,...]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        for channel in channels {
            result.push(channel.get(frame).copied().unwrap_or(0.0));
        }
    }

    result
}

/// Linear interpolation resampling
///
/// TODO: Replace with sinc interpolation for high-quality resampling
pub fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if samples.is_empty() || source_rate == target_rate || source_rate == 0 {
        return samples.to_vec();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}
