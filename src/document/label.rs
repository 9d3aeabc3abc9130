//! Label tracks and their text format
//!
//! A label file holds one label per line: start time, end time and text,
//! separated by tabs. Times are written with six decimal places.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{AutomationError, Result};

/// A time-stamped text annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Start time in seconds
    pub t0: f64,
    /// End time in seconds (equal to `t0` for point labels)
    pub t1: f64,
    /// Annotation text
    pub text: String,
}

impl Label {
    pub fn new(t0: f64, t1: f64, text: impl Into<String>) -> Self {
        Self {
            t0,
            t1,
            text: text.into(),
        }
    }

    /// A label marking a single instant
    pub fn point(t: f64, text: impl Into<String>) -> Self {
        Self::new(t, t, text)
    }
}

/// Ordered sequence of labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelTrack {
    labels: Vec<Label>,
}

impl LabelTrack {
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn push(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Write every label, in order, to a text stream.
    ///
    /// Line breaks inside label text are written as spaces so that each
    /// label stays on one line.
    pub fn serialize(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for label in &self.labels {
            let text = label.text.replace(['\r', '\n'], " ");
            writeln!(out, "{:.6}\t{:.6}\t{}", label.t0, label.t1, text)?;
        }
        Ok(())
    }

    /// Parse the text written by [`LabelTrack::serialize`].
    ///
    /// Blank lines and spectral-selection lines (starting with `\`) are
    /// skipped. A line holding a single time yields a point label.
    pub fn parse(text: &str) -> Result<Self> {
        let mut labels = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() || line.starts_with('\\') {
                continue;
            }

            let mut fields = line.splitn(3, '\t');
            let t0 = parse_time(fields.next().unwrap_or_default(), line_no)?;
            let t1 = match fields.next() {
                Some(field) => parse_time(field, line_no)?,
                None => t0,
            };
            let text = fields.next().unwrap_or_default();

            if t1 < t0 {
                return Err(AutomationError::InvalidLabels {
                    line: line_no,
                    reason: format!("end time {} precedes start time {}", t1, t0),
                });
            }

            labels.push(Label::new(t0, t1, text));
        }

        Ok(Self { labels })
    }
}

fn parse_time(field: &str, line: usize) -> Result<f64> {
    let value: f64 = field
        .trim()
        .parse()
        .map_err(|_| AutomationError::InvalidLabels {
            line,
            reason: format!("'{}' is not a time in seconds", field.trim()),
        })?;

    if !value.is_finite() {
        return Err(AutomationError::InvalidLabels {
            line,
            reason: format!("'{}' is not a finite time", field.trim()),
        });
    }

    Ok(value)
}
