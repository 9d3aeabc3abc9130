//! Automation configuration
//!
//! Optional JSON file controlling how exports are written. Every field has a
//! default, so an empty object (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AutomationError, Result};

/// Suffix appended to a file name when an existing file is moved aside.
#[cfg(target_os = "linux")]
pub const DEFAULT_BACKUP_SUFFIX: &str = "~";

/// Suffix appended to a file name when an existing file is moved aside.
#[cfg(not(target_os = "linux"))]
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Bit depth used by the WAV backend unless configured otherwise
pub const DEFAULT_WAV_BIT_DEPTH: u16 = 16;

/// Settings shared by all commands of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Suffix for the single-generation backup of an overwritten label file
    pub backup_suffix: String,
    /// WAV export bit depth: 16, 24 or 32 (float)
    pub wav_bit_depth: u16,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            wav_bit_depth: DEFAULT_WAV_BIT_DEPTH,
        }
    }
}

impl AutomationConfig {
    /// Load a configuration file and validate it.
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

        let config: AutomationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.backup_suffix.is_empty() {
            return Err(AutomationError::InvalidConfig {
                reason: "backup_suffix must not be empty".to_string(),
            });
        }

        if !matches!(self.wav_bit_depth, 16 | 24 | 32) {
            return Err(AutomationError::InvalidConfig {
                reason: format!(
                    "wav_bit_depth must be 16, 24 or 32 (got {})",
                    self.wav_bit_depth
                ),
            });
        }

        Ok(())
    }
}
