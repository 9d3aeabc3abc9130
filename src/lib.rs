//! Nueva Automation - Scriptable Import/Export Commands
//!
//! Two commands, `Import` and `Export`, that scripts can run against a
//! document of audio and label tracks.
//!
//! # Architecture
//!
//! - `commands`: parameter declaration/binding, the command contract and
//!   the script-line runner
//! - `export`: extension-based dispatch, label export and the
//!   backup-then-write file protocol
//! - `engine`: concrete import collaborator and WAV export backend
//! - `document`: tracks, labels and the selected region

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;

pub use error::{AutomationError, ErrorKind, Result};
