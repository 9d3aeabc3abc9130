//! Scriptable commands
//!
//! Each command declares its parameters, is built from a bound
//! [`ParameterSet`], and runs against an explicit [`CommandContext`]. The
//! context carries the document, the collaborators doing the real work and
//! the sink that receives the single status or error message of each run.

pub mod export;
pub mod import;
pub mod params;
pub mod script;

use log::{info, warn};

use crate::config::AutomationConfig;
use crate::document::Document;
use crate::engine::backend::ExportBackend;
use crate::engine::import::Importer;
use crate::error::Result;
use crate::export::fs::FileSystem;

pub use export::ExportCommand;
pub use import::{ImportCommand, ImportRequest};
pub use params::{ParamValue, ParameterSet};
pub use script::{parse_command_line, run_script_line, ScriptCommand};

/// Receives the outcome message of each command
pub trait ReportSink {
    fn status(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// One reported message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Status(String),
    Error(String),
}

/// Keeps every report in order
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub reports: Vec<Report>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter_map(|r| match r {
                Report::Status(m) => Some(m.as_str()),
                Report::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter_map(|r| match r {
                Report::Error(m) => Some(m.as_str()),
                Report::Status(_) => None,
            })
            .collect()
    }
}

impl ReportSink for CollectingSink {
    fn status(&mut self, message: &str) {
        self.reports.push(Report::Status(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.reports.push(Report::Error(message.to_string()));
    }
}

/// Collaborators commands delegate to
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub importer: &'a dyn Importer,
    pub backend: &'a dyn ExportBackend,
    pub fs: &'a dyn FileSystem,
    /// Suffix for the backup of an overwritten label file
    pub backup_suffix: &'a str,
}

impl<'a> Services<'a> {
    pub fn new(
        importer: &'a dyn Importer,
        backend: &'a dyn ExportBackend,
        fs: &'a dyn FileSystem,
        config: &'a AutomationConfig,
    ) -> Self {
        Self {
            importer,
            backend,
            fs,
            backup_suffix: &config.backup_suffix,
        }
    }
}

/// Everything a command may touch during one run
pub struct CommandContext<'a> {
    document: &'a mut Document,
    services: Services<'a>,
    sink: &'a mut dyn ReportSink,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        document: &'a mut Document,
        services: Services<'a>,
        sink: &'a mut dyn ReportSink,
    ) -> Self {
        Self {
            document,
            services,
            sink,
        }
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    pub fn services(&self) -> Services<'a> {
        self.services
    }

    pub fn status(&mut self, message: &str) {
        self.sink.status(message);
    }

    pub fn error(&mut self, message: &str) {
        self.sink.error(message);
    }

    /// Report an outcome as exactly one message and return whether it
    /// succeeded.
    pub fn report(&mut self, outcome: Result<String>) -> bool {
        match outcome {
            Ok(message) => {
                self.status(&message);
                true
            }
            Err(e) => {
                warn!("{} failed: {} [{}]", self.document.name, e, e.error_code());
                for suggestion in e.recovery_suggestions() {
                    info!("  {}", suggestion);
                }
                self.error(&e.to_string());
                false
            }
        }
    }
}

/// A scriptable command
pub trait Command: Sized {
    /// Name used in scripts, e.g. `Export`
    const NAME: &'static str;

    /// Declared parameters with their defaults.
    fn define_parameters() -> ParameterSet;

    /// Build the command from bound parameters.
    fn from_parameters(params: &ParameterSet) -> Result<Self>;

    /// Do the work and return the success message.
    fn execute(&self, context: &mut CommandContext<'_>) -> Result<String>;

    /// Bind caller-supplied values over the defaults and build the command.
    fn with_arguments<I, K, V>(supplied: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::define_parameters();
        params.bind(supplied)?;
        Self::from_parameters(&params)
    }

    /// Run the command, reporting exactly one status or error message.
    fn apply(&self, context: &mut CommandContext<'_>) -> bool {
        info!("Running {}", Self::NAME);
        let outcome = self.execute(context);
        context.report(outcome)
    }
}
