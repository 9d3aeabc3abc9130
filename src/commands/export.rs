//! `Export` command
//!
//! Builds an [`ExportRequest`] from its parameters and the document's
//! current selection, then lets the [`ExportDispatcher`] pick the exporter.

use log::info;

use crate::commands::params::ParameterSet;
use crate::commands::{Command, CommandContext};
use crate::document::Document;
use crate::error::Result;
use crate::export::dispatch::{ExportDispatcher, ExportRequest};

/// Default target of an export with no `Filename`
pub const DEFAULT_EXPORT_FILENAME: &str = "exported.wav";

/// Default `NumChannels`
pub const DEFAULT_CHANNELS: i64 = 1;

/// Exports the document to a file chosen by extension
#[derive(Debug, Clone)]
pub struct ExportCommand {
    file_name: String,
    num_channels: i64,
}

impl ExportCommand {
    pub fn new(file_name: impl Into<String>, num_channels: i64) -> Self {
        Self {
            file_name: file_name.into(),
            num_channels,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn num_channels(&self) -> i64 {
        self.num_channels
    }

    /// The request this command makes against the document's selection.
    pub fn request(&self, document: &Document) -> ExportRequest {
        let selection = document.selection();
        ExportRequest::new(
            self.file_name.as_str(),
            self.num_channels,
            selection.t0,
            selection.t1,
        )
    }
}

impl Command for ExportCommand {
    const NAME: &'static str = "Export";

    fn define_parameters() -> ParameterSet {
        ParameterSet::new(Self::NAME)
            .string("Filename", DEFAULT_EXPORT_FILENAME)
            .integer("NumChannels", DEFAULT_CHANNELS)
    }

    fn from_parameters(params: &ParameterSet) -> Result<Self> {
        Ok(Self::new(
            params.get_string("Filename")?,
            params.get_integer("NumChannels")?,
        ))
    }

    fn execute(&self, context: &mut CommandContext<'_>) -> Result<String> {
        let services = context.services();
        let document = context.document();

        ExportDispatcher::new(services.fs, services.backend, services.backup_suffix)
            .dispatch(document, &self.request(document))
    }

    /// Report the [`ExportResult`](crate::export::ExportResult) of
    /// [`ExportDispatcher::run`] as one message.
    fn apply(&self, context: &mut CommandContext<'_>) -> bool {
        info!("Running {}", Self::NAME);

        let services = context.services();
        let result = {
            let document = context.document();
            ExportDispatcher::new(services.fs, services.backend, services.backup_suffix)
                .run(document, &self.request(document))
        };

        if result.success {
            context.status(&result.message);
        } else {
            context.error(&result.message);
        }
        result.success
    }
}
