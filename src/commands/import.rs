//! `Import` command
//!
//! Hands a file path to the import collaborator and reports what it said.

use std::path::Path;

use crate::commands::params::ParameterSet;
use crate::commands::{Command, CommandContext};
use crate::error::Result;

/// What to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub source_path: String,
}

/// Appends the tracks of a file to the document
#[derive(Debug, Clone)]
pub struct ImportCommand {
    request: ImportRequest,
}

impl ImportCommand {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            request: ImportRequest {
                source_path: source_path.into(),
            },
        }
    }

    pub fn request(&self) -> &ImportRequest {
        &self.request
    }
}

impl Command for ImportCommand {
    const NAME: &'static str = "Import";

    fn define_parameters() -> ParameterSet {
        ParameterSet::new(Self::NAME).string("Filename", "")
    }

    fn from_parameters(params: &ParameterSet) -> Result<Self> {
        Ok(Self::new(params.get_string("Filename")?))
    }

    fn execute(&self, context: &mut CommandContext<'_>) -> Result<String> {
        let importer = context.services().importer;
        let path = &self.request.source_path;

        importer.import(context.document_mut(), Path::new(path))?;
        Ok(format!("Imported {}", path))
    }
}
