use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::core::{Layout, Strategy};

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    /// Written file, or `None` when the source went to stdout.
    pub output: Option<PathBuf>,
    pub package: String,
    pub strategy: Strategy,
    pub layout: Layout,
    /// Types registered in the generated file.
    pub type_count: usize,
    /// Packages imported by the generated file.
    pub package_count: usize,
    /// Directories visited during resolution.
    pub unit_count: usize,
    /// Go files parsed.
    pub file_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    /// False when a config file was already present.
    pub created: bool,
}

/// Result of running beangen commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Init(summary) if !summary.created => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}
