//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Scan a Go source tree and write the bean factory file
//! - `init`: Write a default `.beangen.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{CollisionPolicy, Layout, Strategy};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments that decide what gets scanned.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to scan (overrides config file)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Import path of the scan root, used instead of the enclosing go.mod
    #[arg(long)]
    pub module_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Package name of the generated file
    #[arg(short, long, env = "GOPACKAGE")]
    pub package: Option<String>,

    /// Output file (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the generated source instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// How the file is assembled
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Shape of the generated API
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// What to do when two directories resolve to the same import path
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Parse files one at a time
    #[arg(long)]
    pub no_parallel: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a name-to-instance factory for every exported struct type
    Generate(GenerateCommand),
    /// Initialize a new .beangen.json configuration file
    Init,
}
