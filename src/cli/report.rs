//! Report formatting and printing utilities.
//!
//! Separate from core logic so the pipeline can be used as a library.
//! Summaries go to stdout, except when the generated source itself is
//! written there.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, GenerateSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Generate(summary) => {
            if summary.output.is_some() {
                print_generate_to(summary, verbose, &mut io::stdout().lock());
            } else {
                print_generate_to(summary, verbose, &mut io::stderr().lock());
            }
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print the outcome of a `generate` run to a custom writer.
pub fn print_generate_to<W: Write>(summary: &GenerateSummary, verbose: bool, writer: &mut W) {
    if summary.type_count == 0 {
        let _ = writeln!(
            writer,
            "{} No exported struct types found in {} {}",
            "warning:".bold().yellow(),
            summary.unit_count,
            if summary.unit_count == 1 {
                "directory"
            } else {
                "directories"
            }
        );
    }

    // Piped source stays clean unless details were asked for.
    if summary.output.is_none() && !verbose {
        return;
    }

    let target = match &summary.output {
        Some(path) => format!("Wrote {}", path.display()),
        None => "Generated".to_string(),
    };
    let msg = format!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "{} (package {}): {} {} from {} {}, {} Go {} scanned",
            target,
            summary.package,
            summary.type_count,
            if summary.type_count == 1 { "type" } else { "types" },
            summary.package_count,
            if summary.package_count == 1 {
                "package"
            } else {
                "packages"
            },
            summary.file_count,
            if summary.file_count == 1 { "file" } else { "files" }
        )
        .green()
    );
    let _ = writeln!(writer, "{}", msg);

    if verbose {
        let _ = writeln!(
            writer,
            "{} strategy: {:?}, layout: {:?}",
            "note:".bold().cyan(),
            summary.strategy,
            summary.layout
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
    }
}

// ============================================================
// Tests
// ============================================================
