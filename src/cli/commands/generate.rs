use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};

use super::super::args::GenerateCommand;
use super::{CommandResult, CommandSummary, GenerateSummary};
use crate::core::GenerateContext;

pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = GenerateContext::new(args)?;

    // Everything that can fail on the input runs before the output is touched.
    let source = ctx.emit()?;
    let registry = ctx.registry()?;

    let output = if args.stdout {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(source.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write generated source to stdout")?;
        None
    } else {
        let path = ctx.output_path();
        write_output(path, &source)?;
        Some(path.to_path_buf())
    };

    Ok(CommandResult {
        summary: CommandSummary::Generate(GenerateSummary {
            output,
            package: ctx.package.clone(),
            strategy: ctx.strategy(),
            layout: ctx.layout(),
            type_count: registry.type_count(),
            package_count: registry.len(),
            unit_count: ctx.tree().unit_count(),
            file_count: ctx.tree().file_count(),
        }),
    })
}

fn write_output(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, source).with_context(|| format!("Failed to write {}", path.display()))
}
