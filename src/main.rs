use std::process::ExitCode;

use beangen::cli::{Arguments, ExitStatus};
use beangen::core::{EmitError, Error};
use clap::{CommandFactory, Parser, error::ErrorKind};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match beangen::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            if let Some(Error::Emit(EmitError::MissingPackage)) = err.downcast_ref::<Error>() {
                Arguments::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "no target package: pass --package <NAME>, set GOPACKAGE, \
                         or add \"package\" to .beangen.json",
                    )
                    .exit();
            }
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
