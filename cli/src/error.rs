use std::{fmt, process::ExitCode};

use error_stack::Result;

#[derive(Debug)]
pub enum CliError {
    /// Missing or invalid configuration. The command did not start.
    Configuration,
    /// The command failed while running.
    Runtime,
}

pub trait ReportExt {
    fn to_exit_code(&self) -> ExitCode;
}

impl error_stack::Context for CliError {}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Configuration => f.write_str("cli configuration error"),
            CliError::Runtime => f.write_str("cli operation failed"),
        }
    }
}

impl<T> ReportExt for Result<T, CliError> {
    fn to_exit_code(&self) -> ExitCode {
        match self {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{:?}", err);
                match err.current_context() {
                    CliError::Configuration => ExitCode::FAILURE,
                    // EX_SOFTWARE from sysexits.h
                    CliError::Runtime => ExitCode::from(70),
                }
            }
        }
    }
}
