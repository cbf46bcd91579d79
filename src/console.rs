// 🖥️ Console - what the user sees when an exercise finishes or fails

use crate::error::RecordError;
use crate::grades::generate_report;
use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

/// How an error that reached the top level should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    MissingFile,
    Record,
    Unexpected,
}

pub fn classify_error(err: &anyhow::Error) -> ErrorClass {
    if err.downcast_ref::<RecordError>().is_some() {
        return ErrorClass::Record;
    }
    match err.downcast_ref::<io::Error>() {
        Some(io) if io.kind() == io::ErrorKind::NotFound => ErrorClass::MissingFile,
        _ => ErrorClass::Unexpected,
    }
}

/// One-line message for any error, never panics
pub fn describe_error(err: &anyhow::Error) -> String {
    match classify_error(err) {
        ErrorClass::MissingFile => "Input file not found.".to_string(),
        ErrorClass::Record => match err.downcast_ref::<RecordError>() {
            Some(record) => match record {
                RecordError::MalformedInput { .. } => format!("Malformed input: {}", record),
                RecordError::InvalidValue { .. } => format!("Invalid value: {}", record),
                other => format!("[{}] {}", other.kind(), other),
            },
            None => format!("Unexpected error: {:#}", err),
        },
        ErrorClass::Unexpected => format!("Unexpected error: {:#}", err),
    }
}

/// Process exit code: only unexpected errors are failures
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match classify_error(err) {
        ErrorClass::Unexpected => 1,
        ErrorClass::MissingFile | ErrorClass::Record => 0,
    }
}

/// Grade `input` into `output` and print the outcome
///
/// Known failures are reported and swallowed; unexpected ones are
/// returned to the caller after being printed.
pub fn run_grades<W: Write>(input: &Path, output: &Path, out: &mut W) -> Result<()> {
    match generate_report(input, output) {
        Ok(_) => writeln!(out, "Report generated successfully!")?,
        Err(err) => {
            writeln!(out, "{}", describe_error(&err))?;
            if classify_error(&err) == ErrorClass::Unexpected {
                return Err(err);
            }
        }
    }
    Ok(())
}
