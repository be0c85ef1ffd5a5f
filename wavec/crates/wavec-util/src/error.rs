//! Core error types for wavec-util crate
//!
//! This module defines error types used throughout the util crate.

use thiserror::Error;

/// Error type for the command-line driver
#[derive(Debug, Error)]
pub enum CliError {
    /// No input files were given on the command line
    #[error("no input files")]
    NoInputFiles,

    /// An unrecognized flag or missing argument value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// One or more input files failed to lex or parse
    #[error("{0} file(s) failed to compile")]
    CompilationFailed(usize),

    /// Wraps a lower-level I/O failure while reading a source file
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CLI driver operations
pub type CliResult<T> = std::result::Result<T, CliError>;
