// src/error.rs
use thiserror::Error;

/// Error hierarchy for the terminal front-end
///
/// Nothing raised by the search/match core is fatal. Only the bootstrap layer
/// turns `PtyCreationFailed` and `SpawnFailed` into a process exit.
#[derive(Error, Debug)]
pub enum TerminalError {
    // Search and matching
    #[error("Invalid search pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Process management
    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("PTY creation failed: {message}")]
    PtyCreationFailed { message: String },

    #[error("PTY I/O error: {source}")]
    PtyIo {
        #[from]
        source: std::io::Error,
    },

    // Configuration
    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    #[error("Invalid configuration: {field} = {value}")]
    ConfigurationError { field: String, value: String },
}

pub type TerminalResult<T> = Result<T, TerminalError>;
