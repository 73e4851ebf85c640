//! CLI error type.

use std::fmt;
use std::io;

use addonbox::archive::DecodeError;
use addonbox::config::ConfigError;
use addonbox::logging::LoggingError;
use addonbox::CoreError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    Config(String),
    /// Logging could not be initialised.
    Logging(String),
    /// Resolving or encoding a package failed.
    Package(CoreError),
    /// An archive file could not be decoded.
    Decode(DecodeError),
    /// Reading input or writing output failed.
    Io(io::Error),
    /// One or more paths were rejected by the whitelist.
    Denied(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(msg) => write!(f, "Logging error: {}", msg),
            CliError::Package(e) => write!(f, "{}", e),
            CliError::Decode(e) => write!(f, "Invalid archive: {}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Denied(n) => write!(f, "{} path(s) not whitelisted", n),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Package(e) => Some(e),
            CliError::Decode(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        CliError::Package(e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        CliError::Decode(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
