//! CLI error type.

use std::fmt;

use themepak::config::ConfigError;
use themepak::engine::ThemeError;
use themepak::logging::LoggingError;

/// Errors surfaced to the user by the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Bad or unusable configuration.
    Config(String),

    /// A theme operation failed.
    Theme(ThemeError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// Interactive prompt failed.
    Prompt(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Theme(_) => 1,
            CliError::Logging(_) => 2,
            CliError::Prompt(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Theme(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Theme(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ThemeError> for CliError {
    fn from(e: ThemeError) -> Self {
        CliError::Theme(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
