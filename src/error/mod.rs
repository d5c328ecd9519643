//! Error handling for the network health analyzer

pub mod probe;

pub use probe::ProbeError;

use thiserror::Error;

/// Application-level errors.
///
/// Probe failures never surface here: they are recovered at the probe
/// boundary (see [`ProbeError`]). `AppError` covers what can abort the
/// binary: bad configuration, a missing interface, a user interrupt.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (numbers, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Network client errors (online checks)
    #[error("Network error: {0}")]
    Network(String),

    /// Requested interface does not exist
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Enumeration returned nothing usable
    #[error("No network interfaces found: {0}")]
    NoInterfaces(String),

    /// Run aborted by the user
    #[error("Analysis interrupted by user")]
    Interrupted,

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create an interface-not-found error
    pub fn interface_not_found<S: Into<String>>(name: S) -> Self {
        Self::InterfaceNotFound(name.into())
    }

    /// Create a no-interfaces error
    pub fn no_interfaces<S: Into<String>>(message: S) -> Self {
        Self::NoInterfaces(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Network(_) => "NETWORK",
            Self::InterfaceNotFound(_) | Self::NoInterfaces(_) => "INTERFACE",
            Self::Interrupted => "INTERRUPT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the ranges of counts, ports and timeouts.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your configuration values.", msg)
            }
            Self::Network(msg) => {
                format!("Network request failed: {}\n\nSuggestion: Run with --mode offline to skip online checks.", msg)
            }
            Self::InterfaceNotFound(name) => {
                format!("Interface '{}' does not exist.\n\nSuggestion: Run with --list to see the detected interfaces.", name)
            }
            Self::NoInterfaces(msg) => {
                format!("No usable interface: {}\n\nSuggestion: Check that networksetup and ifconfig are available.", msg)
            }
            Self::Interrupted => "Analysis interrupted by user. Partial results were kept.".to_string(),
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::InterfaceNotFound(_) | Self::NoInterfaces(_) => 1,
            Self::Network(_) => 2,
            Self::Io(_) => 5,
            Self::Interrupted => 130,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::InterfaceNotFound(_) | Self::NoInterfaces(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Interrupted => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert_eq!(config_error.exit_code(), 1);

        let missing = AppError::interface_not_found("en9");
        assert_eq!(missing.category(), "INTERFACE");
        assert!(missing.to_string().contains("en9"));
    }

    #[test]
    fn test_interrupt_exit_code() {
        assert_eq!(AppError::Interrupted.exit_code(), 130);
        assert_eq!(AppError::Interrupted.category(), "INTERRUPT");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::network("test").exit_code(), 2);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::config("ping count must be positive");
        let message = error.user_friendly_message();
        assert!(message.contains("Configuration problem"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("ping count must be positive"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<i32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let bool_error = "maybe".parse::<bool>().unwrap_err();
        let app_error: AppError = bool_error.into();
        assert!(app_error.to_string().contains("Boolean parse error"));
    }

    #[test]
    fn test_json_parse_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::validation("port must be non-zero");
        let plain = error.format_for_console(false);
        let colored = error.format_for_console(true);

        assert!(plain.starts_with("[VALIDATION]"));
        assert!(colored.contains("VALIDATION"));
        assert!(colored.contains("port must be non-zero"));
    }

    #[test]
    fn test_anyhow_integration() {
        let app_error: AppError = anyhow::anyhow!("unexpected state").into();
        assert_eq!(app_error.category(), "INTERNAL");
    }
}
