//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Which probes a run is allowed to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Decide from a connectivity check at startup
    #[default]
    Auto,
    /// Offline collection plus internet probes
    Online,
    /// Local collection and gateway ping only
    Offline,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(AppError::config(format!(
                "Invalid mode '{}': expected auto, online or offline",
                other
            ))),
        }
    }
}

/// Outcome class of one pipeline step, for logs and the report summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Unavailable,
    Failed,
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_parsing() {
        assert_eq!("online".parse::<RunMode>().unwrap(), RunMode::Online);
        assert_eq!(" Offline ".parse::<RunMode>().unwrap(), RunMode::Offline);
        assert_eq!("AUTO".parse::<RunMode>().unwrap(), RunMode::Auto);
        assert!("sometimes".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_run_mode_display() {
        assert_eq!(RunMode::default().to_string(), "auto");
    }
}
