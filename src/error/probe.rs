//! Probe failure taxonomy
//!
//! All of these are recovered at the probe boundary. The pipeline logs
//! them and carries on with the next probe.

use crate::process::ProcessError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// Executable missing or unsupported on this OS version
    #[error("{tool} is not available on this system")]
    ToolUnavailable { tool: String },

    /// Process exceeded its deadline
    #[error("{tool} timed out after {}s", timeout.as_secs_f64())]
    ToolTimeout { tool: String, timeout: Duration },

    /// Tool ran but the expected output was not there
    #[error("{tool} output could not be parsed: {detail}")]
    ParseMiss { tool: String, detail: String },

    /// Tool exited non-zero without usable output
    #[error("{tool} failed (exit code {}): {stderr}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ProbeFailure {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Part of a multi-step probe failed; partial data was kept
    #[error("{tool} partially failed: {detail}")]
    PartialProbeFailure { tool: String, detail: String },
}

impl ProbeError {
    /// Map a process runner failure onto the probe taxonomy
    pub fn from_process(error: ProcessError) -> Self {
        match error {
            ProcessError::NotFound { program } => Self::ToolUnavailable { tool: program },
            ProcessError::Timeout { program, timeout } => Self::ToolTimeout { tool: program, timeout },
            ProcessError::Spawn { program, message } => Self::ProbeFailure {
                tool: program,
                exit_code: None,
                stderr: message,
            },
        }
    }

    pub fn parse_miss(tool: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ParseMiss {
            tool: tool.into(),
            detail: detail.into(),
        }
    }

    pub fn failure(tool: impl Into<String>, exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ProbeFailure {
            tool: tool.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable identifier for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToolUnavailable { .. } => "tool_unavailable",
            Self::ToolTimeout { .. } => "tool_timeout",
            Self::ParseMiss { .. } => "parse_miss",
            Self::ProbeFailure { .. } => "probe_failure",
            Self::PartialProbeFailure { .. } => "partial_probe_failure",
        }
    }

    /// Name of the tool involved
    pub fn tool(&self) -> &str {
        match self {
            Self::ToolUnavailable { tool }
            | Self::ToolTimeout { tool, .. }
            | Self::ParseMiss { tool, .. }
            | Self::ProbeFailure { tool, .. }
            | Self::PartialProbeFailure { tool, .. } => tool,
        }
    }

    /// "Not supported here" as opposed to "tried and failed"
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ToolUnavailable { .. })
    }
}

impl From<ProcessError> for ProbeError {
    fn from(error: ProcessError) -> Self {
        Self::from_process(error)
    }
}
