//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if it exists
    pub fn load_env_file() -> Result<()> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file; a missing file is not an error
    pub fn load_env_file_from(path: &Path) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        let mut content = String::from(
            "# Network Health Analyzer Configuration\n\
             #\n\
             # Values here are used as defaults and can be overridden by\n\
             # command-line arguments.\n\n",
        );

        for (var, description, example) in Self::get_supported_env_vars() {
            content.push_str(&format!("# {}\n# {}={}\n\n", description, var, example));
        }

        content
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "NHA_MODE" => {
                value.parse::<crate::types::RunMode>()?;
            }
            "NHA_PING_COUNT" => {
                let count: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid NHA_PING_COUNT value '{}': {}", value, e)))?;
                if count == 0 || count > 100 {
                    return Err(AppError::config(format!(
                        "NHA_PING_COUNT must be between 1 and 100, got: {}",
                        count
                    )));
                }
            }
            "NHA_DNS_DOMAINS" => {
                let corpus = crate::probes::DOMAIN_CORPUS.len();
                let count: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid NHA_DNS_DOMAINS value '{}': {}", value, e)))?;
                if count == 0 || count > corpus {
                    return Err(AppError::config(format!(
                        "NHA_DNS_DOMAINS must be between 1 and {}, got: {}",
                        corpus, count
                    )));
                }
            }
            "NHA_DNS_SERVER" => {
                value
                    .parse::<std::net::IpAddr>()
                    .map_err(|e| AppError::config(format!("Invalid NHA_DNS_SERVER entry '{}': {}", value, e)))?;
            }
            "NHA_IPERF3_PORT" => {
                let port: u16 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid NHA_IPERF3_PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("NHA_IPERF3_PORT must be greater than 0"));
                }
            }
            "NHA_IPERF3_DURATION" | "NHA_SPEEDTEST_TIMEOUT" => {
                let limit = if key == "NHA_IPERF3_DURATION" { 300 } else { 600 };
                let secs: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if secs == 0 || secs > limit {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key, limit, secs
                    )));
                }
            }
            "NHA_ERROR_PENALTY" | "NHA_WARNING_PENALTY" => {
                let penalty: u8 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if penalty > 100 {
                    return Err(AppError::config(format!("{} cannot exceed 100, got: {}", key, penalty)));
                }
            }
            "NHA_ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid NHA_ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "NHA_LOG_LEVEL" => {
                value.parse::<crate::logging::LogLevel>()?;
            }
            _ => {
                // NHA_IPERF3_SERVER and unknown variables accept anything
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("NHA_MODE", "Probe selection: auto, online or offline", "auto"),
            ("NHA_PING_COUNT", "Echo requests per ping target (1-100)", "10"),
            ("NHA_DNS_DOMAINS", "Domains resolved by the DNS test", "100"),
            ("NHA_DNS_SERVER", "DNS server to test instead of the system resolver", "1.1.1.1"),
            ("NHA_IPERF3_SERVER", "iperf3 server for the bandwidth test", "iperf.example.net"),
            ("NHA_IPERF3_PORT", "iperf3 server port", "5201"),
            ("NHA_IPERF3_DURATION", "Seconds per iperf3 direction (1-300)", "10"),
            ("NHA_SPEEDTEST_TIMEOUT", "Speed test deadline in seconds (1-600)", "90"),
            ("NHA_ENABLE_COLOR", "Enable colored output", "true"),
            ("NHA_ERROR_PENALTY", "Score points removed per error (0-100)", "15"),
            ("NHA_WARNING_PENALTY", "Score points removed per warning (0-100)", "5"),
            ("NHA_LOG_LEVEL", "Log level override: trace, debug, info, warn, error", "info"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var, _, _)| {
                let value = std::env::var(var).ok()?;
                Self::validate_env_var(var, &value).err().map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
