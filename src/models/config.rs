//! Configuration data model and validation

use crate::health::ScoringConfig;
use crate::probes::ProbeSettings;
use crate::types::{AppError, Result, RunMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Probe selection mode
    #[serde(default)]
    pub mode: RunMode,

    /// Interface to analyze; first active one when unset
    #[serde(default)]
    pub interface: Option<String>,

    /// Analyze every active interface
    #[serde(default)]
    pub all_interfaces: bool,

    /// Echo requests per ping target
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,

    /// Skip the nearby network scan
    #[serde(default)]
    pub skip_wifi_scan: bool,

    /// Skip the bulk DNS resolution test
    #[serde(default)]
    pub skip_dns_test: bool,

    /// Number of corpus domains resolved by the DNS test
    #[serde(default = "default_dns_domains")]
    pub dns_domains: usize,

    /// Resolver to test; system default when unset
    #[serde(default)]
    pub dns_server: Option<String>,

    /// Per-query dig timeout in seconds
    #[serde(default = "default_dns_query_timeout")]
    pub dns_query_timeout_seconds: u32,

    /// Deadline for the OS speed test
    #[serde(default = "default_speedtest_timeout")]
    pub speedtest_timeout_seconds: u64,

    /// iperf3 server to test against
    #[serde(default)]
    pub iperf3_server: Option<String>,

    #[serde(default = "default_iperf3_port")]
    pub iperf3_port: u16,

    /// Seconds per iperf3 direction
    #[serde(default = "default_iperf3_duration")]
    pub iperf3_duration_seconds: u32,

    /// Timeout for HTTP requests made by online checks
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    /// Scoring thresholds and penalties
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Explicit log level, overrides verbose/debug
    #[serde(default)]
    pub log_level: Option<String>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print the report as JSON
    #[serde(default)]
    pub json_output: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            interface: None,
            all_interfaces: false,
            ping_count: default_ping_count(),
            skip_wifi_scan: false,
            skip_dns_test: false,
            dns_domains: default_dns_domains(),
            dns_server: None,
            dns_query_timeout_seconds: default_dns_query_timeout(),
            speedtest_timeout_seconds: default_speedtest_timeout(),
            iperf3_server: None,
            iperf3_port: default_iperf3_port(),
            iperf3_duration_seconds: default_iperf3_duration(),
            http_timeout_seconds: default_http_timeout(),
            scoring: ScoringConfig::default(),
            log_level: None,
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Settings handed to the active probes
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            ping_count: self.ping_count,
            dns_query_timeout_seconds: self.dns_query_timeout_seconds,
            speedtest_timeout: Duration::from_secs(self.speedtest_timeout_seconds),
            iperf3_port: self.iperf3_port,
            iperf3_duration_seconds: self.iperf3_duration_seconds,
            ..ProbeSettings::default()
        }
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.ping_count == 0 || self.ping_count > 100 {
            return Err(AppError::config(format!(
                "Ping count must be between 1 and 100, got: {}",
                self.ping_count
            )));
        }

        let corpus = crate::probes::dns::DOMAIN_CORPUS.len();
        if self.dns_domains == 0 || self.dns_domains > corpus {
            return Err(AppError::config(format!(
                "DNS domain count must be between 1 and {}, got: {}",
                corpus, self.dns_domains
            )));
        }

        if let Some(server) = &self.dns_server {
            if server.trim().is_empty() {
                return Err(AppError::config("DNS server cannot be empty"));
            }
            if server.parse::<std::net::IpAddr>().is_err() {
                return Err(AppError::config(format!("Invalid DNS server IP address: {}", server)));
            }
        }

        if self.dns_query_timeout_seconds == 0 || self.dns_query_timeout_seconds > 30 {
            return Err(AppError::config("DNS query timeout must be between 1 and 30 seconds"));
        }

        if self.speedtest_timeout_seconds == 0 || self.speedtest_timeout_seconds > 600 {
            return Err(AppError::config("Speed test timeout must be between 1 and 600 seconds"));
        }

        if let Some(server) = &self.iperf3_server {
            if server.trim().is_empty() {
                return Err(AppError::config("iperf3 server cannot be empty"));
            }
        }

        if self.iperf3_port == 0 {
            return Err(AppError::config("iperf3 port must be greater than 0"));
        }

        if self.iperf3_duration_seconds == 0 || self.iperf3_duration_seconds > 300 {
            return Err(AppError::config("iperf3 duration must be between 1 and 300 seconds"));
        }

        if self.http_timeout_seconds == 0 || self.http_timeout_seconds > 600 {
            return Err(AppError::config("HTTP timeout must be between 1 and 600 seconds"));
        }

        if let Some(level) = &self.log_level {
            level.parse::<crate::logging::LogLevel>()?;
        }

        self.scoring.validate()?;

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var("NHA_MODE") {
            self.mode = mode.parse()?;
        }

        if let Ok(count) = std::env::var("NHA_PING_COUNT") {
            self.ping_count = count
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_PING_COUNT value '{}': {}", count, e)))?;
        }

        if let Ok(domains) = std::env::var("NHA_DNS_DOMAINS") {
            self.dns_domains = domains
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_DNS_DOMAINS value '{}': {}", domains, e)))?;
        }

        if let Ok(server) = std::env::var("NHA_DNS_SERVER") {
            self.dns_server = non_empty(server);
        }

        if let Ok(server) = std::env::var("NHA_IPERF3_SERVER") {
            self.iperf3_server = non_empty(server);
        }

        if let Ok(port) = std::env::var("NHA_IPERF3_PORT") {
            self.iperf3_port = port
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_IPERF3_PORT value '{}': {}", port, e)))?;
        }

        if let Ok(duration) = std::env::var("NHA_IPERF3_DURATION") {
            self.iperf3_duration_seconds = duration
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_IPERF3_DURATION value '{}': {}", duration, e)))?;
        }

        if let Ok(timeout) = std::env::var("NHA_SPEEDTEST_TIMEOUT") {
            self.speedtest_timeout_seconds = timeout
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_SPEEDTEST_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_color) = std::env::var("NHA_ENABLE_COLOR") {
            self.enable_color = enable_color
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(penalty) = std::env::var("NHA_ERROR_PENALTY") {
            self.scoring.error_penalty = penalty
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_ERROR_PENALTY value '{}': {}", penalty, e)))?;
        }

        if let Ok(penalty) = std::env::var("NHA_WARNING_PENALTY") {
            self.scoring.warning_penalty = penalty
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid NHA_WARNING_PENALTY value '{}': {}", penalty, e)))?;
        }

        if let Ok(level) = std::env::var("NHA_LOG_LEVEL") {
            self.log_level = non_empty(level);
        }

        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Default value functions for serde
fn default_ping_count() -> u32 {
    crate::defaults::DEFAULT_PING_COUNT
}

fn default_dns_domains() -> usize {
    crate::defaults::DEFAULT_DNS_DOMAINS
}

fn default_dns_query_timeout() -> u32 {
    crate::defaults::DEFAULT_DNS_QUERY_TIMEOUT_SECS
}

fn default_speedtest_timeout() -> u64 {
    crate::defaults::DEFAULT_SPEEDTEST_TIMEOUT.as_secs()
}

fn default_iperf3_port() -> u16 {
    crate::defaults::DEFAULT_IPERF3_PORT
}

fn default_iperf3_duration() -> u32 {
    crate::defaults::DEFAULT_IPERF3_DURATION_SECS
}

fn default_http_timeout() -> u64 {
    crate::defaults::DEFAULT_HTTP_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ping_count, crate::defaults::DEFAULT_PING_COUNT);
        assert_eq!(config.dns_domains, 100);
        assert_eq!(config.mode, RunMode::Auto);
    }

    #[test]
    fn test_zero_ping_count_invalid() {
        let config = Config {
            ping_count: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dns_domains_bounded_by_corpus() {
        let config = Config {
            dns_domains: crate::probes::dns::DOMAIN_CORPUS.len() + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_dns_server_ip() {
        let config = Config {
            dns_server: Some("not-an-ip".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_iperf3_port_invalid() {
        let config = Config {
            iperf3_port: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = Config {
            log_level: Some("chatty".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probe_settings_follow_config() {
        let config = Config {
            ping_count: 4,
            iperf3_port: 5202,
            iperf3_duration_seconds: 5,
            ..Config::default()
        };
        let settings = config.probe_settings();
        assert_eq!(settings.ping_count, 4);
        assert_eq!(settings.iperf3_port, 5202);
        assert_eq!(settings.iperf3_duration_seconds, 5);
    }

    #[test]
    fn test_serde_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
