//! Network Health Analyzer
//!
//! Probes a host's network interfaces, Wi-Fi link, routing, DNS, latency
//! and throughput through the OS's own diagnostic tools, normalizes their
//! output into typed records and scores the result into a single health
//! verdict with findings and recommendations.

pub mod app;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod models;
pub mod online;
pub mod output;
pub mod parsers;
pub mod probes;
pub mod process;
pub mod types;

// Re-export commonly used types
pub use app::Analyzer;
pub use collectors::Collector;
pub use error::{AppError, ProbeError, Result};
pub use health::{assess, assess_network_health, HealthInputs, ScoringConfig};
pub use models::{AnalysisReport, Config, HealthCategory, HealthStatus};
pub use output::{OutputFormatter, OutputFormatterFactory, ReportFormatter};
pub use probes::Prober;
pub use process::{CommandOutput, CommandRunner, ProcessError, SystemCommandRunner};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_PING_COUNT: u32 = 10;
    pub const DEFAULT_DNS_DOMAINS: usize = 100;
    pub const DEFAULT_DNS_QUERY_TIMEOUT_SECS: u32 = 3;
    pub const DEFAULT_DNS_PROCESS_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(90);
    pub const DEFAULT_IPERF3_PORT: u16 = 5201;
    pub const DEFAULT_IPERF3_DURATION_SECS: u32 = 10;
    pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
    /// Deadline for the quick local collectors (ifconfig, netstat, ...)
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_WIFI_SCAN_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
