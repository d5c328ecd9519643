//! Command-line interface

use crate::types::RunMode;
use clap::Parser;

/// Network Health Analyzer - probe interfaces, Wi-Fi, routing, DNS, latency
/// and throughput, then score the result
#[derive(Parser, Debug, Clone)]
#[command(name = "nha")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Interface to analyze (default: first active interface)
    #[arg(short, long, value_name = "IFACE", conflicts_with = "all")]
    pub interface: Option<String>,

    /// Analyze every active interface
    #[arg(short, long)]
    pub all: bool,

    /// List detected interfaces and exit
    #[arg(short, long)]
    pub list: bool,

    /// Probe selection: auto decides from a connectivity check
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<RunMode>,

    /// Skip the nearby Wi-Fi network scan
    #[arg(long)]
    pub no_wifi_scan: bool,

    /// Skip the bulk DNS resolution test
    #[arg(long)]
    pub skip_dns_test: bool,

    /// Number of domains resolved by the DNS test
    #[arg(long, value_name = "N")]
    pub dns_domains: Option<usize>,

    /// DNS server to test instead of the system resolver
    #[arg(long, value_name = "IP")]
    pub dns_server: Option<String>,

    /// iperf3 server for the bandwidth test
    #[arg(long = "iperf3", value_name = "HOST")]
    pub iperf3_server: Option<String>,

    /// iperf3 server port
    #[arg(long, value_name = "PORT")]
    pub iperf3_port: Option<u16>,

    /// Seconds per iperf3 direction
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub iperf3_duration: Option<u32>,

    /// Echo requests per ping target
    #[arg(short = 'c', long, value_name = "N")]
    pub ping_count: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log each probe step
    #[arg(long)]
    pub verbose: bool,

    /// Log raw tool invocations as JSON
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.json && self.list {
            return Err("--json cannot be combined with --list".to_string());
        }

        if let Some(interface) = &self.interface {
            if interface.trim().is_empty() {
                return Err("Interface name cannot be empty".to_string());
            }
        }

        if self.iperf3_server.is_none() && (self.iperf3_port.is_some() || self.iperf3_duration.is_some()) {
            return Err("--iperf3-port and --iperf3-duration require --iperf3".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        match (&self.interface, self.all) {
            (Some(interface), _) => summary.push_str(&format!("  Interface: {}\n", interface)),
            (None, true) => summary.push_str("  Interface: all active\n"),
            (None, false) => summary.push_str("  Interface: first active\n"),
        }
        if let Some(mode) = self.mode {
            summary.push_str(&format!("  Mode: {}\n", mode));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        if let Some(server) = &self.dns_server {
            summary.push_str(&format!("  DNS server: {}\n", server));
        }
        if let Some(server) = &self.iperf3_server {
            summary.push_str(&format!("  iperf3 server: {}\n", server));
        }

        summary
    }
}

fn parse_mode(s: &str) -> Result<RunMode, String> {
    s.parse::<RunMode>().map_err(|e| e.to_string())
}

/// Parse a whole number of seconds between 1 and 300
fn parse_seconds(s: &str) -> Result<u32, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u32>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Duration cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::parse_from(["nha"]);
        assert!(cli.interface.is_none());
        assert!(!cli.all);
        assert!(cli.mode.is_none());
        assert!(cli.ping_count.is_none());
        assert!(!cli.json);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "nha",
            "-i",
            "en0",
            "--mode",
            "offline",
            "--no-wifi-scan",
            "--skip-dns-test",
            "--dns-domains",
            "20",
            "--dns-server",
            "1.1.1.1",
            "--iperf3",
            "iperf.example.net",
            "--iperf3-port",
            "5202",
            "--iperf3-duration",
            "5",
            "--ping-count",
            "3",
            "--json",
            "--verbose",
            "--debug",
        ]);

        assert_eq!(cli.interface.as_deref(), Some("en0"));
        assert_eq!(cli.mode, Some(RunMode::Offline));
        assert!(cli.no_wifi_scan);
        assert!(cli.skip_dns_test);
        assert_eq!(cli.dns_domains, Some(20));
        assert_eq!(cli.dns_server.as_deref(), Some("1.1.1.1"));
        assert_eq!(cli.iperf3_server.as_deref(), Some("iperf.example.net"));
        assert_eq!(cli.iperf3_port, Some(5202));
        assert_eq!(cli.iperf3_duration, Some(5));
        assert_eq!(cli.ping_count, Some(3));
        assert!(cli.json);
        assert!(!cli.use_colors());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_interface_conflicts_with_all() {
        assert!(Cli::try_parse_from(["nha", "-i", "en0", "--all"]).is_err());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Cli::try_parse_from(["nha", "--mode", "sometimes"]).is_err());
    }

    #[test]
    fn test_seconds_parsing() {
        assert_eq!(parse_seconds("1").unwrap(), 1);
        assert_eq!(parse_seconds("300").unwrap(), 300);
        assert!(parse_seconds("0").is_err());
        assert!(parse_seconds("301").is_err());
        assert!(parse_seconds("+10").is_err());
        assert!(parse_seconds("0x10").is_err());
        assert!(parse_seconds("10.5").is_err());
        assert!(parse_seconds("").is_err());
    }

    #[test]
    fn test_cli_validation() {
        let conflict = Cli::parse_from(["nha", "--color", "--no-color"]);
        assert!(conflict.validate().unwrap_err().contains("--color and --no-color"));

        let orphan_port = Cli::parse_from(["nha", "--iperf3-port", "5202"]);
        assert!(orphan_port.validate().unwrap_err().contains("require --iperf3"));

        let list_json = Cli::parse_from(["nha", "--list", "--json"]);
        assert!(list_json.validate().is_err());
    }

    #[test]
    fn test_use_colors_flags() {
        assert!(!Cli::parse_from(["nha", "--no-color"]).use_colors());
        assert!(Cli::parse_from(["nha", "--color"]).use_colors());
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from(["nha", "-a", "--dns-server", "9.9.9.9", "--verbose"]);
        let summary = cli.get_config_summary();
        assert!(summary.contains("Interface: all active"));
        assert!(summary.contains("DNS server: 9.9.9.9"));
        assert!(summary.contains("Verbose mode: true"));
    }
}
