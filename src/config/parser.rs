//! Configuration layering: defaults, `.env`, environment, then CLI

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(interface) = &cli.interface {
            config.interface = Some(interface.clone());
        }
        config.all_interfaces = cli.all;

        if let Some(mode) = cli.mode {
            config.mode = mode;
        }
        if let Some(count) = cli.ping_count {
            config.ping_count = count;
        }
        if cli.no_wifi_scan {
            config.skip_wifi_scan = true;
        }
        if cli.skip_dns_test {
            config.skip_dns_test = true;
        }
        if let Some(domains) = cli.dns_domains {
            config.dns_domains = domains;
        }
        if let Some(server) = &cli.dns_server {
            config.dns_server = Some(server.clone());
        }
        if let Some(server) = &cli.iperf3_server {
            config.iperf3_server = Some(server.clone());
        }
        if let Some(port) = cli.iperf3_port {
            config.iperf3_port = port;
        }
        if let Some(duration) = cli.iperf3_duration {
            config.iperf3_duration_seconds = duration;
        }

        if cli.color {
            config.enable_color = true;
        } else if cli.no_color || cli.json {
            config.enable_color = false;
        }

        // CLI-only flags
        config.json_output = cli.json;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Mode: {}", config.mode));
    summary.push(format!(
        "Interface: {}",
        config
            .interface
            .as_deref()
            .unwrap_or(if config.all_interfaces { "all active" } else { "first active" })
    ));
    summary.push(format!("Ping Count: {}", config.ping_count));
    if config.skip_dns_test {
        summary.push("DNS Test: skipped".to_string());
    } else {
        summary.push(format!(
            "DNS Test: {} domains via {}",
            config.dns_domains,
            config.dns_server.as_deref().unwrap_or("system default")
        ));
    }
    match &config.iperf3_server {
        Some(server) => summary.push(format!(
            "iperf3: {}:{} for {}s",
            server, config.iperf3_port, config.iperf3_duration_seconds
        )),
        None => summary.push("iperf3: disabled".to_string()),
    }
    summary.push(format!(
        "Penalties: {} per error, {} per warning",
        config.scoring.error_penalty, config.scoring.warning_penalty
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use crate::types::RunMode;
    use clap::Parser;
    use std::env;

    fn clear_env() {
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = Cli::parse_from([
            "nha",
            "-i",
            "en1",
            "--mode",
            "online",
            "--ping-count",
            "4",
            "--iperf3",
            "iperf.example.net",
            "--iperf3-duration",
            "5",
            "--no-color",
            "--verbose",
        ]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert_eq!(config.interface.as_deref(), Some("en1"));
        assert_eq!(config.mode, RunMode::Online);
        assert_eq!(config.ping_count, 4);
        assert_eq!(config.iperf3_server.as_deref(), Some("iperf.example.net"));
        assert_eq!(config.iperf3_duration_seconds, 5);
        assert!(!config.enable_color);
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("NHA_PING_COUNT", "8");
        env::set_var("NHA_DNS_SERVER", "9.9.9.9");

        let cli = Cli::parse_from(["nha", "--ping-count", "12"]);
        let config = ConfigParser::new(cli).parse();
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.ping_count, 12);
        assert_eq!(config.dns_server.as_deref(), Some("9.9.9.9"));
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("NHA_IPERF3_PORT", "seventy");

        let result = ConfigParser::new(Cli::parse_from(["nha"])).parse();
        clear_env();

        let error = result.unwrap_err();
        assert_eq!(error.category(), "CONFIG");
        assert!(error.to_string().contains("NHA_IPERF3_PORT"));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = Cli::parse_from(["nha", "--dns-server", "resolver.local"]);
        assert!(load_config(cli).is_err());
    }

    #[test]
    fn test_json_disables_color() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = load_config(Cli::parse_from(["nha", "--json"])).unwrap();
        assert!(config.json_output);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Mode: auto"));
        assert!(summary.contains("Interface: first active"));
        assert!(summary.contains("DNS Test: 100 domains via system default"));
        assert!(summary.contains("iperf3: disabled"));
        assert!(summary.contains("Penalties: 15 per error, 5 per warning"));
    }
}
