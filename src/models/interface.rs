//! Interface and counter records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Link state reported by the OS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    Active,
    #[default]
    Inactive,
}

impl InterfaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One network interface as enumerated by the OS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    /// BSD device name, e.g. `en0`
    pub name: String,
    /// Hardware port label, e.g. `Wi-Fi`
    pub hardware_port: String,
    pub mac_address: String,
    pub ipv4_address: Option<String>,
    pub ipv6_addresses: Vec<String>,
    /// Dotted-quad netmask
    pub netmask: Option<String>,
    pub status: InterfaceStatus,
    pub media_type: String,
    pub mtu: u32,
}

impl InterfaceInfo {
    pub fn new(name: impl Into<String>, hardware_port: impl Into<String>, mac_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hardware_port: hardware_port.into(),
            mac_address: mac_address.into(),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == InterfaceStatus::Active
    }
}

/// Cumulative interface counters.
///
/// Values are the OS's running totals, not deltas over the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub interface: String,
    pub packets_in: u64,
    pub packets_out: u64,
    pub errors_in: u64,
    pub errors_out: u64,
    pub collisions: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Input drops, when the tool reports them
    pub drops: u64,
    /// Percentage of inbound packets dropped
    pub drop_rate: f64,
}

impl NetworkMetrics {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            ..Self::default()
        }
    }

    pub fn total_packets(&self) -> u64 {
        self.packets_in.saturating_add(self.packets_out)
    }

    pub fn total_errors(&self) -> u64 {
        self.errors_in.saturating_add(self.errors_out)
    }

    /// Errors as a percentage of all packets; 0 when nothing was counted
    pub fn error_rate(&self) -> f64 {
        let total = self.total_packets();
        if total == 0 {
            0.0
        } else {
            self.total_errors() as f64 / total as f64 * 100.0
        }
    }

    /// Recompute `drop_rate` from `drops` and `packets_in`
    pub fn with_drops(mut self, drops: u64) -> Self {
        self.drops = drops;
        let seen = self.packets_in.saturating_add(drops);
        self.drop_rate = if seen == 0 {
            0.0
        } else {
            drops as f64 / seen as f64 * 100.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_rate() {
        let metrics = NetworkMetrics {
            interface: "en0".to_string(),
            packets_in: 1000,
            packets_out: 1000,
            errors_in: 30,
            ..NetworkMetrics::default()
        };
        assert!((metrics.error_rate() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_error_rate_without_packets() {
        assert_eq!(NetworkMetrics::new("lo0").error_rate(), 0.0);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = NetworkMetrics {
            packets_in: 990,
            ..NetworkMetrics::new("en0")
        }
        .with_drops(10);
        assert_eq!(metrics.drops, 10);
        assert!((metrics.drop_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&InterfaceStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        assert_eq!(InterfaceStatus::default(), InterfaceStatus::Inactive);
    }
}
