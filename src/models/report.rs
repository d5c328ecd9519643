//! Everything gathered for one interface in one run

use super::{
    ConnectivityReport, DhcpInfo, DnsConfiguration, DnsReliabilityResult, GeoLocation, HealthStatus, InterfaceInfo,
    IperfResult, NetworkMetrics, NetworkScan, PingResult, PublicIpInfo, RoutingInfo, SpeedTestResult, WiFiInfo,
};
use crate::types::{RunMode, StepStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// Snapshot of one analyzed interface plus its health verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub mode: RunMode,
    pub interface: InterfaceInfo,
    pub connectivity: Option<ConnectivityReport>,
    pub metrics: Option<NetworkMetrics>,
    pub wifi: Option<WiFiInfo>,
    pub wifi_scan: Vec<NetworkScan>,
    pub routing: Option<RoutingInfo>,
    pub dhcp: Option<DhcpInfo>,
    pub dns_configuration: Option<DnsConfiguration>,
    pub network_dns_servers: Vec<String>,
    pub gateway_ping: Option<PingResult>,
    pub public_ip: Option<PublicIpInfo>,
    pub geolocation: Option<GeoLocation>,
    pub global_pings: Vec<PingResult>,
    pub speed_test: Option<SpeedTestResult>,
    pub iperf: Option<IperfResult>,
    pub dns_reliability: Option<DnsReliabilityResult>,
    pub health: HealthStatus,
    /// A user interrupt stopped the probes early; `health` scores what was gathered
    pub interrupted: bool,
    pub steps: Vec<StepRecord>,
}

impl AnalysisReport {
    /// Gateway ping first, then the global targets
    pub fn all_pings(&self) -> Vec<PingResult> {
        self.gateway_ping.iter().chain(self.global_pings.iter()).cloned().collect()
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthCategory, ALL_CHECKS_PASSED};

    fn report() -> AnalysisReport {
        AnalysisReport {
            timestamp: Utc::now(),
            mode: RunMode::Offline,
            interface: InterfaceInfo::new("en0", "Wi-Fi", "a4:83:e7:12:34:56"),
            connectivity: None,
            metrics: None,
            wifi: None,
            wifi_scan: Vec::new(),
            routing: None,
            dhcp: None,
            dns_configuration: None,
            network_dns_servers: Vec::new(),
            gateway_ping: Some(PingResult {
                host: "192.168.1.1".to_string(),
                ..PingResult::default()
            }),
            public_ip: None,
            geolocation: None,
            global_pings: vec![PingResult {
                host: "8.8.8.8".to_string(),
                ..PingResult::default()
            }],
            speed_test: None,
            iperf: None,
            dns_reliability: None,
            health: HealthStatus {
                overall: HealthCategory::Excellent,
                score: 100,
                warnings: Vec::new(),
                errors: Vec::new(),
                recommendations: vec![ALL_CHECKS_PASSED.to_string()],
            },
            interrupted: false,
            steps: vec![StepRecord {
                name: "speed_test".to_string(),
                status: StepStatus::Unavailable,
                detail: Some("networkQuality is not available on this system".to_string()),
                duration_ms: 3,
            }],
        }
    }

    #[test]
    fn test_all_pings_order() {
        let hosts: Vec<String> = report().all_pings().into_iter().map(|p| p.host).collect();
        assert_eq!(hosts, vec!["192.168.1.1", "8.8.8.8"]);
    }

    #[test]
    fn test_json_shape() {
        let report = report();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["mode"], "offline");
        assert_eq!(value["health"]["overall"], "excellent");
        assert!(value["speed_test"].is_null());
        assert_eq!(value["steps"][0]["status"], "unavailable");
        assert_eq!(report.step("speed_test").unwrap().status, StepStatus::Unavailable);
        assert!(report.step("iperf3").is_none());
    }
}
