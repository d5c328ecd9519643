//! Active probe results

use serde::{Deserialize, Serialize};

/// Round-trip statistics for one ping target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub host: String,
    pub packets_sent: u32,
    pub packets_received: u32,
    /// Percent, 0-100
    pub packet_loss: f64,
    pub min_rtt: f64,
    pub avg_rtt: f64,
    pub max_rtt: f64,
    pub stddev_rtt: f64,
}

impl PingResult {
    /// Jitter is approximated by the RTT standard deviation
    pub fn jitter(&self) -> f64 {
        self.stddev_rtt
    }

    /// True when not a single reply came back
    pub fn is_unreachable(&self) -> bool {
        self.packets_received == 0
    }
}

/// OS throughput test summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub latency_ms: f64,
    /// Round-trips per minute under load
    pub responsiveness: u32,
    pub protocol: String,
}

/// iperf3 bidirectional bandwidth test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IperfResult {
    pub server: String,
    pub upload_mbps: f64,
    pub download_mbps: f64,
    pub upload_retransmits: u64,
    pub download_retransmits: u64,
    pub duration_s: u32,
    /// Set when the upload run failed; bandwidth fields are then meaningless
    pub error: Option<String>,
    /// Set when only the reverse (download) run failed
    pub download_error: Option<String>,
}

impl IperfResult {
    pub fn new(server: impl Into<String>, duration_s: u32) -> Self {
        Self {
            server: server.into(),
            upload_mbps: 0.0,
            download_mbps: 0.0,
            upload_retransmits: 0,
            download_retransmits: 0,
            duration_s,
            error: None,
            download_error: None,
        }
    }

    /// Bandwidth numbers can be trusted
    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_partial(&self) -> bool {
        self.error.is_none() && self.download_error.is_some()
    }
}

/// Bulk DNS resolution outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsReliabilityResult {
    pub dns_server: String,
    pub total_queries: u32,
    pub successful: u32,
    pub failed: u32,
    /// Percent, 0 when no queries ran
    pub success_rate: f64,
    pub failures: Vec<String>,
    pub avg_response_time_ms: Option<f64>,
    pub min_response_time_ms: Option<f64>,
    pub max_response_time_ms: Option<f64>,
}

impl DnsReliabilityResult {
    /// Build a result from per-query outcomes.
    ///
    /// `response_times` holds timings of successful queries only.
    pub fn from_tally(dns_server: impl Into<String>, successful: u32, failures: Vec<String>, response_times: &[f64]) -> Self {
        let failed = failures.len() as u32;
        let total_queries = successful + failed;
        let success_rate = if total_queries > 0 {
            successful as f64 / total_queries as f64 * 100.0
        } else {
            0.0
        };

        let (avg, min, max) = if response_times.is_empty() {
            (None, None, None)
        } else {
            let sum: f64 = response_times.iter().sum();
            let min = response_times.iter().copied().fold(f64::INFINITY, f64::min);
            let max = response_times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (Some(sum / response_times.len() as f64), Some(min), Some(max))
        };

        Self {
            dns_server: dns_server.into(),
            total_queries,
            successful,
            failed,
            success_rate,
            failures,
            avg_response_time_ms: avg,
            min_response_time_ms: min,
            max_response_time_ms: max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_is_stddev() {
        let ping = PingResult {
            host: "8.8.8.8".to_string(),
            stddev_rtt: 4.2,
            ..PingResult::default()
        };
        assert_eq!(ping.jitter(), 4.2);
    }

    #[test]
    fn test_dns_tally() {
        let result = DnsReliabilityResult::from_tally(
            "system default",
            3,
            vec!["broken.example".to_string()],
            &[10.0, 20.0, 30.0],
        );
        assert_eq!(result.total_queries, 4);
        assert_eq!(result.successful + result.failed, result.total_queries);
        assert!((result.success_rate - 75.0).abs() < 1e-9);
        assert_eq!(result.avg_response_time_ms, Some(20.0));
        assert_eq!(result.min_response_time_ms, Some(10.0));
        assert_eq!(result.max_response_time_ms, Some(30.0));
    }

    #[test]
    fn test_dns_tally_without_successes() {
        let result = DnsReliabilityResult::from_tally("1.1.1.1", 0, vec!["a.com".into(), "b.com".into()], &[]);
        assert_eq!(result.success_rate, 0.0);
        assert_eq!(result.avg_response_time_ms, None);
        assert_eq!(result.min_response_time_ms, None);
    }

    #[test]
    fn test_dns_tally_empty() {
        let result = DnsReliabilityResult::from_tally("system default", 0, Vec::new(), &[]);
        assert_eq!(result.total_queries, 0);
        assert_eq!(result.success_rate, 0.0);
    }

    #[test]
    fn test_iperf_flags() {
        let mut result = IperfResult::new("10.0.0.2", 10);
        assert!(result.is_usable());
        result.download_error = Some("reverse run failed".to_string());
        assert!(result.is_partial());
        result.error = Some("unable to connect".to_string());
        assert!(!result.is_usable());
        assert!(!result.is_partial());
    }
}
