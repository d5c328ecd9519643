//! Health scoring engine
//!
//! Folds every available signal into a 0-100 score, starting at 100 and
//! subtracting a penalty per finding. Signals that were not measured are
//! skipped, so a wired offline run with clean counters still scores 100.
//! The engine is a pure function of its inputs and cannot fail.

pub mod thresholds;


pub use thresholds::ScoringConfig;

use crate::models::{
    DnsReliabilityResult, HealthCategory, HealthStatus, InterfaceInfo, IperfResult, NetworkMetrics, PingResult,
    SpeedTestResult, WiFiInfo, ALL_CHECKS_PASSED,
};

/// Signals available for one assessment; any of them may be missing
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthInputs<'a> {
    pub metrics: Option<&'a NetworkMetrics>,
    pub wifi: Option<&'a WiFiInfo>,
    pub pings: &'a [PingResult],
    pub speed_test: Option<&'a SpeedTestResult>,
    pub dns: Option<&'a DnsReliabilityResult>,
    pub iperf: Option<&'a IperfResult>,
}

impl<'a> HealthInputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(mut self, metrics: Option<&'a NetworkMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn wifi(mut self, wifi: Option<&'a WiFiInfo>) -> Self {
        self.wifi = wifi;
        self
    }

    pub fn pings(mut self, pings: &'a [PingResult]) -> Self {
        self.pings = pings;
        self
    }

    pub fn speed_test(mut self, speed_test: Option<&'a SpeedTestResult>) -> Self {
        self.speed_test = speed_test;
        self
    }

    pub fn dns(mut self, dns: Option<&'a DnsReliabilityResult>) -> Self {
        self.dns = dns;
        self
    }

    pub fn iperf(mut self, iperf: Option<&'a IperfResult>) -> Self {
        self.iperf = iperf;
        self
    }
}

/// Score a set of signals
pub fn assess(inputs: &HealthInputs<'_>, config: &ScoringConfig) -> HealthStatus {
    let mut findings = Findings::new(config);

    if let Some(metrics) = inputs.metrics {
        findings.check_error_rate(metrics);
    }
    for ping in inputs.pings {
        findings.check_ping(ping);
    }
    if let Some(wifi) = inputs.wifi {
        findings.check_wifi(wifi);
    }
    if let Some(speed) = inputs.speed_test {
        findings.check_throughput("Speed test download", speed.download_mbps);
        findings.check_throughput("Speed test upload", speed.upload_mbps);
    }
    if let Some(dns) = inputs.dns {
        findings.check_dns(dns);
    }
    if let Some(iperf) = inputs.iperf.filter(|r| r.is_usable()) {
        findings.check_throughput(&format!("iperf3 upload to {}", iperf.server), iperf.upload_mbps);
        findings.check_throughput(&format!("iperf3 download from {}", iperf.server), iperf.download_mbps);
    }

    findings.finish()
}

/// Score the core signals with default thresholds.
///
/// The interface record itself carries no scored signal; link state and
/// addressing are reported, not penalized.
pub fn assess_network_health(
    _interface: &InterfaceInfo,
    metrics: Option<&NetworkMetrics>,
    wifi: Option<&WiFiInfo>,
    pings: &[PingResult],
    speed_test: Option<&SpeedTestResult>,
) -> HealthStatus {
    let inputs = HealthInputs::new()
        .metrics(metrics)
        .wifi(wifi)
        .pings(pings)
        .speed_test(speed_test);
    assess(&inputs, &ScoringConfig::default())
}

struct Findings<'c> {
    config: &'c ScoringConfig,
    penalty: u32,
    errors: Vec<String>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
}

impl<'c> Findings<'c> {
    fn new(config: &'c ScoringConfig) -> Self {
        Self {
            config,
            penalty: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn error(&mut self, message: String, recommendation: String) {
        self.penalty += u32::from(self.config.error_penalty);
        self.errors.push(message);
        self.recommendations.push(recommendation);
    }

    fn warning(&mut self, message: String, recommendation: String) {
        self.penalty += u32::from(self.config.warning_penalty);
        self.warnings.push(message);
        self.recommendations.push(recommendation);
    }

    fn check_error_rate(&mut self, metrics: &NetworkMetrics) {
        if metrics.total_packets() == 0 {
            return;
        }

        let rate = metrics.error_rate();
        let recommendation = format!(
            "Check the cable, port and driver of {}; replace damaged cabling or try another port",
            metrics.interface
        );
        if rate >= self.config.error_rate_error_pct {
            self.error(
                format!("High packet error rate on {}: {:.2}%", metrics.interface, rate),
                recommendation,
            );
        } else if rate >= self.config.error_rate_warning_pct {
            self.warning(
                format!("Elevated packet error rate on {}: {:.2}%", metrics.interface, rate),
                recommendation,
            );
        }
    }

    fn check_ping(&mut self, ping: &PingResult) {
        let host = &ping.host;

        if ping.packet_loss >= self.config.packet_loss_error_pct {
            self.error(
                format!("Packet loss to {}: {:.1}%", host, ping.packet_loss),
                format!("Packet loss to {}: check cabling or switch to a different network", host),
            );
        } else if ping.packet_loss > 0.0 {
            self.warning(
                format!("Minor packet loss to {}: {:.1}%", host, ping.packet_loss),
                format!("Intermittent loss to {}: watch for congestion or interference", host),
            );
        }

        if ping.avg_rtt >= self.config.latency_error_ms {
            self.error(
                format!("High latency to {}: {:.1} ms", host, ping.avg_rtt),
                format!("High latency to {}: check for congestion, VPNs or an overloaded router", host),
            );
        } else if ping.avg_rtt >= self.config.latency_warning_ms {
            self.warning(
                format!("Elevated latency to {}: {:.1} ms", host, ping.avg_rtt),
                format!("Latency to {} is elevated: pause large transfers and retest", host),
            );
        }

        let jitter = ping.jitter();
        if jitter >= self.config.jitter_error_ms {
            self.error(
                format!("High jitter to {}: {:.1} ms", host, jitter),
                format!("Unstable latency to {}: prefer a wired connection for real-time traffic", host),
            );
        } else if jitter >= self.config.jitter_warning_ms {
            self.warning(
                format!("Elevated jitter to {}: {:.1} ms", host, jitter),
                format!("Latency to {} varies: reduce competing traffic on the link", host),
            );
        }
    }

    fn check_wifi(&mut self, wifi: &WiFiInfo) {
        let quality = wifi.signal_quality();

        if wifi.rssi < self.config.rssi_error_dbm {
            self.error(
                format!("Very weak Wi-Fi signal on '{}': {} dBm ({})", wifi.ssid, wifi.rssi, quality),
                "Move closer to the access point or reduce interference".to_string(),
            );
        } else if wifi.rssi <= self.config.rssi_warning_dbm {
            self.warning(
                format!("Weak Wi-Fi signal on '{}': {} dBm ({})", wifi.ssid, wifi.rssi, quality),
                "Move closer to the access point or remove obstacles between you and it".to_string(),
            );
        }

        if !wifi.has_noise_reading() {
            return;
        }

        if wifi.snr < self.config.snr_error_db {
            self.error(
                format!("Wi-Fi noise interference: SNR {} dB", wifi.snr),
                "Switch to a less congested channel or the 5 GHz band to escape interference".to_string(),
            );
        } else if wifi.snr <= self.config.snr_warning_db {
            self.warning(
                format!("Low Wi-Fi signal-to-noise ratio: {} dB", wifi.snr),
                "Try a different Wi-Fi channel to improve the signal-to-noise ratio".to_string(),
            );
        }
    }

    /// A direction reporting 0 was not measured and is skipped
    fn check_throughput(&mut self, label: &str, mbps: f64) {
        if mbps <= 0.0 {
            return;
        }

        if mbps < self.config.throughput_error_mbps {
            self.error(
                format!("{} is very slow: {:.1} Mbps", label, mbps),
                format!("{} is very slow: contact your ISP or check for bandwidth-heavy devices", label),
            );
        } else if mbps < self.config.throughput_warning_mbps {
            self.warning(
                format!(
                    "{} is below {} Mbps: {:.1} Mbps",
                    label, self.config.throughput_warning_mbps, mbps
                ),
                format!("{} is modest: consider a faster plan if this limits your usage", label),
            );
        }
    }

    fn check_dns(&mut self, dns: &DnsReliabilityResult) {
        if dns.total_queries == 0 {
            return;
        }

        if dns.success_rate < self.config.dns_success_error_pct {
            self.error(
                format!("DNS resolution via {} is unreliable: {:.1}% success", dns.dns_server, dns.success_rate),
                "Switch to a public resolver such as 1.1.1.1 or 8.8.8.8".to_string(),
            );
        } else if dns.success_rate < self.config.dns_success_warning_pct {
            self.warning(
                format!("Some DNS lookups via {} failed: {:.1}% success", dns.dns_server, dns.success_rate),
                format!("Review the {} failed lookups and consider a secondary resolver", dns.failed),
            );
        }
    }

    fn finish(self) -> HealthStatus {
        let score = 100u32.saturating_sub(self.penalty).min(100) as u8;

        let mut recommendations = self.recommendations;
        if recommendations.is_empty() {
            recommendations.push(ALL_CHECKS_PASSED.to_string());
        }

        HealthStatus {
            overall: HealthCategory::from_score(score),
            score,
            warnings: self.warnings,
            errors: self.errors,
            recommendations,
        }
    }
}
