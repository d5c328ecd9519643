//! `networkQuality -v` summary parsing

use super::{cached, key_value};
use crate::models::SpeedTestResult;
use regex::Regex;
use std::sync::OnceLock;

/// Parse the summary of a speed test run.
///
/// Capacities are normalized to Mbps whatever unit the tool picked.
/// Returns `None` when neither capacity line is present, so a run that
/// produced nothing never reads as a 0 Mbps link.
pub fn parse_network_quality(output: &str) -> Option<SpeedTestResult> {
    let mut result = SpeedTestResult::default();
    let mut measured = false;

    for line in output.lines() {
        let Some((key, value)) = key_value(line) else {
            continue;
        };

        match key {
            "Downlink capacity" => {
                if let Some(mbps) = capacity_mbps(value) {
                    result.download_mbps = mbps;
                    measured = true;
                }
            }
            "Uplink capacity" => {
                if let Some(mbps) = capacity_mbps(value) {
                    result.upload_mbps = mbps;
                    measured = true;
                }
            }
            "Responsiveness" => {
                result.responsiveness = number_before(value, "RPM").map(|v| v.round() as u32).unwrap_or(0);
            }
            "Idle Latency" => {
                result.latency_ms = number_before(value, "milliseconds")
                    .or_else(|| number_before(value, "ms"))
                    .unwrap_or(0.0);
            }
            key if key.to_ascii_lowercase().ends_with("protocol") && result.protocol.is_empty() => {
                result.protocol = value.to_string();
            }
            _ => {}
        }
    }

    measured.then_some(result)
}

/// `245.678 Mbps`, `1.2 Gbps` and `850 Kbps` as Mbps
fn capacity_mbps(value: &str) -> Option<f64> {
    static CAPACITY: OnceLock<Option<Regex>> = OnceLock::new();
    let caps = cached(&CAPACITY, r"([\d.]+)\s*([KMG])bps")?.captures(value)?;
    let amount: f64 = caps[1].parse().ok()?;
    let scale = match &caps[2] {
        "G" => 1000.0,
        "K" => 0.001,
        _ => 1.0,
    };
    Some(amount * scale)
}

/// Number immediately preceding `unit`, e.g. `756` in `Medium (756 RPM)`
fn number_before(value: &str, unit: &str) -> Option<f64> {
    let tokens: Vec<&str> = value
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '|')
        .filter(|t| !t.is_empty())
        .collect();
    tokens
        .windows(2)
        .find(|pair| pair[1] == unit)
        .and_then(|pair| pair[0].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK_QUALITY: &str = "==== SUMMARY ====
Uplink capacity: 21.456 Mbps
Downlink capacity: 245.678 Mbps
Responsiveness: Medium (756 RPM)
Idle Latency: 2811 RPM (21.345 milliseconds)
Interface: en0
Uplink bytes transferred: 35.2 MB
Downlink bytes transferred: 402.1 MB
Uplink Flow count: 16
Downlink Flow count: 12
";

    #[test]
    fn test_parse_summary() {
        let result = parse_network_quality(NETWORK_QUALITY).unwrap();
        assert_eq!(result.download_mbps, 245.678);
        assert_eq!(result.upload_mbps, 21.456);
        assert_eq!(result.responsiveness, 756);
        assert_eq!(result.latency_ms, 21.345);
    }

    #[test]
    fn test_newer_layout_and_units() {
        let output = "==== SUMMARY ====
Uplink capacity: 850 Kbps (Accuracy: High)
Downlink capacity: 1.2 Gbps (Accuracy: High)
Responsiveness: High (23.456 milliseconds | 2557 RPM) (Accuracy: High)
Idle Latency: 18.200 milliseconds | 3296 RPM (Accuracy: High)
";
        let result = parse_network_quality(output).unwrap();
        assert!((result.download_mbps - 1200.0).abs() < 1e-9);
        assert!((result.upload_mbps - 0.85).abs() < 1e-9);
        assert_eq!(result.responsiveness, 2557);
        assert_eq!(result.latency_ms, 18.2);
    }

    #[test]
    fn test_no_capacity_is_none() {
        assert!(parse_network_quality("Error: could not connect to the test server").is_none());
        assert!(parse_network_quality("Responsiveness: Low (120 RPM)").is_none());
    }
}
