//! Severity bands and penalties used by the scorer

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds and point penalties for health scoring.
///
/// Each signal has a red (error) and a yellow (warning) band. The bands
/// match the colors the report uses, so a red value on screen is always
/// an error in the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points subtracted per error
    pub error_penalty: u8,
    /// Points subtracted per warning
    pub warning_penalty: u8,

    /// Interface error rate, percent
    pub error_rate_error_pct: f64,
    pub error_rate_warning_pct: f64,

    /// Average round-trip time, ms
    pub latency_error_ms: f64,
    pub latency_warning_ms: f64,

    /// RTT standard deviation, ms
    pub jitter_error_ms: f64,
    pub jitter_warning_ms: f64,

    /// Packet loss at or above this is an error; any loss below is a warning
    pub packet_loss_error_pct: f64,

    /// RSSI strictly below this is an error
    pub rssi_error_dbm: i32,
    /// RSSI at or below this is a warning
    pub rssi_warning_dbm: i32,

    /// SNR strictly below this is an error
    pub snr_error_db: i32,
    /// SNR at or below this is a warning
    pub snr_warning_db: i32,

    /// Measured throughput below these is an error / warning, Mbps
    pub throughput_error_mbps: f64,
    pub throughput_warning_mbps: f64,

    /// DNS success rate below these is an error / warning, percent
    pub dns_success_error_pct: f64,
    pub dns_success_warning_pct: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            error_penalty: 15,
            warning_penalty: 5,
            error_rate_error_pct: 1.0,
            error_rate_warning_pct: 0.1,
            latency_error_ms: 100.0,
            latency_warning_ms: 50.0,
            jitter_error_ms: 20.0,
            jitter_warning_ms: 10.0,
            packet_loss_error_pct: 1.0,
            rssi_error_dbm: -80,
            rssi_warning_dbm: -70,
            snr_error_db: 15,
            snr_warning_db: 30,
            throughput_error_mbps: 10.0,
            throughput_warning_mbps: 50.0,
            dns_success_error_pct: 90.0,
            dns_success_warning_pct: 99.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.error_penalty > 100 || self.warning_penalty > 100 {
            return Err(AppError::config("Scoring penalties must be between 0 and 100"));
        }

        let ordered = [
            ("error rate", self.error_rate_warning_pct <= self.error_rate_error_pct),
            ("latency", self.latency_warning_ms <= self.latency_error_ms),
            ("jitter", self.jitter_warning_ms <= self.jitter_error_ms),
            ("RSSI", self.rssi_error_dbm <= self.rssi_warning_dbm),
            ("SNR", self.snr_error_db <= self.snr_warning_db),
            ("throughput", self.throughput_error_mbps <= self.throughput_warning_mbps),
            ("DNS success rate", self.dns_success_error_pct <= self.dns_success_warning_pct),
        ];

        if let Some((name, _)) = ordered.iter().find(|(_, ok)| !ok) {
            return Err(AppError::config(format!(
                "Scoring thresholds for {} are inverted: the warning band must be milder than the error band",
                name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_penalty_above_100_rejected() {
        let config = ScoringConfig {
            error_penalty: 101,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let config = ScoringConfig {
            latency_warning_ms: 200.0,
            ..ScoringConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("latency"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"error_penalty": 20}"#).unwrap();
        assert_eq!(config.error_penalty, 20);
        assert_eq!(config.warning_penalty, 5);
    }
}
