//! iperf3 `-J` report parsing

use super::{cached, round2};
use crate::error::ProbeError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

const TOOL: &str = "iperf3";

/// Bandwidth of one iperf3 direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IperfSummary {
    /// Rounded to 2 decimals
    pub mbps: f64,
    pub retransmits: u64,
}

/// Read the sender summary from an iperf3 JSON report.
///
/// Uses `end.sum_sent`, falling back to `end.sum` (UDP runs). When the
/// text is not JSON, a plain-text `... Mbits/sec ... sender` line is
/// accepted instead, without retransmits.
pub fn parse_iperf_json(output: &str) -> Result<IperfSummary, ProbeError> {
    match serde_json::from_str::<Value>(output) {
        Ok(report) => {
            let end = report.get("end").ok_or_else(|| ProbeError::parse_miss(TOOL, "report has no end section"))?;
            let sum = end
                .get("sum_sent")
                .or_else(|| end.get("sum"))
                .ok_or_else(|| ProbeError::parse_miss(TOOL, "report has no sender summary"))?;

            let bits_per_second = sum.get("bits_per_second").and_then(Value::as_f64).unwrap_or(0.0);
            Ok(IperfSummary {
                mbps: round2(bits_per_second / 1_000_000.0),
                retransmits: sum.get("retransmits").and_then(Value::as_u64).unwrap_or(0),
            })
        }
        Err(_) => parse_plain_text(output),
    }
}

fn parse_plain_text(output: &str) -> Result<IperfSummary, ProbeError> {
    static SUMMARY: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&SUMMARY, r"([\d.]+)\s+Mbits/sec.*?(sender|receiver)")
        .and_then(|re| re.captures(output))
        .and_then(|caps| caps[1].parse().ok())
        .map(|mbps| IperfSummary { mbps, retransmits: 0 })
        .ok_or_else(|| ProbeError::parse_miss(TOOL, "no bandwidth summary in output"))
}

/// The `error` field iperf3 puts in its JSON report on failure
pub fn iperf_error_message(output: &str) -> Option<String> {
    serde_json::from_str::<Value>(output)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
