//! `ping -c N` summary parsing (BSD and Linux iputils)

use super::cached;
use crate::models::PingResult;
use regex::Regex;
use std::sync::OnceLock;

/// Parse the statistics block of a ping run.
///
/// The packet line is required; the round-trip line is absent when no
/// reply came back, in which case RTTs stay 0 and loss is 100%.
pub fn parse_ping_output(output: &str, host: &str) -> Option<PingResult> {
    static PACKETS: OnceLock<Option<Regex>> = OnceLock::new();
    static RTT: OnceLock<Option<Regex>> = OnceLock::new();
    let packets_re = cached(
        &PACKETS,
        r"(\d+) packets transmitted, (\d+) (?:packets )?received(?:, \+\d+ \w+)*, ([\d.]+)% packet loss",
    )?;
    let rtt_re = cached(
        &RTT,
        r"(?:round-trip|rtt) min/avg/max/(?:stddev|mdev) = ([\d.]+)/([\d.]+)/([\d.]+)/([\d.]+)",
    )?;

    let packets = packets_re.captures(output)?;
    let mut result = PingResult {
        host: host.to_string(),
        packets_sent: packets[1].parse().ok()?,
        packets_received: packets[2].parse().ok()?,
        packet_loss: packets[3].parse().ok()?,
        ..PingResult::default()
    };

    if let Some(rtt) = rtt_re.captures(output) {
        result.min_rtt = rtt[1].parse().unwrap_or(0.0);
        result.avg_rtt = rtt[2].parse().unwrap_or(0.0);
        result.max_rtt = rtt[3].parse().unwrap_or(0.0);
        result.stddev_rtt = rtt[4].parse().unwrap_or(0.0);
    }

    Some(result)
}
