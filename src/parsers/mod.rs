//! Parsers for OS diagnostic tool output
//!
//! Every parser is a pure function from captured text to a typed record.
//! Fields that are missing in the input fall back to documented defaults;
//! a parser returns `None` only when the input has nothing recognizable.

pub mod counters;
pub mod dhcp;
pub mod dig;
pub mod dns_config;
pub mod interfaces;
pub mod iperf;
pub mod ping;
pub mod routing;
pub mod speedtest;
pub mod wifi;

pub use counters::parse_netstat;
pub use dhcp::parse_dhcp_packet;
pub use dig::{parse_dig_output, DigAnswer};
pub use dns_config::parse_dns_configuration;
pub use interfaces::{parse_hardware_ports, parse_ifconfig, HardwarePort, IfconfigDetails};
pub use iperf::{iperf_error_message, parse_iperf_json, IperfSummary};
pub use ping::parse_ping_output;
pub use routing::parse_routing_table;
pub use speedtest::parse_network_quality;
pub use wifi::{parse_wifi_info, parse_wifi_scan};

use regex::Regex;
use std::sync::OnceLock;

/// Compile a pattern once and keep it for the life of the process.
///
/// Returns `None` if the pattern does not compile, which the parsers
/// treat like input they do not recognize.
pub(crate) fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// First decimal number in `text`, ignoring units and surrounding noise.
///
/// `"12.5 ms"` and `"-67 dBm"` both parse; commas are never treated as
/// decimal separators.
pub fn extract_f64(text: &str) -> Option<f64> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"[-+]?\d+(?:\.\d+)?")?
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// First unsigned integer in `text`
pub fn extract_u64(text: &str) -> Option<u64> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"\d+")?
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// First signed integer in `text`
pub fn extract_i64(text: &str) -> Option<i64> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"[-+]?\d+")?
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Split `key: value` lines, trimming both halves.
///
/// Only the first colon separates, so values like MAC addresses survive.
pub(crate) fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_f64_with_units() {
        assert_eq!(extract_f64("12.5 ms"), Some(12.5));
        assert_eq!(extract_f64("-67 dBm"), Some(-67.0));
        assert_eq!(extract_f64("Idle Latency: 21.3 milliseconds"), Some(21.3));
        assert_eq!(extract_f64("none"), None);
    }

    #[test]
    fn test_extract_integers() {
        assert_eq!(extract_u64("Query time: 24 msec"), Some(24));
        assert_eq!(extract_i64("agrCtlRSSI: -58"), Some(-58));
        assert_eq!(extract_u64("n/a"), None);
    }

    #[test]
    fn test_key_value_keeps_colons_in_value() {
        assert_eq!(key_value("  BSSID: aa:bb:cc:dd:ee:ff"), Some(("BSSID", "aa:bb:cc:dd:ee:ff")));
        assert_eq!(key_value("no separator"), None);
        assert_eq!(key_value(": value"), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(94.456), 94.46);
        assert_eq!(round2(0.0), 0.0);
    }
}
