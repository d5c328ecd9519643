//! Wi-Fi link (`airport -I`, `wdutil info`) and scan (`airport -s`) parsing

use super::{cached, extract_f64, extract_i64, key_value};
use crate::models::{NetworkScan, WiFiInfo};
use regex::Regex;
use std::sync::OnceLock;

/// Parse the current association from `airport -I` or `wdutil info`.
///
/// Returns `None` when no non-empty SSID, BSSID or non-zero RSSI is
/// present, or when airport reports `state: init`. Both mean the radio is
/// off or not associated. SNR is derived from RSSI and noise when the
/// tool does not print it.
pub fn parse_wifi_info(output: &str) -> Option<WiFiInfo> {
    let mut info = WiFiInfo::default();
    let mut found = false;
    let mut unassociated = false;
    let mut snr = None;
    let mut section: Option<String> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if is_section_header(trimmed) {
            section = Some(trimmed.to_string());
            continue;
        }
        if section.as_deref().is_some_and(|s| s != "WIFI") {
            continue;
        }

        let Some((key, value)) = key_value(trimmed) else {
            continue;
        };

        match key.to_ascii_lowercase().as_str() {
            "ssid" if !value.is_empty() => {
                info.ssid = value.to_string();
                found = true;
            }
            "bssid" if !value.is_empty() => {
                info.bssid = value.to_string();
                found = true;
            }
            "agrctlrssi" | "rssi" => {
                if let Some(rssi) = extract_i64(value).filter(|r| *r != 0) {
                    info.rssi = rssi as i32;
                    found = true;
                }
            }
            "state" => {
                unassociated = value.eq_ignore_ascii_case("init");
            }
            "agrctlnoise" | "noise" => {
                info.noise = extract_i64(value).unwrap_or(0) as i32;
            }
            "snr" => {
                snr = extract_i64(value).map(|v| v as i32);
            }
            "lasttxrate" | "tx rate" => {
                info.tx_rate = extract_f64(value).map(|v| v.round() as u32).unwrap_or(0);
            }
            "mcs" | "mcs index" => {
                info.mcs_index = extract_i64(value).and_then(|v| u8::try_from(v).ok());
            }
            "phy mode" => {
                info.phy_mode = value.to_string();
            }
            "link auth" | "security" => {
                info.security = value.to_string();
            }
            "channel" => {
                let (channel, width) = parse_channel(value);
                info.channel = channel;
                info.channel_width = width;
            }
            _ => {}
        }
    }

    if !found || unassociated {
        return None;
    }

    info.snr = match snr {
        Some(snr) => snr,
        None if info.has_noise_reading() => info.rssi - info.noise,
        None => 0,
    };

    Some(info)
}

/// wdutil prints sections as bare upper-case words (`WIFI`, `BLUETOOTH`)
fn is_section_header(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_uppercase() || c == ' ')
}

/// Split a channel spec into (number, width MHz).
///
/// Handles `36,80`, `36,+1`, `5g36/80`, `6` and `1 (2.4 GHz, 20 MHz)`.
/// Width defaults to 20 MHz when a channel is known.
pub(crate) fn parse_channel(spec: &str) -> (u16, u16) {
    static CHANNEL: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = cached(&CHANNEL, r"^(?:[256]g)?(\d+)(?:\s*[,/]\s*([+-]?\d+))?(?:.*?(\d+)\s*MHz)?") else {
        return (0, 0);
    };
    let Some(caps) = re.captures(spec.trim()) else {
        return (0, 0);
    };

    let channel: u16 = caps[1].parse().unwrap_or(0);
    let width = match (caps.get(2).map(|m| m.as_str()), caps.get(3)) {
        (_, Some(mhz)) => mhz.as_str().parse().unwrap_or(20),
        (Some("+1") | Some("-1"), None) => 40,
        (Some(w), None) => w.parse().ok().filter(|w| *w >= 20).unwrap_or(20),
        (None, None) => 20,
    };

    if channel == 0 {
        (0, 0)
    } else {
        (channel, width)
    }
}

/// Parse `airport -s` rows.
///
/// Each row is anchored on its BSSID, so SSIDs that contain spaces stay
/// whole. Rows keep the tool's order.
pub fn parse_wifi_scan(output: &str) -> Vec<NetworkScan> {
    static BSSID: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(bssid_re) = cached(&BSSID, r"\b([0-9a-fA-F]{1,2}(?::[0-9a-fA-F]{1,2}){5})\b") else {
        return Vec::new();
    };

    output
        .lines()
        .filter_map(|line| {
            let m = bssid_re.find(line)?;
            let ssid = line[..m.start()].trim().to_string();
            let rest: Vec<&str> = line[m.end()..].split_whitespace().collect();

            let rssi = rest.first().and_then(|v| extract_i64(v))? as i32;
            let channel = rest.get(1).map(|v| parse_channel(v).0).unwrap_or(0);
            let security = rest.get(4..).map(|s| s.join(" ")).unwrap_or_default();

            Some(NetworkScan {
                ssid,
                bssid: m.as_str().to_string(),
                channel,
                rssi,
                security,
            })
        })
        .collect()
}
