//! `networksetup -listallhardwareports` and `ifconfig <dev>` parsing

use super::{cached, key_value};
use crate::models::{InterfaceInfo, InterfaceStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One hardware port block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwarePort {
    pub port: String,
    pub device: String,
    pub mac: String,
}

impl HardwarePort {
    pub fn into_interface(self) -> InterfaceInfo {
        InterfaceInfo::new(self.device, self.port, self.mac)
    }
}

/// Parse hardware port blocks.
///
/// Blocks without a `Device:` line are dropped. A device listed twice
/// keeps its first block.
pub fn parse_hardware_ports(output: &str) -> Vec<HardwarePort> {
    let mut ports = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<HardwarePort> = None;

    let mut flush = |port: Option<HardwarePort>, ports: &mut Vec<HardwarePort>| {
        if let Some(port) = port {
            if !port.device.is_empty() && seen.insert(port.device.clone()) {
                ports.push(port);
            }
        }
    };

    for line in output.lines() {
        let Some((key, value)) = key_value(line) else {
            continue;
        };

        match key {
            "Hardware Port" => {
                flush(current.take(), &mut ports);
                current = Some(HardwarePort {
                    port: value.to_string(),
                    ..HardwarePort::default()
                });
            }
            "Device" => {
                if let Some(port) = current.as_mut() {
                    port.device = value.to_string();
                }
            }
            "Ethernet Address" => {
                if let Some(port) = current.as_mut() {
                    port.mac = value.to_string();
                }
            }
            _ => {}
        }
    }
    flush(current.take(), &mut ports);

    ports
}

/// Address and link details from `ifconfig <dev>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfconfigDetails {
    pub status: InterfaceStatus,
    pub ipv4_address: Option<String>,
    pub ipv6_addresses: Vec<String>,
    pub netmask: Option<String>,
    pub media_type: String,
    pub mtu: u32,
    pub mac_address: Option<String>,
}

impl IfconfigDetails {
    /// Copy the details onto an interface record, keeping its MAC when
    /// ifconfig did not print one
    pub fn apply_to(self, info: &mut InterfaceInfo) {
        info.status = self.status;
        info.ipv4_address = self.ipv4_address;
        info.ipv6_addresses = self.ipv6_addresses;
        info.netmask = self.netmask;
        info.media_type = self.media_type;
        info.mtu = self.mtu;
        if let Some(mac) = self.mac_address {
            if info.mac_address.is_empty() {
                info.mac_address = mac;
            }
        }
    }
}

/// Parse `ifconfig` output for a single device.
///
/// Accepts the BSD layout (hex netmask, `status:` line) and the Linux
/// net-tools layout (dotted netmask, `ether`/`inet6` lines). Returns
/// `None` when the text carries no header and no address lines, e.g. an
/// "interface does not exist" message.
pub fn parse_ifconfig(output: &str) -> Option<IfconfigDetails> {
    static MTU: OnceLock<Option<Regex>> = OnceLock::new();
    static FLAGS: OnceLock<Option<Regex>> = OnceLock::new();
    let mtu_re = cached(&MTU, r"\bmtu\s+(\d+)")?;
    let flags_re = cached(&FLAGS, r"flags=\w+<([^>]*)>")?;

    let mut details = IfconfigDetails::default();
    let mut recognized = false;
    let mut status_line = None;
    let mut link_up = false;

    for raw in output.lines() {
        let line = raw.trim();

        if let Some(caps) = mtu_re.captures(line) {
            details.mtu = caps[1].parse().unwrap_or(0);
            recognized = true;
        }
        if let Some(caps) = flags_re.captures(line) {
            let flags: Vec<&str> = caps[1].split(',').collect();
            link_up = flags.contains(&"UP") && flags.contains(&"RUNNING");
            recognized = true;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("inet") => {
                recognized = true;
                let rest: Vec<&str> = tokens.collect();
                if details.ipv4_address.is_none() {
                    details.ipv4_address = rest.first().map(|a| strip_addr_prefix(a).to_string());
                    details.netmask = value_after(&rest, "netmask")
                        .or_else(|| value_after(&rest, "Mask"))
                        .and_then(normalize_netmask);
                }
            }
            Some("inet6") => {
                recognized = true;
                if let Some(addr) = tokens.next() {
                    let addr = strip_addr_prefix(addr);
                    let addr = addr.split('%').next().unwrap_or(addr);
                    details.ipv6_addresses.push(addr.to_string());
                }
            }
            Some("ether") => {
                recognized = true;
                details.mac_address = tokens.next().map(str::to_string);
            }
            Some("media:") => {
                details.media_type = tokens.collect::<Vec<_>>().join(" ");
            }
            Some("status:") => {
                status_line = tokens.next().map(str::to_string);
            }
            _ => {}
        }
    }

    if !recognized {
        return None;
    }

    details.status = match status_line.as_deref() {
        Some("active") => InterfaceStatus::Active,
        Some(_) => InterfaceStatus::Inactive,
        None if link_up => InterfaceStatus::Active,
        None => InterfaceStatus::Inactive,
    };

    Some(details)
}

fn strip_addr_prefix(token: &str) -> &str {
    token.strip_prefix("addr:").unwrap_or(token)
}

fn value_after<'a>(tokens: &[&'a str], label: &str) -> Option<&'a str> {
    tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| {
            if *t == label {
                tokens.get(i + 1).copied()
            } else {
                t.strip_prefix(label).and_then(|v| v.strip_prefix(':'))
            }
        })
}

/// Convert `0xffffff00` to `255.255.255.0`; dotted input passes through
pub(crate) fn normalize_netmask(raw: &str) -> Option<String> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        let bits = u32::from_str_radix(hex, 16).ok()?;
        return Some(std::net::Ipv4Addr::from(bits).to_string());
    }
    raw.parse::<std::net::Ipv4Addr>().ok().map(|addr| addr.to_string())
}
