//! DHCP lease parsing for `ipconfig getpacket <dev>`

use crate::models::DhcpInfo;

/// Parse the last DHCP reply for an interface.
///
/// Option lines look like `name (type): value`; multi-valued options are
/// brace lists. Hex integers (`0x15180`) and decimal ones are both
/// accepted for the lease time. Returns `None` when neither a leased
/// address nor any option was found.
pub fn parse_dhcp_packet(output: &str) -> Option<DhcpInfo> {
    let mut info = DhcpInfo::default();
    let mut found = false;

    for line in output.lines() {
        let line = line.trim();

        if let Some(value) = line.strip_prefix("yiaddr =") {
            let value = value.trim();
            if !value.is_empty() && value != "0.0.0.0" {
                info.ip_address = Some(value.to_string());
                found = true;
            }
            continue;
        }

        let Some((name, value)) = option_line(line) else {
            continue;
        };

        match name {
            "server_identifier" => info.server_identifier = Some(value.to_string()),
            "subnet_mask" => info.subnet_mask = Some(value.to_string()),
            "router" => info.routers = list_values(value),
            "domain_name_server" => info.dns_servers = list_values(value),
            "domain_name" => info.domain_name = Some(value.to_string()),
            "lease_time" => info.lease_time_secs = parse_int(value),
            _ => continue,
        }
        found = true;
    }

    found.then_some(info)
}

/// Split `name (type): value`
fn option_line(line: &str) -> Option<(&str, &str)> {
    let (head, value) = line.split_once("):")?;
    let (name, _kind) = head.split_once('(')?;
    Some((name.trim(), value.trim()))
}

fn list_values(value: &str) -> Vec<String> {
    value
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_int(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GETPACKET: &str = "op = BOOTREPLY
htype = 1
flags = 0
hlen = 6
hops = 0
xid = 0x12345678
secs = 0
ciaddr = 0.0.0.0
yiaddr = 192.168.1.42
siaddr = 0.0.0.0
giaddr = 0.0.0.0
chaddr = a4:83:e7:12:34:56
sname =
file =
options:
Options count is 7
dhcp_message_type (uint8): ACK 0x5
server_identifier (ip): 192.168.1.1
lease_time (uint32): 0x15180
subnet_mask (ip): 255.255.255.0
router (ip_mult): {192.168.1.1}
domain_name_server (ip_mult): {192.168.1.1, 8.8.8.8}
domain_name (string): home
end (none):
";

    #[test]
    fn test_parse_getpacket() {
        let info = parse_dhcp_packet(GETPACKET).unwrap();
        assert_eq!(info.ip_address.as_deref(), Some("192.168.1.42"));
        assert_eq!(info.server_identifier.as_deref(), Some("192.168.1.1"));
        assert_eq!(info.subnet_mask.as_deref(), Some("255.255.255.0"));
        assert_eq!(info.routers, vec!["192.168.1.1"]);
        assert_eq!(info.dns_servers, vec!["192.168.1.1", "8.8.8.8"]);
        assert_eq!(info.domain_name.as_deref(), Some("home"));
        assert_eq!(info.lease_time_secs, Some(86_400));
    }

    #[test]
    fn test_no_lease() {
        assert!(parse_dhcp_packet("").is_none());
        assert!(parse_dhcp_packet("op = BOOTREPLY\nyiaddr = 0.0.0.0\n").is_none());
    }
}
