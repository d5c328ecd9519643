//! Routing table parsing for `netstat -rn` and `ip route`

use crate::models::{RouteEntry, RoutingInfo};
use std::net::Ipv4Addr;

/// Parse a routing table.
///
/// Table columns are located by the `Destination` header, so both the BSD
/// (`Netif`) and Linux (`Iface`, `Genmask`) layouts work. Lines in
/// `ip route` form (`default via X dev Y`) are accepted as well. The
/// default gateway is the first default route with an IPv4 gateway.
pub fn parse_routing_table(output: &str) -> RoutingInfo {
    let mut info = RoutingInfo::default();
    let mut columns: Option<Columns> = None;

    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if tokens[0] == "Destination" {
            columns = Columns::from_header(&tokens);
            continue;
        }

        let entry = if tokens.contains(&"dev") || tokens.contains(&"via") {
            ip_route_entry(&tokens)
        } else if let Some(columns) = &columns {
            columns.entry(&tokens)
        } else {
            None
        };

        if let Some(entry) = entry {
            info.routes.push(entry);
        }
    }

    let default_route = info
        .routes
        .iter()
        .filter(|r| is_default(&r.destination))
        .find(|r| r.gateway.parse::<Ipv4Addr>().is_ok());

    if let Some(route) = default_route {
        info.default_gateway = Some(route.gateway.clone());
        info.default_interface = Some(route.interface.clone()).filter(|i| !i.is_empty());
    }

    info
}

fn is_default(destination: &str) -> bool {
    matches!(destination, "default" | "0.0.0.0" | "0.0.0.0/0")
}

struct Columns {
    destination: usize,
    gateway: usize,
    flags: Option<usize>,
    interface: Option<usize>,
}

impl Columns {
    fn from_header(header: &[&str]) -> Option<Self> {
        let position = |names: &[&str]| header.iter().position(|h| names.contains(h));
        Some(Self {
            destination: position(&["Destination"])?,
            gateway: position(&["Gateway"])?,
            flags: position(&["Flags"]),
            interface: position(&["Netif", "Iface", "Interface"]),
        })
    }

    fn entry(&self, tokens: &[&str]) -> Option<RouteEntry> {
        let field = |index: Option<usize>| index.and_then(|i| tokens.get(i)).map(|s| s.to_string()).unwrap_or_default();
        Some(RouteEntry {
            destination: tokens.get(self.destination)?.to_string(),
            gateway: tokens.get(self.gateway)?.to_string(),
            flags: field(self.flags),
            interface: field(self.interface),
        })
    }
}

fn ip_route_entry(tokens: &[&str]) -> Option<RouteEntry> {
    let after = |label: &str| {
        tokens
            .iter()
            .position(|t| *t == label)
            .and_then(|i| tokens.get(i + 1))
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    Some(RouteEntry {
        destination: tokens.first()?.to_string(),
        gateway: after("via"),
        flags: String::new(),
        interface: after("dev"),
    })
}
