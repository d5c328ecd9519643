//! Routing, DHCP and resolver configuration records

use serde::{Deserialize, Serialize};

/// One line of the routing table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub destination: String,
    pub gateway: String,
    pub flags: String,
    pub interface: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingInfo {
    pub default_gateway: Option<String>,
    pub default_interface: Option<String>,
    pub routes: Vec<RouteEntry>,
}

/// Lease details from the DHCP server's last reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpInfo {
    pub ip_address: Option<String>,
    pub server_identifier: Option<String>,
    pub subnet_mask: Option<String>,
    pub routers: Vec<String>,
    pub dns_servers: Vec<String>,
    pub domain_name: Option<String>,
    pub lease_time_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsResolverEntry {
    pub nameservers: Vec<String>,
    pub search_domains: Vec<String>,
    /// Interface the resolver is scoped to, if any
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsConfiguration {
    pub resolvers: Vec<DnsResolverEntry>,
}

impl DnsConfiguration {
    /// All nameservers, first occurrence order, no duplicates
    pub fn nameservers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for server in self.resolvers.iter().flat_map(|r| r.nameservers.iter()) {
            if !seen.contains(server) {
                seen.push(server.clone());
            }
        }
        seen
    }

    /// Nameservers handed out by the network, skipping local stub resolvers
    pub fn network_nameservers(&self) -> Vec<String> {
        self.nameservers()
            .into_iter()
            .filter(|s| !is_loopback(s))
            .collect()
    }

    /// Nameservers of resolvers scoped to `interface`, falling back to all
    /// network nameservers when none are scoped
    pub fn nameservers_for(&self, interface: &str) -> Vec<String> {
        let scoped: Vec<String> = self
            .resolvers
            .iter()
            .filter(|r| r.interface.as_deref() == Some(interface))
            .flat_map(|r| r.nameservers.iter().cloned())
            .filter(|s| !is_loopback(s))
            .collect();

        if scoped.is_empty() {
            self.network_nameservers()
        } else {
            scoped
        }
    }
}

fn is_loopback(address: &str) -> bool {
    address.starts_with("127.") || address == "::1"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DnsConfiguration {
        DnsConfiguration {
            resolvers: vec![
                DnsResolverEntry {
                    nameservers: vec!["127.0.0.53".to_string(), "192.168.1.1".to_string()],
                    search_domains: vec!["home".to_string()],
                    interface: None,
                },
                DnsResolverEntry {
                    nameservers: vec!["192.168.1.1".to_string(), "8.8.8.8".to_string()],
                    search_domains: Vec::new(),
                    interface: Some("en0".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_nameservers_are_deduplicated() {
        assert_eq!(config().nameservers(), vec!["127.0.0.53", "192.168.1.1", "8.8.8.8"]);
    }

    #[test]
    fn test_network_nameservers_skip_loopback() {
        assert_eq!(config().network_nameservers(), vec!["192.168.1.1", "8.8.8.8"]);
    }

    #[test]
    fn test_nameservers_for_interface() {
        assert_eq!(config().nameservers_for("en0"), vec!["192.168.1.1", "8.8.8.8"]);
        assert_eq!(config().nameservers_for("en7"), vec!["192.168.1.1", "8.8.8.8"]);
    }
}
