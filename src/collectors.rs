//! Offline data collection
//!
//! Reads interface, counter, Wi-Fi, routing, DHCP and resolver state
//! from OS tools. Nothing here sends traffic beyond the local host.

use crate::error::ProbeError;
use crate::models::{DhcpInfo, DnsConfiguration, InterfaceInfo, NetworkMetrics, NetworkScan, RoutingInfo, WiFiInfo};
use crate::parsers::{
    parse_dhcp_packet, parse_dns_configuration, parse_hardware_ports, parse_ifconfig, parse_netstat,
    parse_routing_table, parse_wifi_info, parse_wifi_scan,
};
use crate::process::{CommandOutput, CommandRunner};
use std::sync::Arc;
use std::time::Duration;

/// Legacy Wi-Fi utility; newer macOS releases replaced it with `wdutil`
pub const AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

/// Runs the read-only OS tools and parses their output
#[derive(Clone)]
pub struct Collector {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
    scan_timeout: Duration,
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("timeout", &self.timeout)
            .field("scan_timeout", &self.scan_timeout)
            .finish_non_exhaustive()
    }
}

impl Collector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            timeout: crate::defaults::DEFAULT_COMMAND_TIMEOUT,
            scan_timeout: crate::defaults::DEFAULT_WIFI_SCAN_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, scan_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.scan_timeout = scan_timeout;
        self
    }

    /// Run a tool and require exit code 0
    async fn run_ok(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput, ProbeError> {
        let output = self.runner.run(program, args, timeout).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(ProbeError::failure(program, output.exit_code, output.stderr.trim()))
        }
    }

    /// Every hardware port with its ifconfig details filled in
    pub async fn get_all_interfaces(&self) -> Result<Vec<InterfaceInfo>, ProbeError> {
        let output = self
            .run_ok("networksetup", &["-listallhardwareports"], self.timeout)
            .await?;

        let mut interfaces = Vec::new();
        for port in parse_hardware_ports(&output.stdout) {
            let mut info = port.into_interface();
            // a device ifconfig cannot describe stays listed as inactive
            if let Ok(details) = self.get_interface_details(&info.name).await {
                details.apply_to(&mut info);
            }
            interfaces.push(info);
        }

        Ok(interfaces)
    }

    pub async fn get_interface_details(&self, interface: &str) -> Result<crate::parsers::IfconfigDetails, ProbeError> {
        let output = self.run_ok("ifconfig", &[interface], self.timeout).await?;
        parse_ifconfig(&output.stdout).ok_or_else(|| ProbeError::parse_miss("ifconfig", format!("no details for {}", interface)))
    }

    /// Cumulative packet, byte, error and drop counters
    pub async fn get_interface_metrics(&self, interface: &str) -> Result<NetworkMetrics, ProbeError> {
        let output = self
            .run_ok("netstat", &["-I", interface, "-b", "-d", "-n"], self.timeout)
            .await?;
        parse_netstat(&output.stdout, interface)
            .ok_or_else(|| ProbeError::parse_miss("netstat", format!("no counters row for {}", interface)))
    }

    /// Current association, from airport or wdutil.
    ///
    /// `Ok(None)` means the radio is off or the interface is not wireless.
    pub async fn get_wifi_info(&self) -> Result<Option<WiFiInfo>, ProbeError> {
        match self.run_ok(AIRPORT_PATH, &["-I"], self.timeout).await {
            Ok(output) => {
                if let Some(info) = parse_wifi_info(&output.stdout) {
                    return Ok(Some(info));
                }
            }
            Err(error) if !error.is_unavailable() => return Err(error),
            Err(_) => {}
        }

        let output = self.run_ok("wdutil", &["info"], self.timeout).await?;
        Ok(parse_wifi_info(&output.stdout))
    }

    /// Nearby access points, at most `limit`, in scan order
    pub async fn get_wifi_scan(&self, limit: usize) -> Result<Vec<NetworkScan>, ProbeError> {
        let output = self.run_ok(AIRPORT_PATH, &["-s"], self.scan_timeout).await?;
        let mut scans = parse_wifi_scan(&output.stdout);
        scans.truncate(limit);
        Ok(scans)
    }

    pub async fn get_routing_info(&self) -> Result<RoutingInfo, ProbeError> {
        let output = self.run_ok("netstat", &["-rn"], self.timeout).await?;
        Ok(parse_routing_table(&output.stdout))
    }

    /// Last DHCP lease; `Ok(None)` for statically configured interfaces
    pub async fn get_dhcp_info(&self, interface: &str) -> Result<Option<DhcpInfo>, ProbeError> {
        let output = self.runner.run("ipconfig", &["getpacket", interface], self.timeout).await?;
        // ipconfig exits non-zero when there is no lease
        Ok(parse_dhcp_packet(&output.stdout))
    }

    /// Resolver configuration from scutil, or resolv.conf where scutil is missing
    pub async fn get_dns_configuration(&self) -> Result<DnsConfiguration, ProbeError> {
        match self.run_ok("scutil", &["--dns"], self.timeout).await {
            Ok(output) => Ok(parse_dns_configuration(&output.stdout)),
            Err(error) if error.is_unavailable() => {
                let output = self.run_ok("cat", &["/etc/resolv.conf"], self.timeout).await?;
                Ok(parse_dns_configuration(&output.stdout))
            }
            Err(error) => Err(error),
        }
    }

}

/// Resolvers handed out by the network for `interface`.
///
/// Prefers the DHCP lease; falls back to the resolver configuration.
pub fn network_dns_servers(interface: &str, dhcp: Option<&DhcpInfo>, dns: Option<&DnsConfiguration>) -> Vec<String> {
    if let Some(servers) = dhcp.map(|d| &d.dns_servers).filter(|s| !s.is_empty()) {
        return servers.clone();
    }
    dns.map(|config| config.nameservers_for(interface)).unwrap_or_default()
}
