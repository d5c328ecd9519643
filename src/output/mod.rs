//! Report rendering
//!
//! Text output is laid out here as sections and handed to a plain or
//! colored [`OutputFormatter`]; JSON output serializes the reports as-is.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, Line, OutputFormatter, PlainFormatter, Section, Tone};

use crate::{
    error::Result,
    health::ScoringConfig,
    models::{AnalysisReport, Config, InterfaceInfo, PingResult},
    types::StepStatus,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Renders analysis reports as text or JSON
pub struct ReportFormatter {
    formatter: Box<dyn OutputFormatter>,
    scoring: ScoringConfig,
    verbose: bool,
    json: bool,
}

impl ReportFormatter {
    /// Formatter matching the run's color, verbosity and JSON settings
    pub fn new(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            scoring: config.scoring.clone(),
            verbose: config.verbose,
            json: config.json_output,
        }
    }

    pub fn with_formatter(formatter: Box<dyn OutputFormatter>, scoring: ScoringConfig, verbose: bool) -> Self {
        Self {
            formatter,
            scoring,
            verbose,
            json: false,
        }
    }

    /// Render every report; JSON is one object for a single report and an
    /// array otherwise
    pub fn format_reports(&self, reports: &[AnalysisReport]) -> Result<String> {
        if self.json {
            return Self::format_json(reports);
        }

        Ok(reports
            .iter()
            .map(|report| self.format_report(report))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn format_json(reports: &[AnalysisReport]) -> Result<String> {
        let json = match reports {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        Ok(json)
    }

    /// Render one report as text
    pub fn format_report(&self, report: &AnalysisReport) -> String {
        let title = format!(
            "Network Health Report: {} ({})",
            report.interface.name, report.interface.hardware_port
        );

        let mut output = self.formatter.format_header(&title);
        output.push_str("\n\n");

        for section in self.sections(report).iter().filter(|s| !s.is_empty()) {
            output.push_str(&self.formatter.format_section(section));
            output.push('\n');
        }

        output.push_str(&self.formatter.format_health(&report.health));
        output
    }

    pub fn format_interfaces(&self, interfaces: &[InterfaceInfo]) -> String {
        self.formatter.format_interface_list(interfaces)
    }

    /// Lay a report out as titled sections; empty sections are dropped
    /// by the caller
    pub fn sections(&self, report: &AnalysisReport) -> Vec<Section> {
        let mut sections = vec![
            self.interface_section(report),
            self.traffic_section(report),
            self.wifi_section(report),
            self.network_section(report),
            self.latency_section(report),
        ];

        if report.public_ip.is_some() || report.geolocation.is_some() {
            sections.push(self.internet_section(report));
        }
        sections.push(self.throughput_section(report));
        if let Some(section) = self.dns_section(report) {
            sections.push(section);
        }
        if self.verbose {
            sections.push(self.steps_section(report));
        }

        sections
    }

    fn interface_section(&self, report: &AnalysisReport) -> Section {
        let interface = &report.interface;
        let mut section = Section::new("Interface");

        let status_tone = if interface.is_active() { Tone::Good } else { Tone::Bad };
        section.push(Line::plain("Device", &interface.name));
        section.push(Line::plain("Hardware Port", &interface.hardware_port));
        section.push(Line::new("Status", interface.status.to_string(), status_tone));
        section.push(Line::plain("MAC Address", &interface.mac_address));
        section.push(optional("IPv4 Address", interface.ipv4_address.as_deref()));
        section.push(optional("Netmask", interface.netmask.as_deref()));
        if !interface.ipv6_addresses.is_empty() {
            section.push(Line::plain("IPv6 Addresses", interface.ipv6_addresses.join(", ")));
        }
        if !interface.media_type.is_empty() {
            section.push(Line::plain("Media", &interface.media_type));
        }
        if interface.mtu > 0 {
            section.push(Line::plain("MTU", interface.mtu.to_string()));
        }
        section.push(Line::plain("Mode", report.mode.to_string()));
        if let Some(connectivity) = &report.connectivity {
            let tone = if connectivity.internet_available { Tone::Good } else { Tone::Warning };
            section.push(Line::new(
                "Connectivity",
                format!(
                    "internet {}, DNS {}, HTTP {}",
                    yes_no(connectivity.internet_available),
                    yes_no(connectivity.dns_working),
                    yes_no(connectivity.http_working)
                ),
                tone,
            ));
        }
        section.push(Line::muted("Timestamp", report.timestamp.to_rfc3339()));
        if report.interrupted {
            section.push(Line::new("Run", "interrupted, partial results", Tone::Warning));
        }

        section
    }

    fn traffic_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Traffic Counters");
        let Some(metrics) = &report.metrics else {
            return section;
        };

        section.push(Line::plain(
            "Packets",
            format!("{} in / {} out", metrics.packets_in, metrics.packets_out),
        ));
        section.push(Line::plain(
            "Bytes",
            format!("{} in / {} out", format_bytes(metrics.bytes_in), format_bytes(metrics.bytes_out)),
        ));
        section.push(Line::new(
            "Errors",
            format!(
                "{} in / {} out ({:.2}%)",
                metrics.errors_in,
                metrics.errors_out,
                metrics.error_rate()
            ),
            Tone::error_rate(metrics.error_rate(), &self.scoring),
        ));
        section.push(Line::plain("Collisions", metrics.collisions.to_string()));
        section.push(Line::plain(
            "Drops",
            format!("{} ({:.2}%)", metrics.drops, metrics.drop_rate),
        ));

        section
    }

    fn wifi_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Wi-Fi");
        let Some(wifi) = &report.wifi else {
            return section;
        };

        section.push(Line::plain("SSID", &wifi.ssid));
        section.push(Line::plain("BSSID", &wifi.bssid));
        let width = if wifi.channel_width > 0 {
            format!(", {} MHz", wifi.channel_width)
        } else {
            String::new()
        };
        section.push(Line::plain(
            "Channel",
            format!("{} ({}{})", wifi.channel, wifi.band(), width),
        ));
        section.push(Line::new(
            "RSSI",
            format!("{} dBm ({})", wifi.rssi, wifi.signal_quality()),
            Tone::rssi(wifi.rssi, &self.scoring),
        ));
        if wifi.has_noise_reading() {
            section.push(Line::plain("Noise", format!("{} dBm", wifi.noise)));
            section.push(Line::new(
                "SNR",
                format!("{} dB", wifi.snr),
                Tone::snr(wifi.snr, &self.scoring),
            ));
        }
        section.push(Line::plain("Tx Rate", format!("{} Mbps", wifi.tx_rate)));
        if let Some(mcs) = wifi.mcs_index {
            section.push(Line::plain("MCS Index", mcs.to_string()));
        }
        if !wifi.phy_mode.is_empty() {
            section.push(Line::plain("PHY Mode", &wifi.phy_mode));
        }
        if !wifi.security.is_empty() {
            section.push(Line::plain("Security", &wifi.security));
        }

        if !report.wifi_scan.is_empty() {
            section.push(Line::plain("Nearby Networks", report.wifi_scan.len().to_string()));
            if self.verbose {
                for network in &report.wifi_scan {
                    section.push(Line::new(
                        format!("  {}", network.ssid),
                        format!("ch {} {} dBm {}", network.channel, network.rssi, network.security),
                        Tone::rssi(network.rssi, &self.scoring),
                    ));
                }
            }
        }

        section
    }

    fn network_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Network Configuration");

        if let Some(routing) = &report.routing {
            section.push(optional("Default Gateway", routing.default_gateway.as_deref()));
            section.push(optional("Default Interface", routing.default_interface.as_deref()));
            if self.verbose {
                for route in &routing.routes {
                    section.push(Line::muted(
                        format!("  {}", route.destination),
                        format!("via {} {} {}", route.gateway, route.interface, route.flags),
                    ));
                }
            }
        }

        if let Some(dhcp) = &report.dhcp {
            section.push(optional("DHCP Server", dhcp.server_identifier.as_deref()));
            section.push(optional("Leased Address", dhcp.ip_address.as_deref()));
            if let Some(lease) = dhcp.lease_time_secs {
                section.push(Line::plain("Lease Time", format!("{} s", lease)));
            }
            if let Some(domain) = &dhcp.domain_name {
                section.push(Line::plain("Domain", domain));
            }
        }

        if !report.network_dns_servers.is_empty() {
            section.push(Line::plain("DNS Servers", report.network_dns_servers.join(", ")));
        }

        section
    }

    fn latency_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Latency");
        for ping in report.all_pings() {
            section.push(self.ping_line(&ping));
        }
        section
    }

    fn ping_line(&self, ping: &PingResult) -> Line {
        if ping.is_unreachable() {
            return Line::new(
                &ping.host,
                format!("unreachable ({:.0}% loss)", ping.packet_loss),
                Tone::Bad,
            );
        }

        let tone = Tone::latency(ping.avg_rtt, &self.scoring)
            .worst(Tone::jitter(ping.jitter(), &self.scoring))
            .worst(Tone::packet_loss(ping.packet_loss, &self.scoring));

        Line::new(
            &ping.host,
            format!(
                "avg {:.1} ms, jitter {:.1} ms, loss {:.1}%",
                ping.avg_rtt,
                ping.jitter(),
                ping.packet_loss
            ),
            tone,
        )
    }

    fn internet_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Internet");
        if let Some(public_ip) = &report.public_ip {
            section.push(Line::plain("Public IP", &public_ip.ip));
        }
        if let Some(geo) = &report.geolocation {
            let place = geo.place();
            if !place.is_empty() {
                section.push(Line::plain("Location", place));
            }
            if let Some(isp) = &geo.isp {
                section.push(Line::plain("ISP", isp));
            }
        }
        section
    }

    fn throughput_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Throughput");

        match &report.speed_test {
            Some(speed) => {
                section.push(Line::new(
                    "Download",
                    format_mbps(speed.download_mbps),
                    Tone::throughput(speed.download_mbps, &self.scoring),
                ));
                section.push(Line::new(
                    "Upload",
                    format_mbps(speed.upload_mbps),
                    Tone::throughput(speed.upload_mbps, &self.scoring),
                ));
                if speed.latency_ms > 0.0 {
                    section.push(Line::new(
                        "Idle Latency",
                        format!("{:.1} ms", speed.latency_ms),
                        Tone::latency(speed.latency_ms, &self.scoring),
                    ));
                }
                if speed.responsiveness > 0 {
                    section.push(Line::plain("Responsiveness", format!("{} RPM", speed.responsiveness)));
                }
            }
            None => section.push(Line::muted("Speed Test", "unavailable")),
        }

        if let Some(iperf) = &report.iperf {
            let label = format!("iperf3 {}", iperf.server);
            match &iperf.error {
                Some(error) => section.push(Line::new(label, format!("failed: {}", error), Tone::Bad)),
                None => {
                    section.push(Line::new(
                        format!("{} up", label),
                        format!("{} ({} retransmits)", format_mbps(iperf.upload_mbps), iperf.upload_retransmits),
                        Tone::throughput(iperf.upload_mbps, &self.scoring),
                    ));
                    match &iperf.download_error {
                        Some(error) => section.push(Line::new(
                            format!("{} down", label),
                            format!("failed: {}", error),
                            Tone::Warning,
                        )),
                        None => section.push(Line::new(
                            format!("{} down", label),
                            format!(
                                "{} ({} retransmits)",
                                format_mbps(iperf.download_mbps),
                                iperf.download_retransmits
                            ),
                            Tone::throughput(iperf.download_mbps, &self.scoring),
                        )),
                    }
                }
            }
        }

        section
    }

    fn dns_section(&self, report: &AnalysisReport) -> Option<Section> {
        let dns = report.dns_reliability.as_ref()?;
        let mut section = Section::new("DNS Reliability");

        section.push(Line::plain("Server", &dns.dns_server));
        let tone = if dns.total_queries == 0 {
            Tone::Muted
        } else {
            Tone::dns_success(dns.success_rate, &self.scoring)
        };
        section.push(Line::new(
            "Success",
            format!("{}/{} ({:.1}%)", dns.successful, dns.total_queries, dns.success_rate),
            tone,
        ));
        if let (Some(avg), Some(min), Some(max)) = (
            dns.avg_response_time_ms,
            dns.min_response_time_ms,
            dns.max_response_time_ms,
        ) {
            section.push(Line::plain(
                "Response Time",
                format!("avg {:.1} ms (min {:.0}, max {:.0})", avg, min, max),
            ));
        }
        if !dns.failures.is_empty() {
            let shown = if self.verbose {
                dns.failures.join(", ")
            } else {
                let mut head: Vec<&str> = dns.failures.iter().take(5).map(String::as_str).collect();
                if dns.failures.len() > head.len() {
                    head.push("...");
                }
                head.join(", ")
            };
            section.push(Line::new("Failed Domains", shown, Tone::Warning));
        }

        Some(section)
    }

    fn steps_section(&self, report: &AnalysisReport) -> Section {
        let mut section = Section::new("Steps");
        for step in &report.steps {
            let (status, tone) = match step.status {
                StepStatus::Completed => ("completed", Tone::Good),
                StepStatus::Unavailable => ("unavailable", Tone::Muted),
                StepStatus::Failed => ("failed", Tone::Bad),
                StepStatus::Skipped => ("skipped", Tone::Muted),
            };
            let mut value = format!("{} in {} ms", status, step.duration_ms);
            if let Some(detail) = &step.detail {
                value.push_str(&format!(": {}", detail));
            }
            section.push(Line::new(&step.name, value, tone));
        }
        section
    }
}

fn optional(label: &str, value: Option<&str>) -> Line {
    match value {
        Some(value) => Line::plain(label, value),
        None => Line::muted(label, "-"),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "ok"
    } else {
        "down"
    }
}

fn format_mbps(mbps: f64) -> String {
    if mbps <= 0.0 {
        "not measured".to_string()
    } else {
        format!("{:.1} Mbps", mbps)
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
