//! Core formatting traits and the plain text implementation
//!
//! A report is laid out once as [`Section`]s of labelled [`Line`]s; each
//! formatter only decides how a section, the verdict and the interface
//! list look on screen.

use crate::health::ScoringConfig;
use crate::models::{HealthStatus, InterfaceInfo};

/// Severity of a displayed value, mirroring the scorer's bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warning,
    Bad,
    Neutral,
    Muted,
}

impl Tone {
    /// Higher is worse, e.g. latency
    fn rising(value: f64, warning: f64, error: f64) -> Self {
        if value >= error {
            Self::Bad
        } else if value >= warning {
            Self::Warning
        } else {
            Self::Good
        }
    }

    /// Lower is worse, e.g. throughput
    fn falling(value: f64, warning: f64, error: f64) -> Self {
        if value < error {
            Self::Bad
        } else if value < warning {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub fn latency(ms: f64, bands: &ScoringConfig) -> Self {
        Self::rising(ms, bands.latency_warning_ms, bands.latency_error_ms)
    }

    pub fn jitter(ms: f64, bands: &ScoringConfig) -> Self {
        Self::rising(ms, bands.jitter_warning_ms, bands.jitter_error_ms)
    }

    pub fn packet_loss(pct: f64, bands: &ScoringConfig) -> Self {
        if pct >= bands.packet_loss_error_pct {
            Self::Bad
        } else if pct > 0.0 {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub fn error_rate(pct: f64, bands: &ScoringConfig) -> Self {
        Self::rising(pct, bands.error_rate_warning_pct, bands.error_rate_error_pct)
    }

    pub fn rssi(dbm: i32, bands: &ScoringConfig) -> Self {
        if dbm < bands.rssi_error_dbm {
            Self::Bad
        } else if dbm <= bands.rssi_warning_dbm {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub fn snr(db: i32, bands: &ScoringConfig) -> Self {
        if db < bands.snr_error_db {
            Self::Bad
        } else if db <= bands.snr_warning_db {
            Self::Warning
        } else {
            Self::Good
        }
    }

    /// A direction reporting 0 was not measured
    pub fn throughput(mbps: f64, bands: &ScoringConfig) -> Self {
        if mbps <= 0.0 {
            Self::Muted
        } else {
            Self::falling(mbps, bands.throughput_warning_mbps, bands.throughput_error_mbps)
        }
    }

    pub fn dns_success(pct: f64, bands: &ScoringConfig) -> Self {
        Self::falling(pct, bands.dns_success_warning_pct, bands.dns_success_error_pct)
    }

    /// The worse of two tones
    pub fn worst(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Muted => 0,
            Self::Neutral => 1,
            Self::Good => 2,
            Self::Warning => 3,
            Self::Bad => 4,
        }
    }
}

/// One `label: value` row
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl Line {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tone,
        }
    }

    pub fn plain(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, Tone::Neutral)
    }

    pub fn muted(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, Tone::Muted)
    }
}

/// Titled group of lines
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format the banner above a report
    fn format_header(&self, title: &str) -> String;

    /// Format one report section
    fn format_section(&self, section: &Section) -> String;

    /// Format the score, findings and recommendations
    fn format_health(&self, health: &HealthStatus) -> String;

    /// Format the `--list` table
    fn format_interface_list(&self, interfaces: &[InterfaceInfo]) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Include step timings, routes and scan results
    pub verbose_mode: bool,
    /// Column width reserved for labels
    pub label_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            label_width: 20,
        }
    }
}

pub(crate) fn interface_row(interface: &InterfaceInfo) -> [String; 5] {
    [
        interface.name.clone(),
        interface.hardware_port.clone(),
        interface.status.to_string(),
        interface.ipv4_address.clone().unwrap_or_else(|| "-".to_string()),
        interface.mac_address.clone(),
    ]
}

pub(crate) const INTERFACE_HEADERS: [&str; 5] = ["Device", "Hardware Port", "Status", "IPv4", "MAC"];

pub(crate) fn column_widths(rows: &[[String; 5]]) -> [usize; 5] {
    let mut widths = INTERFACE_HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

pub(crate) fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn format_list(title: &str, items: &[String]) -> String {
        let mut output = format!("{}:\n", title);
        for item in items {
            output.push_str(&format!("  - {}\n", item));
        }
        output
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> String {
        let border = "=".repeat(title.len() + 4);
        format!("{}\n  {}  \n{}", border, title, border)
    }

    fn format_section(&self, section: &Section) -> String {
        let mut output = format!("{}\n{}\n", section.title, "-".repeat(section.title.len()));
        for line in &section.lines {
            let label = format!("{}:", line.label);
            output.push_str(&format!("  {} {}\n", pad(&label, self.options.label_width), line.value));
        }
        output
    }

    fn format_health(&self, health: &HealthStatus) -> String {
        let mut output = format!("Health Score: {}/100 ({})\n", health.score, health.overall);
        if !health.errors.is_empty() {
            output.push('\n');
            output.push_str(&Self::format_list("Errors", &health.errors));
        }
        if !health.warnings.is_empty() {
            output.push('\n');
            output.push_str(&Self::format_list("Warnings", &health.warnings));
        }
        output.push('\n');
        output.push_str(&Self::format_list("Recommendations", &health.recommendations));
        output
    }

    fn format_interface_list(&self, interfaces: &[InterfaceInfo]) -> String {
        if interfaces.is_empty() {
            return "No network interfaces found.\n".to_string();
        }

        let rows: Vec<[String; 5]> = interfaces.iter().map(interface_row).collect();
        let widths = column_widths(&rows);

        let mut output = String::new();
        let header: Vec<String> = INTERFACE_HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| pad(h, *w))
            .collect();
        output.push_str(header.join("  ").trim_end());
        output.push('\n');
        for row in &rows {
            let cells: Vec<String> = row.iter().zip(widths.iter()).map(|(c, w)| pad(c, *w)).collect();
            output.push_str(cells.join("  ").trim_end());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthCategory, InterfaceStatus};

    #[test]
    fn test_tones_follow_scoring_bands() {
        let bands = ScoringConfig::default();
        assert_eq!(Tone::latency(20.0, &bands), Tone::Good);
        assert_eq!(Tone::latency(50.0, &bands), Tone::Warning);
        assert_eq!(Tone::latency(100.0, &bands), Tone::Bad);
        assert_eq!(Tone::packet_loss(0.0, &bands), Tone::Good);
        assert_eq!(Tone::packet_loss(0.5, &bands), Tone::Warning);
        assert_eq!(Tone::packet_loss(1.0, &bands), Tone::Bad);
        assert_eq!(Tone::rssi(-69, &bands), Tone::Good);
        assert_eq!(Tone::rssi(-70, &bands), Tone::Warning);
        assert_eq!(Tone::rssi(-81, &bands), Tone::Bad);
        assert_eq!(Tone::snr(31, &bands), Tone::Good);
        assert_eq!(Tone::snr(14, &bands), Tone::Bad);
        assert_eq!(Tone::throughput(0.0, &bands), Tone::Muted);
        assert_eq!(Tone::throughput(30.0, &bands), Tone::Warning);
        assert_eq!(Tone::throughput(5.0, &bands), Tone::Bad);
        assert_eq!(Tone::dns_success(100.0, &bands), Tone::Good);
        assert_eq!(Tone::dns_success(95.0, &bands), Tone::Warning);
        assert_eq!(Tone::dns_success(80.0, &bands), Tone::Bad);
    }

    #[test]
    fn test_worst_tone() {
        assert_eq!(Tone::Good.worst(Tone::Bad), Tone::Bad);
        assert_eq!(Tone::Warning.worst(Tone::Good), Tone::Warning);
        assert_eq!(Tone::Muted.worst(Tone::Neutral), Tone::Neutral);
    }

    #[test]
    fn test_plain_section() {
        let formatter = PlainFormatter::new(FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        });
        let mut section = Section::new("Latency");
        section.push(Line::new("8.8.8.8", "12.3 ms", Tone::Good));

        let output = formatter.format_section(&section);
        assert!(output.starts_with("Latency\n-------\n"));
        assert!(output.contains("  8.8.8.8:"));
        assert!(output.contains("12.3 ms"));
    }

    #[test]
    fn test_plain_health() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let health = HealthStatus {
            overall: HealthCategory::Good,
            score: 85,
            warnings: vec!["Elevated latency to 8.8.8.8: 60.0 ms".to_string()],
            errors: Vec::new(),
            recommendations: vec!["Pause large transfers".to_string()],
        };

        let output = formatter.format_health(&health);
        assert!(output.contains("Health Score: 85/100 (good)"));
        assert!(output.contains("Warnings:\n  - Elevated latency"));
        assert!(!output.contains("Errors:"));
        assert!(output.contains("Recommendations:\n  - Pause large transfers"));
    }

    #[test]
    fn test_plain_interface_list() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let mut wifi = InterfaceInfo::new("en0", "Wi-Fi", "a4:83:e7:12:34:56");
        wifi.status = InterfaceStatus::Active;
        wifi.ipv4_address = Some("192.168.1.20".to_string());
        let wired = InterfaceInfo::new("en5", "USB 10/100/1000 LAN", "9e:3c:1a:00:11:22");

        let output = formatter.format_interface_list(&[wifi, wired]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Device"));
        assert!(lines[1].contains("192.168.1.20"));
        assert!(lines[2].contains("inactive"));
        assert!(lines[2].contains(" - "));

        assert_eq!(formatter.format_interface_list(&[]), "No network interfaces found.\n");
    }
}
