//! Colored formatter implementation with terminal color support

use super::formatter::{
    column_widths, interface_row, pad, FormattingOptions, OutputFormatter, Section, Tone, INTERFACE_HEADERS,
};
use crate::models::{HealthCategory, HealthStatus, InterfaceInfo};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub good: Color,
    pub warning: Color,
    pub bad: Color,
    pub label: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            good: Color::Green,
            warning: Color::Yellow,
            bad: Color::Red,
            label: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    pub fn tone(&self, tone: Tone) -> Option<Color> {
        match tone {
            Tone::Good => Some(self.good),
            Tone::Warning => Some(self.warning),
            Tone::Bad => Some(self.bad),
            Tone::Muted => Some(self.muted),
            Tone::Neutral => None,
        }
    }

    pub fn category(&self, category: HealthCategory) -> Color {
        match category {
            HealthCategory::Excellent | HealthCategory::Good => self.good,
            HealthCategory::Fair => self.warning,
            HealthCategory::Poor => Color::Magenta,
            HealthCategory::Critical => self.bad,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn heading(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.color(self.color_scheme.header).bold()
        } else {
            text.normal()
        }
    }

    fn toned(&self, text: &str, tone: Tone) -> ColoredString {
        match self.color_scheme.tone(tone) {
            Some(color) => self.colorize(text, color),
            None => text.normal(),
        }
    }

    fn format_list(&self, title: &str, items: &[String], color: Color, marker: &str) -> String {
        let mut output = format!("{}\n", self.bold(&format!("{}:", title)));
        for item in items {
            output.push_str(&format!("  {} {}\n", self.colorize(marker, color), item));
        }
        output
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> String {
        let border = "=".repeat(title.len() + 4);
        format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.muted),
            self.heading(title),
            self.colorize(&border, self.color_scheme.muted)
        )
    }

    fn format_section(&self, section: &Section) -> String {
        let mut output = format!("{}\n", self.heading(&section.title));
        for line in &section.lines {
            let label = pad(&format!("{}:", line.label), self.options.label_width);
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize(&label, self.color_scheme.label),
                self.toned(&line.value, line.tone)
            ));
        }
        output
    }

    fn format_health(&self, health: &HealthStatus) -> String {
        let verdict = format!("{}/100 ({})", health.score, health.overall);
        let mut output = format!(
            "{} {}\n",
            self.bold("Health Score:"),
            self.colorize(&verdict, self.color_scheme.category(health.overall))
        );

        if !health.errors.is_empty() {
            output.push('\n');
            output.push_str(&self.format_list("Errors", &health.errors, self.color_scheme.bad, "x"));
        }
        if !health.warnings.is_empty() {
            output.push('\n');
            output.push_str(&self.format_list("Warnings", &health.warnings, self.color_scheme.warning, "!"));
        }
        output.push('\n');
        output.push_str(&self.format_list(
            "Recommendations",
            &health.recommendations,
            self.color_scheme.label,
            "-",
        ));
        output
    }

    fn format_interface_list(&self, interfaces: &[InterfaceInfo]) -> String {
        if interfaces.is_empty() {
            return format!("{}\n", self.colorize("No network interfaces found.", self.color_scheme.muted));
        }

        let rows: Vec<[String; 5]> = interfaces.iter().map(interface_row).collect();
        let widths = column_widths(&rows);

        let header: Vec<String> = INTERFACE_HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| self.bold(&pad(h, *w)).to_string())
            .collect();
        let mut output = format!("{}\n", header.join("  ").trim_end());

        for (interface, row) in interfaces.iter().zip(rows.iter()) {
            let status_tone = if interface.is_active() { Tone::Good } else { Tone::Muted };
            let cells: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .enumerate()
                .map(|(idx, (cell, width))| {
                    let padded = pad(cell, *width);
                    if idx == 2 {
                        self.toned(&padded, status_tone).to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            output.push_str(cells.join("  ").trim_end());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatter::Line;

    fn formatter(enable_color: bool) -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color,
            ..FormattingOptions::default()
        })
    }

    #[test]
    fn test_colors_disabled_renders_plain_text() {
        let mut section = Section::new("Wi-Fi");
        section.push(Line::new("RSSI", "-82 dBm (very weak)", Tone::Bad));

        let output = formatter(false).format_section(&section);
        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("-82 dBm (very weak)"));
    }

    #[test]
    fn test_bad_value_is_red() {
        colored::control::set_override(true);
        let mut section = Section::new("Wi-Fi");
        section.push(Line::new("RSSI", "-82 dBm", Tone::Bad));

        let output = formatter(true).format_section(&section);
        let expected = "-82 dBm".color(Color::Red).to_string();
        assert!(output.contains(&expected));
    }

    #[test]
    fn test_category_colors() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.category(HealthCategory::Excellent), Color::Green);
        assert_eq!(scheme.category(HealthCategory::Fair), Color::Yellow);
        assert_eq!(scheme.category(HealthCategory::Critical), Color::Red);
        assert_eq!(scheme.tone(Tone::Neutral), None);
    }

    #[test]
    fn test_health_markers() {
        let health = HealthStatus {
            overall: HealthCategory::Critical,
            score: 25,
            warnings: Vec::new(),
            errors: vec!["High latency to 1.1.1.1: 180.0 ms".to_string()],
            recommendations: vec!["Check for congestion".to_string()],
        };

        let output = formatter(false).format_health(&health);
        assert!(output.contains("25/100 (critical)"));
        assert!(output.contains("  x High latency"));
        assert!(output.contains("  - Check for congestion"));
    }
}
