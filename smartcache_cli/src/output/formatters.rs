use super::{OutputFormatter, StatsReport};
use anyhow::Result;
use colored::*;

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn efficiency(&self, efficiency: u32) -> String {
        let text = format!("{efficiency}%");
        match efficiency {
            90.. => self.colorize(&text, |s| s.green()),
            85..=89 => self.colorize(&text, |s| s.yellow()),
            _ => self.colorize(&text, |s| s.red()),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        let stats = &report.stats;
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            self.colorize("Cache statistics", |s| s.bold())
        ));
        output.push_str(&format!("Snapshot: {}\n", report.snapshot.display()));
        output.push_str(&format!("Entries: {}\n", stats.total_entries));
        output.push_str(&format!(
            "Size: {} of {} ({} / {} bytes)\n",
            format_bytes(stats.total_size),
            format_bytes(stats.max_size),
            stats.total_size,
            stats.max_size
        ));
        output.push_str(&format!("Efficiency: {}\n", self.efficiency(stats.efficiency)));
        output.push_str(&format!("Saved: R{}\n", stats.total_savings));
        output.push_str(&format!(
            "Credits: {} of {} used\n",
            stats.credits_used, stats.credits_total
        ));

        output.push_str("\nBy type:\n");
        for counters in &report.counters {
            let name = self.colorize(counters.cache_type.as_str(), |s| s.cyan());
            output.push_str(&format!(
                "  {name}: {} hits, {} misses\n",
                counters.hits, counters.misses
            ));
        }

        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}
