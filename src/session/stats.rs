//! Per-session prompt counters, printed when the driver exits.

use crate::dispatch::DeliveryReport;
use crate::menu::KeyboardOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    /// Prompts handed to the connection.
    pub sent: usize,
    /// Prompts discarded because the connection was not ready.
    pub dropped: usize,
    pub mode_switches: usize,
    /// Keyboard requests that ended without usable text.
    pub keyboard_discards: usize,
}

impl SessionStats {
    pub fn record_delivery(&mut self, report: &DeliveryReport) {
        self.sent = self.sent.saturating_add(report.sent);
        self.dropped = self.dropped.saturating_add(report.dropped);
        self.mode_switches = self.mode_switches.saturating_add(report.mode_switches);
    }

    pub fn record_keyboard(&mut self, outcome: &KeyboardOutcome) {
        if *outcome == KeyboardOutcome::Discarded {
            self.keyboard_discards += 1;
        }
    }

    pub fn has_activity(&self) -> bool {
        self.sent > 0 || self.dropped > 0 || self.keyboard_discards > 0
    }
}

pub fn format_session_stats(stats: &SessionStats) -> String {
    if !stats.has_activity() {
        return String::new();
    }
    let mut lines = vec![
        "Session".to_string(),
        format_stat_line("Prompts sent", stats.sent),
        format_stat_line("Mode switches", stats.mode_switches),
    ];
    if stats.dropped > 0 {
        lines.push(format_stat_line("Dropped (offline)", stats.dropped));
    }
    if stats.keyboard_discards > 0 {
        lines.push(format_stat_line("Empty keyboard", stats.keyboard_discards));
    }
    lines.join("\n")
}

fn format_stat_line(label: &str, value: usize) -> String {
    format!("  {label:<18} {value}")
}
