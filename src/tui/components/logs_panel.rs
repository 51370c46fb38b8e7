//! Logs panel component
//!
//! Displays the most recent system log entries captured by the TUI log
//! layer, color-coded by severity. The panel does not own the entries: the
//! `LogBuffer` is shared with the logging system and read on every frame.

use super::formatters::truncate;
use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Logs panel state: only the minimum level shown
pub struct LogsPanel {
    pub min_level: LogLevel,
}

impl LogsPanel {
    /// Create a new logs panel showing INFO and above
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }

    /// Next verbosity, wrapping from TRACE back to ERROR
    pub fn cycle_level(&mut self) {
        self.min_level = match self.min_level {
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug => LogLevel::Trace,
            LogLevel::Trace => LogLevel::Error,
        };
    }

    /// Render the newest entries that fit, oldest at the top
    pub fn render(&self, f: &mut Frame, area: Rect, buffer: &LogBuffer, theme: &Theme) {
        let height = area.height.saturating_sub(2) as usize;
        let width = area.width.saturating_sub(2) as usize;
        let entries = buffer.recent(height, self.min_level);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                ListItem::new(truncate(&format_log_entry(entry), width))
                    .style(log_level_style(&entry.level, theme))
            })
            .collect();

        let title = format!(" System Logs [{}+] ", self.min_level.as_str());
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false))
                .title(title),
        );

        f.render_widget(list, area);
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a log entry for display
fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

/// Get color style for log level
fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.log_error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.log_warn),
        LogLevel::Info => Style::default().fg(theme.log_info),
        LogLevel::Debug => Style::default().fg(theme.log_debug),
        LogLevel::Trace => Style::default().fg(theme.log_trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn level_cycle_wraps() {
        let mut panel = LogsPanel::new();
        let mut seen = vec![panel.min_level];
        for _ in 0..5 {
            panel.cycle_level();
            seen.push(panel.min_level);
        }
        assert_eq!(
            seen,
            vec![
                LogLevel::Info,
                LogLevel::Debug,
                LogLevel::Trace,
                LogLevel::Error,
                LogLevel::Warn,
                LogLevel::Info
            ]
        );
    }

    #[test]
    fn entries_format_with_time_and_level() {
        let entry = LogEntry {
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            level: LogLevel::Warn,
            target: "marquee::pages".into(),
            message: "Failed to load".into(),
        };
        assert_eq!(format_log_entry(&entry), "[03:04:05] WARN  Failed to load");
    }
}
