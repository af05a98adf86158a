pub mod dashboard;
pub mod skill_detail;
pub mod skills;

use chrono::DateTime;
use ratatui::style::Color;

use crate::models::Status;

pub fn status_color(status: Status) -> Color {
    match status {
        Status::ToLearn => Color::Gray,
        Status::InProgress => Color::Yellow,
        Status::Completed => Color::Green,
    }
}

pub fn status_marker(status: Status) -> &'static str {
    match status {
        Status::ToLearn => "[ ]",
        Status::InProgress => "[~]",
        Status::Completed => "[x]",
    }
}

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn hours(h: f64) -> String {
    if h.fract() == 0.0 {
        format!("{:.0}h", h)
    } else {
        format!("{:.1}h", h)
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn format_date(date_str: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        dt.format("%b %d").to_string()
    } else {
        date_str.chars().take(10).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_widths() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(hours(3.0), "3h");
        assert_eq!(hours(1.5), "1.5h");
    }

    #[test]
    fn format_date_falls_back_to_prefix() {
        assert_eq!(format_date("2026-03-04T10:00:00+00:00"), "Mar 04");
        assert_eq!(format_date("2026-03-04 10:00"), "2026-03-04");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("abcdef", 5), "ab...");
        assert_eq!(truncate("abc", 5), "abc");
    }
}
