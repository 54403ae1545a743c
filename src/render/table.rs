//! Plain-text status table.
//!
//! Fixed columns (provider, status, limit, details) with widths computed
//! from content, two-space column separation, and a dashed separator under
//! the header. Colors attach after padding so alignment never depends on
//! escape codes.

use colored::Colorize;

use crate::core::models::{DisplayRow, GlobalSummary, HealthStatus, Urgency};

const HEADERS: [&str; 4] = ["PROVIDER", "STATUS", "LIMIT", "DETAILS"];
const COLUMN_GAP: &str = "  ";

fn column_widths(rows: &[DisplayRow]) -> [usize; 4] {
    let mut widths = [
        HEADERS[0].len(),
        HEADERS[1].len(),
        HEADERS[2].len(),
        HEADERS[3].len(),
    ];
    for row in rows {
        widths[0] = widths[0].max(row.provider_label.len());
        widths[1] = widths[1].max(row.urgency.as_str().len());
        widths[2] = widths[2].max(row.limit_label.len());
        widths[3] = widths[3].max(row.details.len());
    }
    widths
}

fn colorize_urgency(padded: &str, urgency: Urgency, no_color: bool) -> String {
    if no_color {
        return padded.to_string();
    }
    match urgency {
        Urgency::CanUse => padded.green().to_string(),
        Urgency::LowQuota => padded.yellow().to_string(),
        Urgency::WaitReset | Urgency::FetchFailed => padded.red().to_string(),
        Urgency::LoginRequired => padded.cyan().to_string(),
    }
}

fn colorize_summary(text: &str, status: HealthStatus, no_color: bool) -> String {
    if no_color {
        return text.to_string();
    }
    match status {
        HealthStatus::Healthy => text.green().to_string(),
        HealthStatus::Warning => text.yellow().to_string(),
        HealthStatus::Critical => text.red().to_string(),
    }
}

/// Render rows and the global summary as an aligned table.
#[must_use]
pub fn render_table(rows: &[DisplayRow], summary: &GlobalSummary, no_color: bool) -> String {
    let widths = column_widths(rows);
    let total_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);

    let mut out = String::new();

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    out.push_str(header.join(COLUMN_GAP).trim_end());
    out.push('\n');
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for row in rows {
        let status = colorize_urgency(
            &format!("{:<w$}", row.urgency.as_str(), w = widths[1]),
            row.urgency,
            no_color,
        );
        let line = format!(
            "{:<w0$}{gap}{status}{gap}{:<w2$}{gap}{}",
            row.provider_label,
            row.limit_label,
            row.details,
            w0 = widths[0],
            w2 = widths[2],
            gap = COLUMN_GAP,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push('\n');
    let summary_line = format!("{}: {}", summary_label(summary.status), summary.message);
    out.push_str(&colorize_summary(&summary_line, summary.status, no_color));
    out.push('\n');

    out
}

const fn summary_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "healthy",
        HealthStatus::Warning => "warning",
        HealthStatus::Critical => "critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<DisplayRow> {
        vec![
            DisplayRow {
                provider_label: "Claude".to_string(),
                urgency: Urgency::CanUse,
                limit_label: "7d".to_string(),
                details: "7d: 22% used (resets in 5d), 5h: 10% used (resets in 2h)".to_string(),
            },
            DisplayRow {
                provider_label: "Gemini (Pro)".to_string(),
                urgency: Urgency::LoginRequired,
                limit_label: "-".to_string(),
                details: "login required".to_string(),
            },
        ]
    }

    fn summary() -> GlobalSummary {
        GlobalSummary {
            status: HealthStatus::Healthy,
            message: "all providers within limits".to_string(),
        }
    }

    #[test]
    fn header_and_separator_present() {
        let output = render_table(&rows(), &summary(), true);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("PROVIDER"));
        assert!(lines[0].contains("STATUS"));
        assert!(lines[0].contains("DETAILS"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(!lines[1].is_empty());
    }

    #[test]
    fn columns_align_to_widest_cell() {
        let output = render_table(&rows(), &summary(), true);
        let lines: Vec<&str> = output.lines().collect();
        // "Gemini (Pro)" is the widest provider cell; both data lines start
        // their STATUS column at the same offset.
        let status_col = lines[2].find("CAN_USE").unwrap();
        let login_col = lines[3].find("LOGIN_REQUIRED").unwrap();
        assert_eq!(status_col, login_col);
        assert_eq!(status_col, "Gemini (Pro)".len() + COLUMN_GAP.len());
    }

    #[test]
    fn no_color_output_has_no_escapes() {
        let output = render_table(&rows(), &summary(), true);
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn summary_line_trails_the_table() {
        let output = render_table(&rows(), &summary(), true);
        assert!(output.trim_end().ends_with("healthy: all providers within limits"));
    }

    #[test]
    fn empty_rows_still_render_header_and_summary() {
        let output = render_table(&[], &summary(), true);
        assert!(output.starts_with("PROVIDER"));
        assert!(output.contains("healthy"));
    }
}
