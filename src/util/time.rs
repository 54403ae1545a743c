//! Time formatting utilities.

use chrono::{DateTime, Utc};

/// Format the span until a reset as the largest applicable units,
/// truncated down to minutes.
///
/// Rules: `"already reset"` when `target` is not strictly in the future;
/// otherwise include days if > 0, hours if > 0, and minutes if > 0 or when
/// days and hours are both zero. Examples: `"5m"`, `"2h 15m"`, `"1d"`,
/// `"1d 1h"`, `"5d 20h 39m"`.
#[must_use]
pub fn format_duration(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total_minutes = target.signed_duration_since(now).num_minutes();
    if total_minutes <= 0 && target <= now {
        return "already reset".to_string();
    }

    let days = total_minutes / 1440;
    let hours = (total_minutes % 1440) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || (days == 0 && hours == 0) {
        parts.push(format!("{minutes}m"));
    }

    parts.join(" ")
}
