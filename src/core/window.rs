//! Rate-limit window normalization and slot classification.
//!
//! Vendors ship the same logical window under different field spellings
//! (camelCase vs snake_case, relative vs absolute reset times). Each
//! logical attribute is resolved against a static priority table,
//! first-present-wins, so a new vendor spelling is a one-line table edit.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::models::{ClassifiedWindows, RateWindow, SlottedWindow, WindowSlot};

/// Accepted spellings for the used-percentage attribute, in priority order.
const USED_PERCENT_FIELDS: &[&str] = &["used_percent", "usedPercent", "utilization"];

/// Accepted spellings for the window duration in minutes.
const WINDOW_MINUTES_FIELDS: &[&str] = &["window_minutes", "windowMinutes", "window_duration_mins"];

/// Accepted spellings for the absolute reset time (epoch seconds).
const RESETS_AT_FIELDS: &[&str] = &["resets_at", "resetsAt"];

/// Accepted spellings for the relative reset time (seconds from now).
const RESETS_IN_SECONDS_FIELDS: &[&str] = &["resets_in_seconds", "resetsInSeconds"];

/// Windows of at least this duration classify as the long slot.
const LONG_WINDOW_MIN_MINUTES: i64 = 1440;

/// First finite number found under any of the given keys.
fn first_finite(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .filter_map(Value::as_f64)
        .find(|n| n.is_finite())
}

/// Normalize one vendor-shaped window into a [`RateWindow`].
///
/// Returns `None` when no finite percentage is present under any accepted
/// spelling; an unusable window is "nothing to report", not an error.
/// The reset time resolves in order: absolute epoch seconds, relative
/// seconds from `now`, then `now + window_minutes` when the duration is
/// known. Percentages are not clamped here.
#[must_use]
pub fn normalize(raw: &Value, now: DateTime<Utc>) -> Option<RateWindow> {
    let used_percent = first_finite(raw, USED_PERCENT_FIELDS)?;

    let window_minutes = first_finite(raw, WINDOW_MINUTES_FIELDS).map(|m| m as i64);

    let resets_at = first_finite(raw, RESETS_AT_FIELDS)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0))
        .or_else(|| {
            first_finite(raw, RESETS_IN_SECONDS_FIELDS).map(|secs| now + Duration::seconds(secs as i64))
        })
        .or_else(|| window_minutes.map(|mins| now + Duration::minutes(mins)));

    Some(RateWindow {
        used_percent,
        window_minutes,
        resets_at,
    })
}

/// Assign a slot to the window.
fn slotted(window: &RateWindow, slot: WindowSlot) -> Option<SlottedWindow> {
    window.resets_at.map(|resets_at| SlottedWindow {
        slot,
        used_percent: window.used_percent,
        window_minutes: window.window_minutes,
        resets_at,
    })
}

/// A window is usable only when its reset time resolved.
fn usable(window: Option<&RateWindow>) -> Option<&RateWindow> {
    window.filter(|w| w.resets_at.is_some())
}

/// Classify up to two normalized windows into short/long slots.
///
/// When both durations are known the smaller one is short, regardless of
/// source position (ties keep the primary short). When a duration is
/// missing the assignment falls back to position: primary short, secondary
/// long. A lone window is long only when its duration reaches 24 hours.
/// Windows without a resolvable reset time are excluded entirely.
#[must_use]
pub fn classify(
    primary: Option<&RateWindow>,
    secondary: Option<&RateWindow>,
) -> ClassifiedWindows {
    let primary = usable(primary);
    let secondary = usable(secondary);

    match (primary, secondary) {
        (Some(first), Some(second)) => {
            let swap = match (first.window_minutes, second.window_minutes) {
                (Some(a), Some(b)) => b < a,
                // Positional fallback: the first-listed window is assumed
                // to be the shorter one.
                _ => false,
            };
            let (short, long) = if swap { (second, first) } else { (first, second) };
            ClassifiedWindows {
                short: slotted(short, WindowSlot::Short),
                long: slotted(long, WindowSlot::Long),
            }
        }
        (Some(only), None) | (None, Some(only)) => {
            let is_long = only
                .window_minutes
                .is_some_and(|mins| mins >= LONG_WINDOW_MIN_MINUTES);
            if is_long {
                ClassifiedWindows {
                    short: None,
                    long: slotted(only, WindowSlot::Long),
                }
            } else {
                ClassifiedWindows {
                    short: slotted(only, WindowSlot::Short),
                    long: None,
                }
            }
        }
        (None, None) => ClassifiedWindows::default(),
    }
}
