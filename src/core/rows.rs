//! Display row construction.
//!
//! Turns classified per-provider results into table rows: one row per
//! provider, or one per quota track for providers exposing independent
//! per-model buckets. Window lines are ordered most-constraining-first
//! (higher used percent, then sooner reset) and the row's urgency and
//! limit label come from the most-constraining window.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::models::{
    ClassifiedWindows, DisplayRow, ModelQuota, ProviderResult, QuotaData, ReasonCode, ResultStatus,
    SimpleQuota, SlottedWindow, UsageData, Urgency,
};
use super::provider::Provider;
use crate::util::format::{clamp_percent, format_percent};
use crate::util::time::format_duration;

/// Placeholder limit label for rows without usable data.
const NO_LIMIT_LABEL: &str = "-";

/// Urgency from a clamped usage percentage.
fn urgency_for_percent(used_percent: f64) -> Urgency {
    let used = clamp_percent(used_percent);
    if used >= 100.0 {
        Urgency::WaitReset
    } else if used >= 80.0 {
        Urgency::LowQuota
    } else {
        Urgency::CanUse
    }
}

/// One formatted quota line: `"<pct>% used (resets in <dur>)"`.
fn quota_line(used_percent: f64, resets_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match resets_at {
        Some(at) => format!(
            "{} used (resets in {})",
            format_percent(used_percent),
            format_duration(at, now)
        ),
        None => format!("{} used", format_percent(used_percent)),
    }
}

/// Present windows ordered most-constraining-first.
///
/// Higher clamped usage sorts first; equal usage breaks toward the sooner
/// reset; the sort is stable so equal windows keep slot order.
fn ordered_windows(windows: &ClassifiedWindows) -> Vec<&SlottedWindow> {
    let mut present: Vec<&SlottedWindow> = windows.iter().collect();
    present.sort_by(|a, b| {
        clamp_percent(b.used_percent)
            .partial_cmp(&clamp_percent(a.used_percent))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.resets_at.cmp(&b.resets_at))
    });
    present
}

fn windowed_row(provider: Provider, windows: &ClassifiedWindows, now: DateTime<Utc>) -> DisplayRow {
    let ordered = ordered_windows(windows);

    let Some(top) = ordered.first() else {
        return DisplayRow {
            provider_label: provider.display_name().to_string(),
            urgency: Urgency::CanUse,
            limit_label: NO_LIMIT_LABEL.to_string(),
            details: "no data".to_string(),
        };
    };

    let details = ordered
        .iter()
        .map(|w| {
            format!(
                "{}: {}",
                w.slot.label(),
                quota_line(w.used_percent, Some(w.resets_at), now)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    DisplayRow {
        provider_label: provider.display_name().to_string(),
        urgency: urgency_for_percent(top.used_percent),
        limit_label: top.slot.label().to_string(),
        details,
    }
}

fn simple_row(provider: Provider, quota: &SimpleQuota, now: DateTime<Utc>) -> DisplayRow {
    DisplayRow {
        provider_label: provider.display_name().to_string(),
        urgency: urgency_for_percent(quota.used_percent),
        limit_label: "quota".to_string(),
        details: quota_line(quota.used_percent, quota.resets_at, now),
    }
}

/// Normalize a model id to its display track.
///
/// Family prefix match, so new vendor model ids are recognized without a
/// code change; only an unrecognized family keeps the raw id as its label.
fn track_label(model_id: &str) -> String {
    let lower = model_id.to_lowercase();
    if lower.contains("pro") {
        "Pro".to_string()
    } else if lower.contains("flash") {
        "Flash".to_string()
    } else {
        model_id.to_string()
    }
}

/// Fixed track ordering: Pro, Flash, then everything else by name.
fn track_priority(label: &str) -> (u8, String) {
    match label {
        "Pro" => (0, String::new()),
        "Flash" => (1, String::new()),
        other => (2, other.to_string()),
    }
}

fn per_model_rows(
    provider: Provider,
    models: &BTreeMap<String, ModelQuota>,
    now: DateTime<Utc>,
) -> Vec<DisplayRow> {
    // Dedupe by track label, first occurrence (in model-id order) wins.
    let mut tracks: Vec<(String, &ModelQuota)> = Vec::new();
    for (model_id, quota) in models {
        let label = track_label(model_id);
        if !tracks.iter().any(|(existing, _)| *existing == label) {
            tracks.push((label, quota));
        }
    }
    tracks.sort_by_key(|(label, _)| track_priority(label));

    tracks
        .into_iter()
        .map(|(label, quota)| DisplayRow {
            provider_label: format!("{} ({label})", provider.display_name()),
            urgency: urgency_for_percent(quota.used_percent),
            limit_label: "daily".to_string(),
            details: quota_line(quota.used_percent, quota.resets_at, now),
        })
        .collect()
}

fn failure_row(provider: Provider, result: &ProviderResult) -> DisplayRow {
    let login_required = matches!(
        result.reason,
        Some(ReasonCode::NoCredentials | ReasonCode::AuthFailed)
    );

    let (urgency, details) = if login_required {
        (Urgency::LoginRequired, "login required".to_string())
    } else if let Some(reason) = result.reason {
        (Urgency::FetchFailed, format!("fetch failed ({})", reason.as_str()))
    } else {
        // Affirmative "nothing found" without a reason.
        (Urgency::FetchFailed, "no data".to_string())
    };

    DisplayRow {
        provider_label: provider.display_name().to_string(),
        urgency,
        limit_label: NO_LIMIT_LABEL.to_string(),
        details,
    }
}

/// Build the display rows for one provider result.
pub fn build_row(provider: Provider, result: &ProviderResult, now: DateTime<Utc>) -> Vec<DisplayRow> {
    if result.status != ResultStatus::Ok {
        return vec![failure_row(provider, result)];
    }

    match result.data.as_ref().map(|d| &d.quota) {
        Some(QuotaData::Windowed(windows)) => vec![windowed_row(provider, windows, now)],
        Some(QuotaData::Simple(quota)) => vec![simple_row(provider, quota, now)],
        Some(QuotaData::PerModel { models }) => per_model_rows(provider, models, now),
        None => vec![failure_row(provider, result)],
    }
}

/// Build rows for all requested providers, in request order.
#[must_use]
pub fn build_rows(
    results: &BTreeMap<Provider, ProviderResult>,
    providers: &[Provider],
    now: DateTime<Utc>,
) -> Vec<DisplayRow> {
    providers
        .iter()
        .filter_map(|provider| results.get(provider).map(|r| (provider, r)))
        .flat_map(|(provider, result)| build_row(*provider, result, now))
        .collect()
}

/// Human-readable one-line summary of a successful fetch, used as the
/// result's `display` field. Matches the row details text.
#[must_use]
pub fn ok_display(data: &UsageData, now: DateTime<Utc>) -> String {
    match &data.quota {
        QuotaData::Windowed(windows) => {
            let ordered = ordered_windows(windows);
            if ordered.is_empty() {
                "no data".to_string()
            } else {
                ordered
                    .iter()
                    .map(|w| {
                        format!(
                            "{}: {}",
                            w.slot.label(),
                            quota_line(w.used_percent, Some(w.resets_at), now)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        QuotaData::Simple(quota) => quota_line(quota.used_percent, quota.resets_at, now),
        QuotaData::PerModel { models } => {
            if models.is_empty() {
                "no data".to_string()
            } else {
                let mut tracks: Vec<(String, &ModelQuota)> = Vec::new();
                for (model_id, quota) in models {
                    let label = track_label(model_id);
                    if !tracks.iter().any(|(existing, _)| *existing == label) {
                        tracks.push((label, quota));
                    }
                }
                tracks.sort_by_key(|(label, _)| track_priority(label));
                tracks
                    .into_iter()
                    .map(|(label, quota)| {
                        format!("{label}: {}", quota_line(quota.used_percent, quota.resets_at, now))
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    }
}
