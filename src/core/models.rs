//! Core data models for quota status reporting.
//!
//! These types form the normalized shape every vendor response is reduced
//! to: rate windows, classified slots, per-provider results, display rows,
//! and the global summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Rate Window
// =============================================================================

/// A normalized rate-limit window.
///
/// # Fields
/// - `used_percent`: Percentage of the window consumed. Not clamped here;
///   clamping to 0-100 happens at display time so out-of-range vendor
///   values stay observable to intermediate consumers.
/// - `window_minutes`: Duration of the window in minutes (if known).
/// - `resets_at`: When the window resets (if resolvable).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
    pub used_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_minutes: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
}

impl RateWindow {
    /// Create a new rate window with the given usage percentage.
    #[must_use]
    pub const fn new(used_percent: f64) -> Self {
        Self {
            used_percent,
            window_minutes: None,
            resets_at: None,
        }
    }
}

// =============================================================================
// Window Slots
// =============================================================================

/// Semantic role a window is assigned after classification, independent of
/// which vendor field it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSlot {
    /// The short accounting period (typically a 5-hour rolling window).
    Short,
    /// The long accounting period (typically a 7-day rolling window).
    Long,
}

impl WindowSlot {
    /// Label used in details lines ("5h" / "7d").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "5h",
            Self::Long => "7d",
        }
    }
}

/// A window that has been assigned to a slot.
///
/// Invariant: `resets_at` is always resolvable here; windows without a
/// reset time are excluded during classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlottedWindow {
    pub slot: WindowSlot,
    pub used_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_minutes: Option<i64>,

    pub resets_at: DateTime<Utc>,
}

/// Classification result: at most one window per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedWindows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<SlottedWindow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<SlottedWindow>,
}

impl ClassifiedWindows {
    /// Whether no window was usable. Callers treat this as "no
    /// time-windowed quota data available", not an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// Present windows in slot order (short, then long).
    pub fn iter(&self) -> impl Iterator<Item = &SlottedWindow> {
        self.short.iter().chain(self.long.iter())
    }
}

// =============================================================================
// Quota Data
// =============================================================================

/// A quota bucket tracked per model (Gemini-style).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelQuota {
    pub used_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
}

/// A single percent-remaining quota with one reset date (Copilot-style).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleQuota {
    pub used_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
}

/// The quota shapes the supported providers expose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuotaData {
    /// Time-windowed quota with short/long slots (Claude, Codex).
    Windowed(ClassifiedWindows),
    /// Single percent-remaining quota (Copilot).
    Simple(SimpleQuota),
    /// Independent per-model quota buckets (Gemini).
    PerModel { models: BTreeMap<String, ModelQuota> },
}

impl QuotaData {
    /// Maximum clamped usage percentage across all buckets, if any bucket
    /// is present. This feeds the global summary directly; display strings
    /// are never re-parsed.
    #[must_use]
    pub fn max_used_percent(&self) -> Option<f64> {
        let percents: Vec<f64> = match self {
            Self::Windowed(windows) => windows.iter().map(|w| w.used_percent).collect(),
            Self::Simple(quota) => vec![quota.used_percent],
            Self::PerModel { models } => models.values().map(|q| q.used_percent).collect(),
        };

        percents
            .into_iter()
            .map(|p| p.clamp(0.0, 100.0))
            .fold(None, |acc, p| Some(acc.map_or(p, |a: f64| a.max(p))))
    }
}

/// Identity information recovered from a credential file or token payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

/// Successful fetch payload: quota data plus optional identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageData {
    pub quota: QuotaData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<AccountIdentity>,
}

impl UsageData {
    /// Wrap quota data without identity.
    #[must_use]
    pub const fn new(quota: QuotaData) -> Self {
        Self {
            quota,
            identity: None,
        }
    }
}

// =============================================================================
// Reason Codes
// =============================================================================

/// Closed classification of why a fetch did not return usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    NoCredentials,
    TokenExpired,
    AuthFailed,
    NetworkError,
    Timeout,
    ParseError,
    EndpointChanged,
    ApiError,
    Unknown,
}

impl ReasonCode {
    /// Stable snake_case identifier, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCredentials => "no_credentials",
            Self::TokenExpired => "token_expired",
            Self::AuthFailed => "auth_failed",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::ParseError => "parse_error",
            Self::EndpointChanged => "endpoint_changed",
            Self::ApiError => "api_error",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this reason represents a routine "not logged in" condition
    /// rather than a failure worth alarming on.
    #[must_use]
    pub const fn is_routine(self) -> bool {
        matches!(self, Self::NoCredentials | Self::TokenExpired)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Provider Result
// =============================================================================

/// Outcome status of a per-provider fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    Ok,
    NoData,
    Error,
}

/// Classified outcome for one provider.
///
/// Invariants (upheld by the constructors):
/// - `status == Ok` implies `data` is present and `reason` is absent.
/// - `status != Ok` implies `data` is absent.
/// - `display` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    pub status: ResultStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UsageData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,

    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    pub display: String,
}

impl ProviderResult {
    /// Successful result carrying usage data.
    #[must_use]
    pub fn ok(data: UsageData, display: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Ok,
            data: Some(data),
            reason: None,
            error_message: None,
            display: display.into(),
        }
    }

    /// Routine "nothing to report" result.
    #[must_use]
    pub fn no_data(reason: Option<ReasonCode>) -> Self {
        let display = reason.map_or_else(
            || "no data".to_string(),
            |r| format!("no data ({})", r.as_str()),
        );
        Self {
            status: ResultStatus::NoData,
            data: None,
            reason,
            error_message: None,
            display,
        }
    }

    /// Hard failure with a reason and the underlying message preserved for
    /// diagnosis.
    #[must_use]
    pub fn error(reason: ReasonCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let display = format!("error ({}): {message}", reason.as_str());
        Self {
            status: ResultStatus::Error,
            data: None,
            reason: Some(reason),
            error_message: Some(message),
            display,
        }
    }

    /// Whether this result is a hard failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ResultStatus::Error
    }
}

// =============================================================================
// Display Rows
// =============================================================================

/// User-facing verdict derived from usage percentage and fetch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    CanUse,
    LowQuota,
    WaitReset,
    LoginRequired,
    FetchFailed,
}

impl Urgency {
    /// Stable identifier, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CanUse => "CAN_USE",
            Self::LowQuota => "LOW_QUOTA",
            Self::WaitReset => "WAIT_RESET",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::FetchFailed => "FETCH_FAILED",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the status table. A provider may yield multiple rows when it
/// exposes independent per-model quota tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub provider_label: String,
    pub urgency: Urgency,
    pub limit_label: String,
    pub details: String,
}

// =============================================================================
// Global Summary
// =============================================================================

/// Overall health verdict across all requested providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// Global health verdict plus a one-line message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    pub status: HealthStatus,
    pub message: String,
}
