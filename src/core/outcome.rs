//! Fetch outcome classification.
//!
//! Maps the raw result of a provider fetch (usage data, an explicit empty
//! value, or an error) onto the fixed result-status taxonomy. Credential
//! absence and token expiry classify as routine no-data conditions; every
//! other failure is a hard error. An unclassified error never escapes a
//! provider's result.

use chrono::{DateTime, Utc};

use super::models::{ProviderResult, ReasonCode, UsageData};
use super::rows::ok_display;
use crate::error::AqError;

/// Classify the outcome of one provider fetch.
///
/// - `Ok(Some(data))`: success.
/// - `Ok(None)`: the provider affirmatively reported nothing to show.
/// - `Err(_)`: mapped through the error's reason code; unstructured errors
///   fall back to [`classify_message`].
#[must_use]
pub fn classify_outcome(
    outcome: Result<Option<UsageData>, AqError>,
    now: DateTime<Utc>,
) -> ProviderResult {
    match outcome {
        Ok(Some(data)) => {
            let display = ok_display(&data, now);
            ProviderResult::ok(data, display)
        }
        Ok(None) => ProviderResult::no_data(None),
        Err(err) => {
            let reason = err
                .reason_code()
                .unwrap_or_else(|| classify_message(&err.to_string()));
            if reason.is_routine() {
                ProviderResult::no_data(Some(reason))
            } else {
                ProviderResult::error(reason, err.to_string())
            }
        }
    }
}

/// Recover a reason code from a free-text error message.
///
/// Legacy-compatibility fallback for errors that arrive without a
/// structured reason. Structured errors are preferred everywhere;
/// anything unrecognized here coerces to `unknown`.
#[must_use]
pub fn classify_message(message: &str) -> ReasonCode {
    let lower = message.to_lowercase();

    if lower.contains("credential") || lower.contains("not logged in") || lower.contains("no such file") {
        ReasonCode::NoCredentials
    } else if lower.contains("expired") {
        ReasonCode::TokenExpired
    } else if lower.contains("401") || lower.contains("403") || lower.contains("forbidden") || lower.contains("unauthorized") {
        ReasonCode::AuthFailed
    } else if lower.contains("timeout") || lower.contains("timed out") || lower.contains("abort") {
        ReasonCode::Timeout
    } else if lower.contains("network") || lower.contains("fetch failed") || lower.contains("connection") || lower.contains("dns") {
        ReasonCode::NetworkError
    } else {
        ReasonCode::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{QuotaData, ResultStatus, SimpleQuota};

    fn simple_data(percent: f64) -> UsageData {
        UsageData::new(QuotaData::Simple(SimpleQuota {
            used_percent: percent,
            resets_at: None,
        }))
    }

    #[test]
    fn success_classifies_ok() {
        let result = classify_outcome(Ok(Some(simple_data(12.0))), Utc::now());
        assert_eq!(result.status, ResultStatus::Ok);
        assert!(result.reason.is_none());
        assert!(!result.display.is_empty());
    }

    #[test]
    fn explicit_empty_classifies_no_data_without_reason() {
        let result = classify_outcome(Ok(None), Utc::now());
        assert_eq!(result.status, ResultStatus::NoData);
        assert!(result.reason.is_none());
        assert_eq!(result.display, "no data");
    }

    #[test]
    fn no_credentials_is_calm_no_data() {
        let err = AqError::NoCredentials {
            provider: "claude".to_string(),
        };
        let result = classify_outcome(Err(err), Utc::now());
        assert_eq!(result.status, ResultStatus::NoData);
        assert_eq!(result.reason, Some(ReasonCode::NoCredentials));
        assert_eq!(result.display, "no data (no_credentials)");
    }

    #[test]
    fn token_expired_is_calm_no_data() {
        let err = AqError::TokenExpired {
            provider: "codex".to_string(),
        };
        let result = classify_outcome(Err(err), Utc::now());
        assert_eq!(result.status, ResultStatus::NoData);
        assert_eq!(result.reason, Some(ReasonCode::TokenExpired));
    }

    #[test]
    fn auth_failure_is_a_hard_error() {
        let err = AqError::AuthFailed {
            provider: "copilot".to_string(),
            message: "HTTP 403".to_string(),
        };
        let result = classify_outcome(Err(err), Utc::now());
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(result.reason, Some(ReasonCode::AuthFailed));
        assert!(result.display.starts_with("error (auth_failed):"));
        assert!(result.error_message.is_some());
    }

    #[test]
    fn timeout_is_a_hard_error() {
        let result = classify_outcome(Err(AqError::Timeout { seconds: 15 }), Utc::now());
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(result.reason, Some(ReasonCode::Timeout));
    }

    #[test]
    fn unstructured_error_falls_back_to_message_matching() {
        let err = AqError::Other(anyhow::anyhow!("request timed out waiting for response"));
        let result = classify_outcome(Err(err), Utc::now());
        assert_eq!(result.reason, Some(ReasonCode::Timeout));
        assert_eq!(result.status, ResultStatus::Error);
    }

    #[test]
    fn unstructured_credential_message_stays_calm() {
        let err = AqError::Other(anyhow::anyhow!("credential file missing"));
        let result = classify_outcome(Err(err), Utc::now());
        assert_eq!(result.status, ResultStatus::NoData);
        assert_eq!(result.reason, Some(ReasonCode::NoCredentials));
    }

    // -------------------------------------------------------------------------
    // Message matching (legacy path; known gap, pinned here)
    // -------------------------------------------------------------------------

    #[test]
    fn classify_message_table() {
        assert_eq!(classify_message("no credentials found"), ReasonCode::NoCredentials);
        assert_eq!(classify_message("token has expired"), ReasonCode::TokenExpired);
        assert_eq!(classify_message("HTTP 401"), ReasonCode::AuthFailed);
        assert_eq!(classify_message("403 Forbidden"), ReasonCode::AuthFailed);
        assert_eq!(classify_message("operation aborted"), ReasonCode::Timeout);
        assert_eq!(classify_message("network unreachable"), ReasonCode::NetworkError);
        assert_eq!(classify_message("fetch failed"), ReasonCode::NetworkError);
        assert_eq!(classify_message("something else entirely"), ReasonCode::Unknown);
    }

    #[test]
    fn classify_message_is_case_insensitive() {
        assert_eq!(classify_message("Token EXPIRED"), ReasonCode::TokenExpired);
        assert_eq!(classify_message("FORBIDDEN"), ReasonCode::AuthFailed);
    }
}
