//! Global health summary.
//!
//! One verdict across all requested providers: critical when any provider
//! failed hard, warning when peak usage crosses the threshold, healthy
//! otherwise. Peak usage comes from the classified quota percentages, not
//! from re-parsing display strings.

use super::models::{GlobalSummary, HealthStatus, ProviderResult};

/// Usage percentage at which the summary escalates to a warning.
const WARNING_THRESHOLD: f64 = 80.0;

/// Summarize all provider results into one health verdict.
#[must_use]
pub fn summarize<'a, I>(results: I) -> GlobalSummary
where
    I: IntoIterator<Item = &'a ProviderResult>,
{
    let mut failures = 0_usize;
    let mut max_stress: Option<f64> = None;

    for result in results {
        if result.is_error() {
            failures += 1;
        }
        if let Some(percent) = result
            .data
            .as_ref()
            .and_then(|d| d.quota.max_used_percent())
        {
            max_stress = Some(max_stress.map_or(percent, |m| m.max(percent)));
        }
    }

    if failures > 0 {
        return GlobalSummary {
            status: HealthStatus::Critical,
            message: format!(
                "{failures} provider{} failing",
                if failures == 1 { "" } else { "s" }
            ),
        };
    }

    match max_stress {
        Some(stress) if stress >= WARNING_THRESHOLD => GlobalSummary {
            status: HealthStatus::Warning,
            message: format!("peak usage at {stress:.0}%"),
        },
        _ => GlobalSummary {
            status: HealthStatus::Healthy,
            message: "all providers within limits".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        QuotaData, ReasonCode, SimpleQuota, UsageData,
    };

    fn ok_result(percent: f64) -> ProviderResult {
        ProviderResult::ok(
            UsageData::new(QuotaData::Simple(SimpleQuota {
                used_percent: percent,
                resets_at: None,
            })),
            "x",
        )
    }

    #[test]
    fn all_quiet_is_healthy() {
        let results = [ok_result(10.0), ok_result(45.0)];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Healthy);
    }

    #[test]
    fn high_usage_is_warning_with_value() {
        let results = [ok_result(10.0), ok_result(85.0)];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Warning);
        assert!(summary.message.contains("85%"));
    }

    #[test]
    fn warning_threshold_is_inclusive() {
        let results = [ok_result(80.0)];
        assert_eq!(summarize(&results).status, HealthStatus::Warning);

        let results = [ok_result(79.9)];
        assert_eq!(summarize(&results).status, HealthStatus::Healthy);
    }

    #[test]
    fn any_hard_failure_is_critical_with_count() {
        let results = [
            ok_result(10.0),
            ok_result(20.0),
            ok_result(30.0),
            ProviderResult::error(ReasonCode::AuthFailed, "HTTP 403"),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Critical);
        assert!(summary.message.contains('1'));
    }

    #[test]
    fn critical_outranks_warning() {
        let results = [
            ok_result(95.0),
            ProviderResult::error(ReasonCode::Timeout, "timeout"),
            ProviderResult::error(ReasonCode::ApiError, "HTTP 500"),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Critical);
        assert!(summary.message.contains('2'));
    }

    #[test]
    fn no_data_does_not_alarm() {
        let results = [
            ProviderResult::no_data(Some(ReasonCode::NoCredentials)),
            ProviderResult::no_data(Some(ReasonCode::TokenExpired)),
            ProviderResult::no_data(None),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Healthy);
    }

    #[test]
    fn overrun_percent_clamps_before_comparison() {
        let results = [ok_result(140.0)];
        let summary = summarize(&results);
        assert_eq!(summary.status, HealthStatus::Warning);
        assert!(summary.message.contains("100%"));
    }
}
