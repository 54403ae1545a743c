//! End-to-end pipeline tests: raw vendor windows through normalization,
//! classification, row building, and the global summary.

use std::collections::BTreeMap;

use chrono::Duration;
use serde_json::json;

use aqstat::core::models::{
    HealthStatus, ProviderResult, QuotaData, ReasonCode, ResultStatus, UsageData, Urgency,
};
use aqstat::core::provider::Provider;
use aqstat::core::rows::{build_rows, ok_display};
use aqstat::core::summary::summarize;
use aqstat::core::window::{classify, normalize};
use aqstat::test_utils::{fixed_now, make_simple_result, make_windowed_result};

/// Regression fixture from live vendor traffic: a 5-hour window at 10% and
/// a 7-day window at 22%. The 7-day line must lead because it is the more
/// constraining window.
#[test]
fn claude_shaped_windows_through_the_full_pipeline() {
    let now = fixed_now();
    let short_reset = now + Duration::hours(2) + Duration::minutes(11);
    let long_reset = now + Duration::days(5) + Duration::hours(16) + Duration::minutes(11);

    let five_hour = json!({"utilization": 10, "resets_at": short_reset.timestamp()});
    let seven_day = json!({"utilization": 22, "resets_at": long_reset.timestamp()});

    let primary = normalize(&five_hour, now).expect("five_hour normalizes");
    let secondary = normalize(&seven_day, now).expect("seven_day normalizes");
    let windows = classify(Some(&primary), Some(&secondary));

    let data = UsageData::new(QuotaData::Windowed(windows));
    let display = ok_display(&data, now);
    assert_eq!(
        display,
        "7d: 22% used (resets in 5d 16h 11m), 5h: 10% used (resets in 2h 11m)"
    );

    let result = ProviderResult::ok(data, display.clone());
    let mut results = BTreeMap::new();
    results.insert(Provider::Claude, result);

    let rows = build_rows(&results, &[Provider::Claude], now);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].provider_label, "Claude");
    assert_eq!(rows[0].details, display);
    assert_eq!(rows[0].limit_label, "7d");
    assert_eq!(rows[0].urgency, Urgency::CanUse);

    let summary = summarize(results.values());
    assert_eq!(summary.status, HealthStatus::Healthy);
}

/// An exhausted long window forces WAIT_RESET and leads the details even
/// when the short window is untouched.
#[test]
fn exhausted_long_window_drives_urgency_and_ordering() {
    let result = make_windowed_result(0.0, 100.0);
    let mut results = BTreeMap::new();
    results.insert(Provider::Codex, result);

    let rows = build_rows(&results, &[Provider::Codex], fixed_now());
    assert_eq!(rows[0].urgency, Urgency::WaitReset);
    assert_eq!(rows[0].limit_label, "7d");
    assert!(rows[0].details.starts_with("7d: 100% used"));
}

/// Codex-shaped camelCase windows with relative resets classify by
/// duration even when the vendor lists the long window first.
#[test]
fn codex_shaped_windows_swap_into_duration_order() {
    let now = fixed_now();
    let weekly = json!({"usedPercent": 40, "windowMinutes": 10080, "resetsInSeconds": 400_000});
    let session = json!({"usedPercent": 15, "windowMinutes": 300, "resetsInSeconds": 9_000});

    let primary = normalize(&weekly, now).unwrap();
    let secondary = normalize(&session, now).unwrap();
    let windows = classify(Some(&primary), Some(&secondary));

    assert_eq!(windows.short.as_ref().unwrap().window_minutes, Some(300));
    assert_eq!(windows.long.as_ref().unwrap().window_minutes, Some(10080));
    assert_eq!(
        windows.short.as_ref().unwrap().resets_at,
        now + Duration::seconds(9_000)
    );
}

#[test]
fn structured_no_credentials_stays_out_of_the_summary() {
    let mut results = BTreeMap::new();
    results.insert(
        Provider::Claude,
        ProviderResult::no_data(Some(ReasonCode::NoCredentials)),
    );
    results.insert(Provider::Copilot, make_simple_result(30.0));

    let summary = summarize(results.values());
    assert_eq!(summary.status, HealthStatus::Healthy);

    let rows = build_rows(&results, &[Provider::Claude, Provider::Copilot], fixed_now());
    assert_eq!(rows[0].urgency, Urgency::LoginRequired);
    assert_eq!(rows[0].details, "login required");
}

#[test]
fn one_auth_failure_among_healthy_providers_is_critical() {
    let mut results = BTreeMap::new();
    results.insert(
        Provider::Claude,
        ProviderResult::error(ReasonCode::AuthFailed, "HTTP 403"),
    );
    results.insert(Provider::Codex, make_simple_result(10.0));
    results.insert(Provider::Gemini, make_simple_result(20.0));
    results.insert(Provider::Copilot, make_simple_result(30.0));

    let summary = summarize(results.values());
    assert_eq!(summary.status, HealthStatus::Critical);
    assert!(summary.message.contains('1'));

    for result in results.values() {
        if result.status == ResultStatus::Error {
            assert!(result.display.starts_with("error (auth_failed):"));
        }
    }
}

#[test]
fn warning_when_any_provider_crosses_eighty_percent() {
    let mut results = BTreeMap::new();
    results.insert(Provider::Codex, make_windowed_result(85.0, 30.0));
    results.insert(Provider::Copilot, make_simple_result(10.0));

    let summary = summarize(results.values());
    assert_eq!(summary.status, HealthStatus::Warning);
    assert!(summary.message.contains("85%"));
}
