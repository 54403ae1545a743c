//! Shared test fixtures.
//!
//! Available to unit tests and, via the `test-utils` feature, to the
//! integration test crates. Fixture constructors write realistic
//! credential files into a temp home so fetchers can run against mock
//! servers without touching the real environment.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tempfile::TempDir;

use crate::core::models::{
    ClassifiedWindows, ProviderResult, QuotaData, SimpleQuota, SlottedWindow, UsageData, WindowSlot,
};
use crate::providers::ProviderEnv;

/// Fixed reference instant so window arithmetic is deterministic.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A slotted window resetting the given minutes from [`fixed_now`].
#[must_use]
pub fn make_slotted_window(slot: WindowSlot, used_percent: f64, resets_in_minutes: i64) -> SlottedWindow {
    SlottedWindow {
        slot,
        used_percent,
        window_minutes: None,
        resets_at: fixed_now() + Duration::minutes(resets_in_minutes),
    }
}

/// A successful windowed result with short and long windows.
#[must_use]
pub fn make_windowed_result(short_used: f64, long_used: f64) -> ProviderResult {
    let data = UsageData::new(QuotaData::Windowed(ClassifiedWindows {
        short: Some(make_slotted_window(WindowSlot::Short, short_used, 131)),
        long: Some(make_slotted_window(WindowSlot::Long, long_used, 8171)),
    }));
    let display = crate::core::rows::ok_display(&data, fixed_now());
    ProviderResult::ok(data, display)
}

/// A successful simple-quota result.
#[must_use]
pub fn make_simple_result(used_percent: f64) -> ProviderResult {
    let data = UsageData::new(QuotaData::Simple(SimpleQuota {
        used_percent,
        resets_at: Some(fixed_now() + Duration::days(10)),
    }));
    let display = crate::core::rows::ok_display(&data, fixed_now());
    ProviderResult::ok(data, display)
}

/// A temp home directory plus a [`ProviderEnv`] rooted in it.
///
/// Keep the `TempDir` alive for as long as the env is used.
#[must_use]
pub fn make_test_env() -> (TempDir, ProviderEnv) {
    let dir = TempDir::new().expect("create temp home");
    let env = ProviderEnv::with_home(dir.path().to_path_buf());
    (dir, env)
}

/// Write a live Claude credential file under the env's home.
pub fn write_claude_credentials(env: &ProviderEnv) {
    let claude_dir = env.home.join(".claude");
    std::fs::create_dir_all(&claude_dir).expect("create .claude");
    let expires = Utc::now().timestamp_millis() + 3_600_000;
    std::fs::write(
        claude_dir.join(".credentials.json"),
        json!({
            "claudeAiOauth": {
                "accessToken": "sk-ant-oat-test",
                "expiresAt": expires,
                "subscriptionType": "max",
            }
        })
        .to_string(),
    )
    .expect("write claude credentials");
}

/// Write a Codex auth file under the env's home.
pub fn write_codex_credentials(env: &ProviderEnv) {
    let codex_dir = env.home.join(".codex");
    std::fs::create_dir_all(&codex_dir).expect("create .codex");
    std::fs::write(
        codex_dir.join("auth.json"),
        json!({"tokens": {"access_token": "codex-test-token"}}).to_string(),
    )
    .expect("write codex auth");
}

/// Write a fresh Gemini OAuth credential file under the env's home.
pub fn write_gemini_credentials(env: &ProviderEnv) {
    let gemini_dir = env.home.join(".gemini");
    std::fs::create_dir_all(&gemini_dir).expect("create .gemini");
    let expiry = Utc::now().timestamp_millis() + 3_600_000;
    std::fs::write(
        gemini_dir.join("oauth_creds.json"),
        json!({"access_token": "ya29.test", "expiry_date": expiry}).to_string(),
    )
    .expect("write gemini creds");
}

/// Write a Copilot apps.json under the env's home.
pub fn write_copilot_credentials(env: &ProviderEnv) {
    let config_dir = env.home.join(".config").join("github-copilot");
    std::fs::create_dir_all(&config_dir).expect("create github-copilot");
    std::fs::write(
        config_dir.join("apps.json"),
        json!({"github.com:Iv1.test": {"oauth_token": "gho_test"}}).to_string(),
    )
    .expect("write copilot apps.json");
}
