//! Orchestrated fetch tests: concurrent providers, partial failure, and
//! result classification through the full fetch path.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aqstat::core::models::{HealthStatus, ReasonCode, ResultStatus};
use aqstat::core::orchestrator::{FetchOptions, fetch_all};
use aqstat::core::provider::Provider;
use aqstat::test_utils::{make_test_env, write_claude_credentials, write_copilot_credentials};

#[tokio::test]
async fn partial_failure_never_blocks_other_providers() {
    let (_dir, mut env) = make_test_env();
    write_claude_credentials(&env);
    write_copilot_credentials(&env);

    let server = MockServer::start().await;
    // Claude succeeds.
    let now = chrono::Utc::now().timestamp();
    Mock::given(method("GET"))
        .and(path("/api/oauth/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "five_hour": {"utilization": 20, "resets_at": now + 3600},
        })))
        .mount(&server)
        .await;
    // Copilot's token is rejected.
    Mock::given(method("GET"))
        .and(path("/copilot_internal/user"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    env.claude_api_base = server.uri();
    env.github_api_base = server.uri();

    let options = FetchOptions {
        providers: vec![Provider::Claude, Provider::Copilot, Provider::Codex],
        timeout: Some(Duration::from_secs(5)),
        env,
    };
    let report = fetch_all(&options).await;

    // Claude reported despite the Copilot failure.
    assert_eq!(report.results[&Provider::Claude].status, ResultStatus::Ok);

    // Copilot's 403 is a hard auth failure.
    let copilot = &report.results[&Provider::Copilot];
    assert_eq!(copilot.status, ResultStatus::Error);
    assert_eq!(copilot.reason, Some(ReasonCode::AuthFailed));

    // Codex has no credentials in the temp home: calm no-data.
    let codex = &report.results[&Provider::Codex];
    assert_eq!(codex.status, ResultStatus::NoData);
    assert_eq!(codex.reason, Some(ReasonCode::NoCredentials));

    assert!(report.has_failures());
    assert_eq!(report.summary.status, HealthStatus::Critical);
}

#[tokio::test]
async fn slow_provider_surfaces_as_timeout_reason() {
    let (_dir, mut env) = make_test_env();
    write_claude_credentials(&env);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oauth/usage"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;
    env.claude_api_base = server.uri();

    let options = FetchOptions {
        providers: vec![Provider::Claude],
        timeout: Some(Duration::from_secs(1)),
        env,
    };
    let report = fetch_all(&options).await;

    let claude = &report.results[&Provider::Claude];
    assert_eq!(claude.status, ResultStatus::Error);
    assert_eq!(claude.reason, Some(ReasonCode::Timeout));
    assert!(report.has_failures());
}

#[tokio::test]
async fn report_covers_every_requested_provider() {
    let (_dir, env) = make_test_env();

    let options = FetchOptions {
        providers: Provider::ALL.to_vec(),
        timeout: Some(Duration::from_secs(2)),
        env,
    };
    let report = fetch_all(&options).await;

    assert_eq!(report.results.len(), Provider::ALL.len());
    for provider in Provider::ALL {
        let result = &report.results[provider];
        assert!(!result.display.is_empty(), "display must never be empty");
    }
    assert_eq!(report.summary.status, HealthStatus::Healthy);
}
