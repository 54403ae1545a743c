//! Copilot (GitHub) provider.
//!
//! Reads the GitHub OAuth token from the Copilot app credential files and
//! queries the internal user endpoint. Copilot exposes a single
//! percent-remaining quota with one monthly reset date rather than rolling
//! time windows.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::core::http::{build_client, transport_error};
use crate::core::models::{AccountIdentity, QuotaData, SimpleQuota, UsageData};
use crate::error::{AqError, Result};
use crate::providers::ProviderEnv;

const PROVIDER: &str = "copilot";

/// User endpoint path under the GitHub API base.
const USER_PATH: &str = "/copilot_internal/user";

// =============================================================================
// Credentials
// =============================================================================

/// Candidate credential files, checked in order.
fn credential_candidates(env: &ProviderEnv) -> [PathBuf; 2] {
    let config_dir = env.home.join(".config").join("github-copilot");
    [config_dir.join("apps.json"), config_dir.join("hosts.json")]
}

/// Extract the first `oauth_token` from a Copilot credential map.
///
/// Both files map an opaque host key (e.g. `github.com:Iv1.xxx`) to an
/// entry carrying the token, so the keys themselves are not enumerated.
fn extract_token(content: &str) -> Result<Option<String>> {
    let map: Value = serde_json::from_str(content).map_err(|e| AqError::Parse(e.to_string()))?;

    let token = map.as_object().and_then(|entries| {
        entries.values().find_map(|entry| {
            entry
                .get("oauth_token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
        })
    });

    Ok(token)
}

fn read_credentials(env: &ProviderEnv) -> Result<String> {
    for path in credential_candidates(env) {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                if let Some(token) = extract_token(&content)? {
                    return Ok(token);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    Err(AqError::NoCredentials {
        provider: PROVIDER.to_string(),
    })
}

// =============================================================================
// Fetch
// =============================================================================

#[derive(Debug, Deserialize)]
struct UserResponse {
    copilot_plan: Option<String>,
    quota_reset_date: Option<String>,
    quota_snapshots: Option<QuotaSnapshots>,
}

#[derive(Debug, Deserialize)]
struct QuotaSnapshots {
    premium_interactions: Option<QuotaSnapshot>,
}

#[derive(Debug, Deserialize)]
struct QuotaSnapshot {
    percent_remaining: Option<f64>,
}

/// Fetch the Copilot premium-interactions quota.
pub async fn fetch(env: &ProviderEnv, timeout: Duration) -> Result<Option<UsageData>> {
    let token = read_credentials(env)?;
    let client = build_client(timeout)?;

    let url = format!("{}{USER_PATH}", env.github_api_base);
    let response = client
        .get(&url)
        .header("Authorization", format!("token {token}"))
        .header("Editor-Version", "vscode/1.96.2")
        .header("Editor-Plugin-Version", "copilot-chat/0.26.7")
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AqError::from_http_status(PROVIDER, status.as_u16(), &body));
    }

    let data: UserResponse = response
        .json()
        .await
        .map_err(|e| AqError::Parse(e.to_string()))?;

    Ok(parse_user(&data))
}

fn parse_user(data: &UserResponse) -> Option<UsageData> {
    let snapshot = data
        .quota_snapshots
        .as_ref()
        .and_then(|qs| qs.premium_interactions.as_ref())?;
    let percent_remaining = snapshot.percent_remaining?;

    let resets_at = data
        .quota_reset_date
        .as_deref()
        .and_then(parse_reset_date);

    Some(UsageData {
        quota: QuotaData::Simple(SimpleQuota {
            used_percent: 100.0 - percent_remaining,
            resets_at,
        }),
        identity: data.copilot_plan.clone().map(|plan| AccountIdentity {
            email: None,
            plan: Some(plan),
        }),
    })
}

/// The reset date arrives either as RFC3339 or as a bare `YYYY-MM-DD`.
fn parse_reset_date(s: &str) -> Option<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().ok().or_else(|| {
        chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_token_from_apps_map() {
        let content = json!({
            "github.com:Iv1.b507a08c87ecfe98": {"oauth_token": "gho_abc123", "user": "dev"}
        })
        .to_string();
        assert_eq!(extract_token(&content).unwrap().as_deref(), Some("gho_abc123"));
    }

    #[test]
    fn extract_token_empty_map() {
        assert!(extract_token("{}").unwrap().is_none());
    }

    #[test]
    fn extract_token_garbled_is_parse_error() {
        assert!(matches!(extract_token("{nope"), Err(AqError::Parse(_))));
    }

    #[test]
    fn read_credentials_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let env = ProviderEnv::with_home(dir.path().to_path_buf());
        let err = read_credentials(&env).unwrap_err();
        assert!(matches!(err, AqError::NoCredentials { .. }));
    }

    #[test]
    fn read_credentials_falls_back_to_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".config").join("github-copilot");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("hosts.json"),
            json!({"github.com": {"oauth_token": "gho_hosts"}}).to_string(),
        )
        .unwrap();

        let env = ProviderEnv::with_home(dir.path().to_path_buf());
        assert_eq!(read_credentials(&env).unwrap(), "gho_hosts");
    }

    #[test]
    fn parse_user_computes_used_percent() {
        let data: UserResponse = serde_json::from_value(json!({
            "copilot_plan": "individual",
            "quota_reset_date": "2026-04-01",
            "quota_snapshots": {"premium_interactions": {"percent_remaining": 72.5}}
        }))
        .unwrap();

        let usage = parse_user(&data).expect("usage data");
        let QuotaData::Simple(quota) = &usage.quota else {
            panic!("expected simple quota");
        };
        assert!((quota.used_percent - 27.5).abs() < 1e-10);
        assert!(quota.resets_at.is_some());
        assert_eq!(usage.identity.unwrap().plan.as_deref(), Some("individual"));
    }

    #[test]
    fn parse_user_without_snapshot_is_no_data() {
        let data: UserResponse =
            serde_json::from_value(json!({"copilot_plan": "business"})).unwrap();
        assert!(parse_user(&data).is_none());
    }

    #[test]
    fn parse_reset_date_formats() {
        assert!(parse_reset_date("2026-04-01T00:00:00Z").is_some());
        assert!(parse_reset_date("2026-04-01").is_some());
        assert!(parse_reset_date("next month").is_none());
    }

    #[test]
    fn parse_user_exhausted_quota() {
        let data: UserResponse = serde_json::from_value(json!({
            "quota_snapshots": {"premium_interactions": {"percent_remaining": 0.0}}
        }))
        .unwrap();
        let usage = parse_user(&data).unwrap();
        let QuotaData::Simple(quota) = &usage.quota else {
            panic!("expected simple quota");
        };
        assert!((quota.used_percent - 100.0).abs() < f64::EPSILON);
    }
}
