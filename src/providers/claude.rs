//! Claude (Anthropic) provider.
//!
//! Reads the OAuth access token from `~/.claude/.credentials.json` (with a
//! keyring fallback), then queries the OAuth usage endpoint. The response
//! carries `five_hour` and `seven_day` windows in snake_case with
//! `utilization` percentages and epoch-second `resets_at` fields.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::core::http::{build_client, transport_error};
use crate::core::models::{AccountIdentity, QuotaData, UsageData};
use crate::core::window::{classify, normalize};
use crate::error::{AqError, Result};
use crate::providers::ProviderEnv;

const PROVIDER: &str = "claude";

/// Usage endpoint path under the Anthropic API base.
const USAGE_PATH: &str = "/api/oauth/usage";

/// Beta header required by the OAuth surface.
const OAUTH_BETA: &str = "oauth-2025-04-20";

// =============================================================================
// Credentials
// =============================================================================

/// `~/.claude/.credentials.json` structure.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "claudeAiOauth")]
    claude_ai_oauth: Option<OauthCredentials>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OauthCredentials {
    access_token: Option<String>,
    /// Expiry as epoch milliseconds.
    expires_at: Option<i64>,
    subscription_type: Option<String>,
}

/// Resolved token plus whatever identity the credential file reveals.
#[derive(Debug)]
struct ResolvedToken {
    access_token: String,
    plan: Option<String>,
}

fn read_credentials(env: &ProviderEnv) -> Result<ResolvedToken> {
    let path = env.credentials_file(crate::core::provider::Provider::Claude);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            // Fall back to a token stored in the system keyring.
            if let Some(token) = keyring_token() {
                return Ok(ResolvedToken {
                    access_token: token,
                    plan: None,
                });
            }
            return Err(AqError::NoCredentials {
                provider: PROVIDER.to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let file: CredentialsFile =
        serde_json::from_str(&content).map_err(|e| AqError::Parse(e.to_string()))?;

    let oauth = file.claude_ai_oauth.ok_or_else(|| AqError::NoCredentials {
        provider: PROVIDER.to_string(),
    })?;

    let access_token = oauth
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AqError::NoCredentials {
            provider: PROVIDER.to_string(),
        })?;

    if let Some(expires_at_ms) = oauth.expires_at {
        if expires_at_ms <= Utc::now().timestamp_millis() {
            return Err(AqError::TokenExpired {
                provider: PROVIDER.to_string(),
            });
        }
    }

    Ok(ResolvedToken {
        access_token,
        plan: oauth.subscription_type,
    })
}

fn keyring_token() -> Option<String> {
    let entry = keyring::Entry::new("aqstat", "claude-oauth-token").ok()?;
    entry.get_password().ok().filter(|t| !t.is_empty())
}

// =============================================================================
// Fetch
// =============================================================================

/// Fetch Claude quota windows.
pub async fn fetch(env: &ProviderEnv, timeout: Duration) -> Result<Option<UsageData>> {
    let token = read_credentials(env)?;
    let client = build_client(timeout)?;

    let url = format!("{}{USAGE_PATH}", env.claude_api_base);
    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token.access_token))
        .header("anthropic-beta", OAUTH_BETA)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AqError::from_http_status(PROVIDER, status.as_u16(), &body));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| AqError::Parse(e.to_string()))?;

    Ok(parse_usage(&body, token.plan))
}

/// Reduce the usage response to classified windows.
///
/// Unusable windows drop out silently; an entirely empty response is
/// "no data", not an error.
fn parse_usage(body: &Value, plan: Option<String>) -> Option<UsageData> {
    let now = Utc::now();
    let five_hour = body.get("five_hour").and_then(|raw| normalize(raw, now));
    let seven_day = body.get("seven_day").and_then(|raw| normalize(raw, now));

    let windows = classify(five_hour.as_ref(), seven_day.as_ref());
    if windows.is_empty() {
        return None;
    }

    Some(UsageData {
        quota: QuotaData::Windowed(windows),
        identity: plan.map(|plan| AccountIdentity {
            email: None,
            plan: Some(plan),
        }),
    })
}
