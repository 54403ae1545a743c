//! Codex (OpenAI) provider.
//!
//! Reads tokens from `~/.codex/auth.json` and queries the backend usage
//! endpoint. The response carries `primary` and `secondary` windows in
//! camelCase (`usedPercent`, `windowMinutes`, `resetsInSeconds`). Account
//! email and plan come from the id-token JWT payload; the payload is only
//! base64-decoded, never signature-checked, since it is used for display.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::core::http::{build_client, transport_error};
use crate::core::models::{AccountIdentity, QuotaData, UsageData};
use crate::core::window::{classify, normalize};
use crate::error::{AqError, Result};
use crate::providers::ProviderEnv;

const PROVIDER: &str = "codex";

/// Usage endpoint path under the ChatGPT backend base.
const USAGE_PATH: &str = "/backend-api/codex/usage";

// =============================================================================
// Credentials
// =============================================================================

/// `~/.codex/auth.json` structure.
#[derive(Debug, Deserialize)]
struct AuthFile {
    tokens: Option<AuthTokens>,
}

#[derive(Debug, Deserialize)]
struct AuthTokens {
    access_token: Option<String>,
    id_token: Option<String>,
}

fn read_credentials(env: &ProviderEnv) -> Result<(String, Option<AccountIdentity>)> {
    let path = env.credentials_file(crate::core::provider::Provider::Codex);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AqError::NoCredentials {
                provider: PROVIDER.to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let auth: AuthFile =
        serde_json::from_str(&content).map_err(|e| AqError::Parse(e.to_string()))?;

    let tokens = auth.tokens.ok_or_else(|| AqError::NoCredentials {
        provider: PROVIDER.to_string(),
    })?;

    let access_token = tokens
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AqError::NoCredentials {
            provider: PROVIDER.to_string(),
        })?;

    let identity = tokens.id_token.as_deref().and_then(decode_identity);

    Ok((access_token, identity))
}

/// Pull email and plan out of the id-token JWT payload.
fn decode_identity(id_token: &str) -> Option<AccountIdentity> {
    let payload_b64 = id_token.split('.').nth(1)?;
    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let claims: Value = serde_json::from_slice(&payload).ok()?;

    let email = claims
        .get("email")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let plan = claims
        .get("https://api.openai.com/auth")
        .and_then(|auth| auth.get("chatgpt_plan_type"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    if email.is_none() && plan.is_none() {
        return None;
    }
    Some(AccountIdentity { email, plan })
}

// =============================================================================
// Fetch
// =============================================================================

/// Fetch Codex quota windows.
pub async fn fetch(env: &ProviderEnv, timeout: Duration) -> Result<Option<UsageData>> {
    let (access_token, identity) = read_credentials(env)?;
    let client = build_client(timeout)?;

    let url = format!("{}{USAGE_PATH}", env.codex_api_base);
    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {access_token}"))
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

    Ok(parse_usage(&body, identity))
}

fn parse_usage(body: &Value, identity: Option<AccountIdentity>) -> Option<UsageData> {
    let now = Utc::now();
    let limits = body.get("rate_limits")?;

    let primary = limits.get("primary").and_then(|raw| normalize(raw, now));
    let secondary = limits.get("secondary").and_then(|raw| normalize(raw, now));

    let windows = classify(primary.as_ref(), secondary.as_ref());
    if windows.is_empty() {
        return None;
    }

    Some(UsageData {
        quota: QuotaData::Windowed(windows),
        identity,
    })
}
