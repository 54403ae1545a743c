//! MCP server front-end.
//!
//! Serves one tool, `quota_status`, over newline-delimited JSON-RPC 2.0 on
//! stdio. The tool response is the same table text the CLI prints, so MCP
//! clients and humans read identical output.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::core::orchestrator::{FetchOptions, fetch_all};
use crate::core::provider::parse_provider_list;
use crate::core::rows::build_rows;
use crate::error::Result;
use crate::providers::ProviderEnv;
use crate::render::table::render_table;

/// MCP protocol revision this server speaks.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool name exposed to clients.
const TOOL_NAME: &str = "quota_status";

/// Serve MCP requests on stdio until the client disconnects.
pub async fn serve(env: ProviderEnv, timeout: Option<Duration>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = handle_line(&line, &env, timeout).await {
            let mut payload = response.to_string();
            payload.push('\n');
            stdout.write_all(payload.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

/// Handle one raw request line. Notifications produce no response.
async fn handle_line(line: &str, env: &ProviderEnv, timeout: Option<Duration>) -> Option<Value> {
    let request: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(_) => {
            return Some(error_response(Value::Null, -32700, "parse error"));
        }
    };

    let id = request.get("id").cloned();
    let method = request.get("method").and_then(Value::as_str).unwrap_or("");

    // Notifications (no id) are acknowledged silently.
    let id = id?;

    match method {
        "initialize" => Some(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": "aqstat",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            },
        })),
        "tools/list" => Some(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {"tools": [tool_descriptor()]},
        })),
        "tools/call" => Some(handle_tool_call(&request, id, env, timeout).await),
        "ping" => Some(json!({"jsonrpc": "2.0", "id": id, "result": {}})),
        _ => Some(error_response(id, -32601, "method not found")),
    }
}

fn tool_descriptor() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Check rate-limit/quota status for AI coding assistant accounts",
        "inputSchema": {
            "type": "object",
            "properties": {
                "providers": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Provider names to query (claude, codex, gemini, copilot); all when omitted",
                },
            },
        },
    })
}

async fn handle_tool_call(
    request: &Value,
    id: Value,
    env: &ProviderEnv,
    timeout: Option<Duration>,
) -> Value {
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let tool = params.get("name").and_then(Value::as_str).unwrap_or("");
    if tool != TOOL_NAME {
        return error_response(id, -32602, &format!("unknown tool: {tool}"));
    }

    let providers_arg = params
        .get("arguments")
        .and_then(|args| args.get("providers"))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",")
        });

    let providers = match parse_provider_list(providers_arg.as_deref()) {
        Ok(providers) => providers,
        Err(err) => return error_response(id, -32602, &err.to_string()),
    };

    let options = FetchOptions {
        providers: providers.clone(),
        timeout,
        env: env.clone(),
    };

    let report = fetch_all(&options).await;
    let rows = build_rows(&report.results, &providers, Utc::now());
    let text = render_table(&rows, &report.summary, true);

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "content": [{"type": "text", "text": text}],
            "isError": report.has_failures(),
        },
    })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
    })
}
