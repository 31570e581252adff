//! Line-delimited JSON transport over stdio.
//!
//! One request per line in, one response per line out. Stdout carries only
//! protocol frames; all logging goes to stderr.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::router::ToolRouter;

/// One incoming call frame.
#[derive(Debug, Deserialize)]
pub struct ToolRequest {
    /// Caller-chosen correlation id, echoed back verbatim
    #[serde(default)]
    pub id: Option<Value>,
    /// Tool name to dispatch
    pub tool: String,
    /// Tool parameters
    #[serde(default)]
    pub params: Value,
}

/// One outgoing result frame.
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, error: String) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Parse and dispatch one request line.
pub async fn handle_line(router: &ToolRouter, line: &str) -> ToolResponse {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return ToolResponse::failure(None, format!("bad request: {}", e)),
    };

    debug!("Dispatching {}", request.tool);
    match router.dispatch(&request.tool, request.params).await {
        Ok(result) => ToolResponse::success(request.id, result),
        Err(e) => {
            warn!("Tool {} failed: {}", request.tool, e);
            ToolResponse::failure(request.id, e.to_string())
        }
    }
}

/// Serve requests from stdin until it closes.
pub async fn serve_stdio(router: ToolRouter) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(&router, line).await;
        let mut payload = serde_json::to_string(&response).unwrap_or_else(|_| {
            r#"{"ok":false,"error":"internal encode failure"}"#.to_string()
        });
        payload.push('\n');
        stdout.write_all(payload.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_client::{MosaicClient, MosaicConfig};
    use mosaic_models::AgentCatalog;

    fn offline_router() -> ToolRouter {
        let client = MosaicClient::new(MosaicConfig::new("mk-test")).unwrap();
        ToolRouter::new(client, AgentCatalog::builtin())
    }

    #[tokio::test]
    async fn test_malformed_line_yields_error_frame() {
        let router = offline_router();
        let response = handle_line(&router, "{not json").await;
        assert!(!response.ok);
        assert!(response.error.unwrap().starts_with("bad request"));
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_error_frame() {
        let router = offline_router();
        let response =
            handle_line(&router, r#"{"id": 7, "tool": "explode", "params": {}}"#).await;
        assert!(!response.ok);
        assert_eq!(response.id, Some(serde_json::json!(7)));
        assert_eq!(response.error.as_deref(), Some("Unknown tool: explode"));
    }

    #[tokio::test]
    async fn test_list_tools_works_offline() {
        let router = offline_router();
        let response = handle_line(&router, r#"{"tool": "list_tools"}"#).await;
        assert!(response.ok);
        let tools = response.result.unwrap();
        assert_eq!(tools.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_list_agents_works_offline() {
        let router = offline_router();
        let response = handle_line(&router, r#"{"id": "a", "tool": "list_agents"}"#).await;
        assert!(response.ok);
        let agents = response.result.unwrap();
        assert_eq!(agents.as_array().unwrap().len(), 3);
        assert_eq!(agents[0]["name"], "audio_enhance_remove_all_except_speech");
    }

    #[test]
    fn test_response_frames_skip_empty_fields() {
        let ok = ToolResponse::success(None, serde_json::json!("file-1"));
        let raw = serde_json::to_string(&ok).unwrap();
        assert_eq!(raw, r#"{"ok":true,"result":"file-1"}"#);

        let err = ToolResponse::failure(Some(serde_json::json!(1)), "boom".to_string());
        let raw = serde_json::to_string(&err).unwrap();
        assert_eq!(raw, r#"{"id":1,"ok":false,"error":"boom"}"#);
    }
}
