//! MCP (Model Context Protocol) server implementation

use mdbrowse::{BrowseRequest, Tool, TOOL_DESCRIPTION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Name the tool is listed under
const TOOL_NAME: &str = "mdbrowse";

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "MCP request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": TOOL_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [{
                    "name": TOOL_NAME,
                    "description": TOOL_DESCRIPTION,
                    "inputSchema": self.tool.input_schema(),
                    "outputSchema": self.tool.output_schema()
                }]
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if tool_name != TOOL_NAME {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let request: BrowseRequest = match serde_json::from_value(arguments) {
            Ok(req) => req,
            Err(e) => {
                return JsonRpcResponse::error(id, -32602, format!("Invalid arguments: {}", e));
            }
        };

        let page = self.tool.browse(request).await;
        let content = serde_json::to_value(&page).unwrap_or(json!({}));

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": serde_json::to_string_pretty(&content).unwrap_or_default()
                }],
                "structuredContent": content,
                "isError": page.is_error()
            }),
        )
    }
}

/// Run the MCP server over stdio
pub async fn run_server(tool: Tool) {
    let server = McpServer::new(tool);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let json = serde_json::to_string(&response).unwrap_or_default();
                let _ = writeln!(stdout, "{}", json);
                let _ = stdout.flush();
                continue;
            }
        };

        // Notifications get no reply
        if request.id.is_none() && request.method.starts_with("notifications/") {
            continue;
        }

        let response = server.handle_request(request).await;
        let json = serde_json::to_string(&response).unwrap_or_default();
        let _ = writeln!(stdout, "{}", json);
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn to_json(response: &JsonRpcResponse) -> Value {
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = McpServer::new(Tool::default());
        let response = to_json(&server.handle_request(request("initialize", json!({}))).await);

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], "mdbrowse");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = McpServer::new(Tool::default());
        let response = to_json(&server.handle_request(request("tools/list", json!({}))).await);

        let tool = &response["result"]["tools"][0];
        assert_eq!(tool["name"], "mdbrowse");
        assert!(tool["inputSchema"]["properties"]["url"].is_object());
        assert!(tool["outputSchema"]["properties"]["markdown"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = McpServer::new(Tool::default());
        let response = to_json(&server.handle_request(request("bogus", json!({}))).await);

        assert_eq!(response["error"]["code"], -32601);
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = McpServer::new(Tool::default());
        let response = to_json(
            &server
                .handle_request(request("tools/call", json!({"name": "other"})))
                .await,
        );

        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let server = McpServer::new(Tool::default());
        let response = to_json(
            &server
                .handle_request(request(
                    "tools/call",
                    json!({"name": "mdbrowse", "arguments": {"url": 42}}),
                ))
                .await,
        );

        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_call_returns_error_document() {
        let server = McpServer::new(Tool::default());
        let response = to_json(
            &server
                .handle_request(request(
                    "tools/call",
                    json!({"name": "mdbrowse", "arguments": {"url": "ftp://example.com"}}),
                ))
                .await,
        );

        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["title"], "Error");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Error Loading Page"));
    }

    #[tokio::test]
    async fn test_call_without_url_returns_error_document() {
        let server = McpServer::new(Tool::default());
        let response = to_json(
            &server
                .handle_request(request(
                    "tools/call",
                    json!({"name": "mdbrowse", "arguments": {}}),
                ))
                .await,
        );

        assert!(response.get("error").is_none());
        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"], "URL is required");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("URL is required"));
    }
}
