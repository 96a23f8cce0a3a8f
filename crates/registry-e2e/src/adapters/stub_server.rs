//! Serves [`StubRegistry`] as an MCP tool server, one JSON-RPC message per line.

use std::io;
use std::io::BufRead;
use std::io::Write;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tracing::debug;
use tracing::warn;

use crate::common::error_codes;
use crate::domain::Payload;
use crate::domain::QueryCategory;
use crate::infra::StubRegistry;
use crate::infra::ipc::MCP_PROTOCOL_VERSION;

const SERVER_NAME: &str = "registry-e2e-stub";

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcServerError>,
}

#[derive(Debug, Serialize)]
struct RpcServerError {
    code: i32,
    message: String,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcServerError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubToolServer {
    registry: StubRegistry,
}

impl StubToolServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers one incoming line; notifications get no answer.
    pub fn respond(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => {
                let id = request.id.clone()?;
                self.dispatch(id, &request)
            }
            Err(err) => match serde_json::from_str::<Value>(line) {
                Ok(_) => RpcResponse::error(
                    Value::Null,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", err),
                ),
                Err(err) => RpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", err),
                ),
            },
        };
        serde_json::to_string(&response).ok()
    }

    /// Reads requests until EOF, writing each answer on its own line.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(reply) = self.respond(&line) {
                writer.write_all(reply.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        debug!("Stub tool server input closed");
        Ok(())
    }

    fn dispatch(&self, id: Value, request: &RpcRequest) -> RpcResponse {
        match request.method.as_str() {
            "initialize" => RpcResponse::success(
                id,
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => RpcResponse::success(id, json!({ "tools": tool_list() })),
            "tools/call" => self.call_tool(id, request.params.as_ref()),
            other => RpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    fn call_tool(&self, id: Value, params: Option<&Value>) -> RpcResponse {
        let Some(name) = params.and_then(|p| p.get("name")).and_then(Value::as_str) else {
            return RpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing 'name' param");
        };
        let Some(category) = QueryCategory::from_tool_name(name) else {
            return RpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", name),
            );
        };
        let arguments = params
            .and_then(|p| p.get("arguments"))
            .cloned()
            .unwrap_or_else(|| json!({}));
        let payload: Payload = match serde_json::from_value(arguments) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(tool = name, error = %err, "Tool arguments are not an object");
                return RpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid arguments: {}", err),
                );
            }
        };

        let outcome = self.registry.answer(category, &payload);
        let result = if outcome.ok {
            let data = outcome.data.unwrap_or(Value::Null);
            json!({
                "content": [{ "type": "text", "text": data.to_string() }],
                "structuredContent": data,
            })
        } else {
            json!({
                "content": [{ "type": "text", "text": outcome.error.unwrap_or_default() }],
                "isError": true,
            })
        };
        RpcResponse::success(id, result)
    }
}

fn tool_list() -> Vec<Value> {
    QueryCategory::ALL
        .iter()
        .map(|category| {
            json!({
                "name": category.tool_name(),
                "description": format!("Stub registry lookup for {}", category.as_str()),
                "inputSchema": { "type": "object" },
            })
        })
        .collect()
}
