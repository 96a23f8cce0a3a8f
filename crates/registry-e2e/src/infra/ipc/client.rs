//! JSON-RPC 2.0 client with the MCP session handshake.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tracing::debug;
use tracing::trace;

use crate::common::error_codes;
use crate::infra::ipc::error::ClientError;
use crate::infra::ipc::transport::ClientConnection;
use crate::infra::ipc::transport::IpcTransport;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    read_timeout: Duration,
    write_timeout: Duration,
    client_name: String,
    client_version: String,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(10),
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl RpcClientConfig {
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    #[serde(rename = "id", default)]
    _id: Value,
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

pub trait RpcClient: Send {
    fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value, ClientError>;

    fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), ClientError>;
}

/// What one incoming line turned out to be.
#[derive(Debug, PartialEq)]
enum Incoming {
    /// The answer to the request with this id, or an id-less error reply.
    Reply,
    /// An answer to some other request, typically one abandoned after a timeout.
    Stale,
    /// A server notification or a request from the server.
    ServerMessage,
}

fn classify(message: &Value, request_id: u64) -> Incoming {
    if message.get("method").is_some() {
        return Incoming::ServerMessage;
    }
    match message.get("id") {
        Some(Value::Number(id)) if id.as_u64() == Some(request_id) => Incoming::Reply,
        None | Some(Value::Null) => Incoming::Reply,
        Some(_) => Incoming::Stale,
    }
}

fn response_to_result(response: Response) -> Result<Value, ClientError> {
    if let Some(rpc_error) = response.error {
        let category = rpc_error
            .data
            .as_ref()
            .and_then(|data| data.get("category"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<error_codes::ErrorCategory>().ok())
            .unwrap_or_else(|| error_codes::category_for_code(rpc_error.code));
        return Err(ClientError::RpcError {
            code: rpc_error.code,
            message: rpc_error.message,
            category: Some(category),
            context: rpc_error.data,
        });
    }

    response.result.ok_or(ClientError::InvalidResponse)
}

/// Line-framed JSON-RPC over any [`IpcTransport`] connection.
pub struct JsonRpcClient {
    connection: ClientConnection,
    target: String,
    config: RpcClientConfig,
    server_info: Option<Value>,
}

impl JsonRpcClient {
    /// Opens a connection and completes the MCP handshake.
    pub fn connect(
        transport: &dyn IpcTransport,
        config: RpcClientConfig,
    ) -> Result<Self, ClientError> {
        let mut client = Self::connect_without_handshake(transport, config)?;
        client.initialize()?;
        Ok(client)
    }

    pub fn connect_without_handshake(
        transport: &dyn IpcTransport,
        config: RpcClientConfig,
    ) -> Result<Self, ClientError> {
        let connection = transport.connect()?;
        connection.set_read_timeout(Some(config.read_timeout()))?;
        connection.set_write_timeout(Some(config.write_timeout()))?;
        Ok(Self {
            connection,
            target: transport.describe(),
            config,
            server_info: None,
        })
    }

    /// Sends `initialize`, then `notifications/initialized`.
    pub fn initialize(&mut self) -> Result<(), ClientError> {
        let params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": self.config.client_name(),
                "version": self.config.client_version(),
            },
        });
        let result = self.call("initialize", Some(params))?;
        if !result.is_object() {
            return Err(ClientError::UnexpectedResponse {
                message: format!("initialize returned {}", result),
            });
        }
        debug!(
            server = %self.target,
            protocol_version = result.get("protocolVersion").and_then(serde_json::Value::as_str),
            "Tool server initialized"
        );
        self.server_info = result.get("serverInfo").cloned();
        self.notify("notifications/initialized", None)
    }

    pub fn server_info(&self) -> Option<&Value> {
        self.server_info.as_ref()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn read_reply(&mut self, request_id: u64) -> Result<Value, ClientError> {
        loop {
            let line = self.connection.read_message()?.ok_or_else(|| {
                ClientError::ServerUnavailable(format!("{} closed the connection", self.target))
            })?;
            trace!(request_id, bytes = line.len(), "RPC message received");

            let message: Value = serde_json::from_str(&line)?;
            match classify(&message, request_id) {
                Incoming::Reply => {
                    let response: Response = serde_json::from_value(message)?;
                    return response_to_result(response);
                }
                Incoming::Stale => {
                    debug!(request_id, received = %message["id"], "Skipping stale reply");
                }
                Incoming::ServerMessage => {
                    debug!(
                        request_id,
                        method = message["method"].as_str().unwrap_or_default(),
                        "Skipping server message"
                    );
                }
            }
        }
    }
}

impl RpcClient for JsonRpcClient {
    fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();
        debug!(request_id, method = %method, server = %self.target, "RPC call started");

        let request = Request {
            jsonrpc: "2.0",
            id: Some(request_id),
            method,
            params,
        };
        let request_json = serde_json::to_string(&request)?;
        trace!(request_id, bytes = request_json.len(), "RPC request serialized");
        self.connection.send_message(&request_json)?;

        let result = self.read_reply(request_id);
        debug!(
            request_id,
            method = %method,
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis(),
            "RPC call finished"
        );
        result
    }

    fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), ClientError> {
        let notification = Request {
            jsonrpc: "2.0",
            id: None,
            method,
            params,
        };
        self.connection
            .send_message(&serde_json::to_string(&notification)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::ipc::transport::InMemoryTransport;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[test]
    fn test_request_serializes_to_jsonrpc_2_0() {
        let request = Request {
            jsonrpc: "2.0",
            id: Some(1),
            method: "tools/list",
            params: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
    }

    #[test]
    fn test_notification_has_no_id() {
        let request = Request {
            jsonrpc: "2.0",
            id: None,
            method: "notifications/initialized",
            params: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&json!({"id": 7, "result": {}}), 7), Incoming::Reply);
        assert_eq!(classify(&json!({"id": 6, "result": {}}), 7), Incoming::Stale);
        assert_eq!(classify(&json!({"id": "7", "result": {}}), 7), Incoming::Stale);
        assert_eq!(
            classify(&json!({"id": null, "error": {"code": -32700, "message": "x"}}), 7),
            Incoming::Reply
        );
        assert_eq!(
            classify(&json!({"method": "notifications/message"}), 7),
            Incoming::ServerMessage
        );
        assert_eq!(
            classify(&json!({"id": 1, "method": "ping"}), 1),
            Incoming::ServerMessage
        );
    }

    #[test]
    fn test_error_category_falls_back_to_code() {
        let response: Response = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap();
        let err = response_to_result(response).unwrap_err();
        assert_eq!(err.category(), Some(error_codes::ErrorCategory::Protocol));
    }

    #[test]
    fn test_error_category_prefers_data() {
        let response: Response = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"x","data":{"category":"not_found"}}}"#,
        )
        .unwrap();
        let err = response_to_result(response).unwrap_err();
        assert_eq!(err.category(), Some(error_codes::ErrorCategory::NotFound));
    }

    #[test]
    fn test_missing_result_is_invalid_response() {
        let response: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            response_to_result(response),
            Err(ClientError::InvalidResponse)
        ));
    }

    fn reply(request: &str, result: Value) -> Option<String> {
        let value: Value = serde_json::from_str(request).expect("request json");
        let id = value.get("id")?.clone();
        Some(json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string())
    }

    #[test]
    fn test_handshake_then_call() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_by_server = Arc::clone(&seen);
        let transport = InMemoryTransport::new(move |request| {
            let value: Value = serde_json::from_str(&request).expect("request json");
            let method = value["method"].as_str().unwrap_or_default().to_string();
            seen_by_server.lock().unwrap().push(method.clone());
            match method.as_str() {
                "initialize" => {
                    assert_eq!(value["params"]["protocolVersion"], MCP_PROTOCOL_VERSION);
                    reply(
                        &request,
                        json!({"protocolVersion": MCP_PROTOCOL_VERSION,
                               "serverInfo": {"name": "fake-registry"}}),
                    )
                }
                "notifications/initialized" => None,
                _ => reply(&request, json!({"echo": value["params"]})),
            }
        });

        let mut client = JsonRpcClient::connect(&transport, RpcClientConfig::default()).unwrap();
        assert_eq!(client.server_info().unwrap()["name"], "fake-registry");
        let result = client.call("tools/call", Some(json!({"a": 1}))).unwrap();
        assert_eq!(result["echo"]["a"], 1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["initialize", "notifications/initialized", "tools/call"]
        );
    }

    #[test]
    fn test_call_skips_stale_replies_and_notifications() {
        let transport = InMemoryTransport::new(|request| {
            let value: Value = serde_json::from_str(&request).expect("request json");
            let id = value["id"].as_u64()?;
            Some(format!(
                "{}\n{}\n{}",
                json!({"jsonrpc": "2.0", "id": id.wrapping_sub(1), "result": {"late": true}}),
                json!({"jsonrpc": "2.0", "method": "notifications/progress"}),
                json!({"jsonrpc": "2.0", "id": id, "result": {"late": false}}),
            ))
        });
        let mut client =
            JsonRpcClient::connect_without_handshake(&transport, RpcClientConfig::default())
                .unwrap();
        let result = client.call("tools/list", None).unwrap();
        assert_eq!(result["late"], false);
    }

    #[test]
    fn test_closed_connection_is_unavailable() {
        let transport = InMemoryTransport::new(|_| None);
        let mut client =
            JsonRpcClient::connect_without_handshake(&transport, RpcClientConfig::default())
                .unwrap();
        client.connection.shutdown().unwrap();
        assert!(client.call("tools/list", None).is_err());
    }

    #[test]
    fn test_non_object_initialize_result_is_rejected() {
        let transport = InMemoryTransport::new(|request| reply(&request, json!("ok")));
        assert!(matches!(
            JsonRpcClient::connect(&transport, RpcClientConfig::default()),
            Err(ClientError::UnexpectedResponse { .. })
        ));
    }
}
