//! System-under-test adapter for a registry tool server speaking MCP over JSON-RPC.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use tracing::debug;

use crate::common::error_codes::category_for_code;
use crate::common::mutex_lock_or_recover;
use crate::domain::Payload;
use crate::domain::QueryCategory;
use crate::infra::ipc::ClientError;
use crate::infra::ipc::IpcTransport;
use crate::infra::ipc::JsonRpcClient;
use crate::infra::ipc::RpcClient;
use crate::infra::ipc::RpcClientConfig;
use crate::usecases::QueryRequest;
use crate::usecases::ports::QueryOutcome;
use crate::usecases::ports::SutError;
use crate::usecases::ports::SystemUnderTest;

const TOOLS_CALL: &str = "tools/call";

/// Sends every case as a `tools/call` request over one shared connection.
pub struct ToolServerSystem {
    client: Mutex<Box<dyn RpcClient>>,
    name: String,
    read_timeout: Duration,
}

impl ToolServerSystem {
    pub fn new(
        client: Box<dyn RpcClient>,
        name: impl Into<String>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            client: Mutex::new(client),
            name: name.into(),
            read_timeout,
        }
    }

    /// Connects and completes the handshake before any case runs.
    pub fn connect(
        transport: &dyn IpcTransport,
        config: RpcClientConfig,
    ) -> Result<Self, ClientError> {
        let read_timeout = config.read_timeout();
        let client = JsonRpcClient::connect(transport, config)?;
        let name = client.target().to_string();
        if let Some(info) = client.server_info() {
            debug!(server = %name, info = %info, "Connected to tool server");
        }
        Ok(Self::new(Box::new(client), name, read_timeout))
    }
}

impl SystemUnderTest for ToolServerSystem {
    fn execute(
        &self,
        category: QueryCategory,
        payload: &Payload,
    ) -> Result<QueryOutcome, SutError> {
        let request = QueryRequest::build(category, payload);
        let params = json!({
            "name": request.tool_name(),
            "arguments": request.arguments(),
        });

        let result = {
            let mut client = mutex_lock_or_recover(&self.client);
            client.call(TOOLS_CALL, Some(params))
        };

        match result {
            Ok(value) => interpret_tool_result(value),
            Err(err) => {
                debug!(tool = request.tool_name(), error = %err, "Tool call failed");
                outcome_for_client_error(err, self.read_timeout)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn interpret_tool_result(result: Value) -> Result<QueryOutcome, SutError> {
    if !result.is_object() {
        return Err(SutError::MalformedResponse(format!(
            "{} returned {}",
            TOOLS_CALL, result
        )));
    }
    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let message = text_content(&result).unwrap_or_else(|| "tool reported an error".to_string());
        return Ok(QueryOutcome::failure(message));
    }
    Ok(QueryOutcome::success(result))
}

fn text_content(result: &Value) -> Option<String> {
    let texts: Vec<&str> = result
        .get("content")?
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Semantic rejections are answers; everything else is infrastructure trouble.
fn outcome_for_client_error(
    err: ClientError,
    read_timeout: Duration,
) -> Result<QueryOutcome, SutError> {
    if err.is_timeout() {
        return Err(SutError::Timeout(read_timeout));
    }
    match err {
        ClientError::RpcError {
            code,
            ref message,
            category,
            ..
        } => {
            let category = category.unwrap_or_else(|| category_for_code(code));
            if category.is_semantic() {
                Ok(QueryOutcome::failure(message.clone()))
            } else {
                Err(SutError::Transport(err.to_string()))
            }
        }
        ClientError::ServerUnavailable(message) => Err(SutError::Unavailable(message)),
        ClientError::SerializationFailed(_)
        | ClientError::InvalidResponse
        | ClientError::UnexpectedResponse { .. } => {
            Err(SutError::MalformedResponse(err.to_string()))
        }
        ClientError::ConnectionFailed(_) | ClientError::InvalidTarget { .. } => {
            Err(SutError::Transport(err.to_string()))
        }
    }
}
