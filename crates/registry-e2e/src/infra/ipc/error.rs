use serde_json::Value;
use thiserror::Error;

use crate::common::error_codes::ErrorCategory;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to connect to tool server: {0}")]
    ConnectionFailed(#[from] std::io::Error),

    #[error("Failed to encode or decode message: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("RPC error ({code}): {message}")]
    RpcError {
        code: i32,
        message: String,
        category: Option<ErrorCategory>,
        context: Option<Value>,
    },

    #[error("Tool server unavailable: {0}")]
    ServerUnavailable(String),

    #[error("Invalid tool server target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Invalid response from tool server")]
    InvalidResponse,

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

impl ClientError {
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            ClientError::RpcError { category, .. } => *category,
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ClientError::RpcError {
                code,
                message,
                category,
                context,
            } => {
                let mut obj = serde_json::json!({
                    "code": code,
                    "message": message,
                });
                if let Some(cat) = category {
                    obj["category"] = serde_json::json!(cat.as_str());
                }
                if let Some(ctx) = context {
                    obj["context"] = ctx.clone();
                }
                obj
            }
            ClientError::ConnectionFailed(_) | ClientError::ServerUnavailable(_) => {
                serde_json::json!({
                    "message": self.to_string(),
                    "category": ErrorCategory::External.as_str(),
                })
            }
            ClientError::InvalidTarget { .. } => serde_json::json!({
                "message": self.to_string(),
                "category": ErrorCategory::InvalidInput.as_str(),
            }),
            ClientError::SerializationFailed(_)
            | ClientError::InvalidResponse
            | ClientError::UnexpectedResponse { .. } => serde_json::json!({
                "message": self.to_string(),
                "category": ErrorCategory::Protocol.as_str(),
            }),
        }
    }
}
