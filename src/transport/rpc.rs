//! Minimal JSON-RPC 2.0 envelope for node requests.
//!
//! Both the persistent and the one-shot WebSocket transports speak JSON-RPC
//! over text frames. Request ids are UUIDs so responses can be correlated on
//! a multiplexed socket.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// A method invocation to submit to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCall {
    /// JSON-RPC method name.
    pub method: String,
    /// Positional or named parameters.
    pub params: serde_json::Value,
}

impl RpcCall {
    /// Creates a call with the given method and parameters.
    #[must_use]
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Creates a parameterless call.
    #[must_use]
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, serde_json::Value::Array(Vec::new()))
    }
}

/// Outgoing request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    /// Protocol version marker, always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Correlation id echoed back by the node.
    pub id: String,
    /// Method name.
    pub method: String,
    /// Parameters.
    pub params: serde_json::Value,
}

impl RpcRequest {
    /// Wraps a call in a versioned envelope under a fresh correlation id.
    #[must_use]
    pub fn enveloping(call: RpcCall) -> Self {
        Self {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method: call.method,
            params: call.params,
        }
    }
}

/// Incoming response envelope.
///
/// Exactly one of `result` and `error` is populated on a conforming node;
/// [`RpcResponse::into_result`] treats anything else as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    /// Correlation id of the request being answered.
    pub id: Option<String>,
    /// Success payload.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Failure payload.
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

impl RpcResponse {
    /// Converts the envelope into the call outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Rpc`] when the node answered with an error
    /// object, and [`TransportError::Malformed`] when neither `result` nor
    /// `error` is present.
    pub fn into_result(self) -> Result<serde_json::Value, TransportError> {
        if let Some(error) = self.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| TransportError::Malformed("response has neither result nor error".to_string()))
    }
}
