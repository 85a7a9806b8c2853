//! Error types for the two collaborator contracts.
//!
//! [`FactoryError`] covers synchronous configuration failures raised while
//! constructing a transport; the pool propagates these to its caller as-is
//! and never retries. [`TransportError`] covers the request path of a
//! one-shot or persistent transport. Connectivity failures (socket drop,
//! DNS) are deliberately not errors at the pool layer; they surface only as
//! [`crate::domain::ConnectionState`] transitions relayed to subscribers.

use std::time::Duration;

use url::Url;

use crate::domain::ChainId;

/// Configuration error preventing transport construction.
///
/// Raised synchronously by a [`crate::transport::ConnectionFactory`] and
/// returned unwrapped from `setup_connection` / one-shot creation.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The chain configuration contains no node endpoints.
    #[error("chain {0} has no configured nodes")]
    NoNodes(ChainId),

    /// A node endpoint uses a scheme the transport cannot dial.
    #[error("chain {chain_id} node {url} is not a ws/wss endpoint")]
    UnsupportedScheme {
        /// Chain whose configuration is invalid.
        chain_id: ChainId,
        /// The offending endpoint.
        url: Url,
    },
}

/// Failure on the request path of a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport has no open socket to send on.
    #[error("transport is not connected")]
    NotConnected,

    /// No response arrived within the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The underlying WebSocket failed.
    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The connection closed while a response was outstanding.
    #[error("connection closed while awaiting response")]
    ConnectionClosed,

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Server-provided error message.
        message: String,
    },

    /// The response could not be decoded.
    #[error("malformed rpc response: {0}")]
    Malformed(String),
}
