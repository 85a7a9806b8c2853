//! Transport traits and the default WebSocket connection factory.
//!
//! [`ConnectionFactory`] is the collaborator contract the pool consumes:
//! create or update a persistent [`ChainTransport`] / one-shot
//! [`RequestTransport`] for a given chain configuration. Configuration
//! errors are surfaced synchronously as [`FactoryError`] and never retried
//! by the pool. [`WsConnectionFactory`] is the shipped implementation,
//! backed by `tokio-tungstenite`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::one_shot::WsOneShot;
use super::rpc::RpcCall;
use super::ws_connection::WsConnection;
use crate::domain::{ChainConfig, ChainId, ConnectionState};
use crate::error::{FactoryError, TransportError};
use crate::pool::StateSink;

/// Persistent transport handle for one chain.
///
/// Owned exclusively by the pool once created; updated in place (never
/// replaced) when the chain configuration changes. The transport drives its
/// own reconnect schedule and raises every [`ConnectionState`] transition
/// through the [`StateSink`] it was created with. Per-chain identity is
/// carried by the handle itself, so state relay needs no registry scan.
pub trait ChainTransport: Send + Sync + fmt::Debug {
    /// The chain this transport serves.
    fn chain_id(&self) -> &ChainId;

    /// Current connectivity state.
    fn state(&self) -> ConnectionState;

    /// Starts (or resumes) the connect/reconnect loop. Fire-and-forget.
    fn connect(&self);

    /// Stops network activity. `force` tears the socket down immediately;
    /// otherwise a close frame is sent first. Returns once the request is
    /// issued, not once the socket is confirmed closed.
    fn disconnect(&self, force: bool);

    /// Applies a changed chain configuration (e.g. a new node list) to the
    /// existing handle. Takes effect on the next dial.
    fn reconfigure(&self, chain: &ChainConfig);

    /// Returns this transport's single-request capability, if it has one.
    ///
    /// `None` means the handle cannot serve ad-hoc requests; the pool's
    /// one-shot fallback treats that as "no ad-hoc connection available".
    fn request_transport(self: Arc<Self>) -> Option<Arc<dyn RequestTransport>>;
}

/// Single-request transport: submit one call, await one response.
///
/// Not subject to the persistent reconnect/suspend lifecycle.
pub trait RequestTransport: Send + Sync + fmt::Debug {
    /// The chain this transport serves.
    fn chain_id(&self) -> &ChainId;

    /// Applies a changed chain configuration to the existing handle.
    fn reconfigure(&self, chain: &ChainConfig);

    /// Submits one JSON-RPC call and resolves with its decoded result.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no node could be reached, the
    /// request timed out, or the node answered with an error object.
    fn request(&self, call: RpcCall) -> BoxFuture<'_, Result<serde_json::Value, TransportError>>;
}

/// Collaborator contract for constructing and updating transports.
///
/// The pool holds exactly one factory and funnels every create/update
/// through it. Chain configuration is opaque to the pool; only the factory
/// interprets it.
pub trait ConnectionFactory: Send + Sync + fmt::Debug {
    /// Builds a persistent transport for the chain.
    ///
    /// # Errors
    ///
    /// Returns a [`FactoryError`] when the chain configuration cannot back
    /// a transport (no nodes, unusable endpoint scheme).
    fn create_connection(
        &self,
        chain: &ChainConfig,
        sink: StateSink,
    ) -> Result<Arc<dyn ChainTransport>, FactoryError>;

    /// Builds a one-shot transport for the chain.
    ///
    /// # Errors
    ///
    /// Returns a [`FactoryError`] when the chain configuration cannot back
    /// a transport.
    fn create_one_shot(
        &self,
        chain: &ChainConfig,
    ) -> Result<Arc<dyn RequestTransport>, FactoryError>;

    /// Applies a changed chain configuration to an existing persistent
    /// transport.
    fn update_connection(&self, connection: &Arc<dyn ChainTransport>, chain: &ChainConfig) {
        connection.reconfigure(chain);
    }

    /// Applies a changed chain configuration to an existing one-shot
    /// transport.
    fn update_one_shot(&self, connection: &Arc<dyn RequestTransport>, chain: &ChainConfig) {
        connection.reconfigure(chain);
    }
}

/// Dial and request-path timing knobs for the WebSocket transports.
#[derive(Debug, Clone, Copy)]
pub struct TransportTuning {
    /// First reconnect delay after a drop.
    pub reconnect_base: Duration,
    /// Ceiling for the exponential reconnect backoff.
    pub reconnect_cap: Duration,
    /// Deadline for a single request/response exchange.
    pub request_timeout: Duration,
}

impl Default for TransportTuning {
    fn default() -> Self {
        Self {
            reconnect_base: Duration::from_secs(1),
            reconnect_cap: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Default factory producing `tokio-tungstenite` backed transports.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnectionFactory {
    tuning: TransportTuning,
}

impl WsConnectionFactory {
    /// Creates a factory with the given timing knobs.
    #[must_use]
    pub const fn new(tuning: TransportTuning) -> Self {
        Self { tuning }
    }

    fn validate(chain: &ChainConfig) -> Result<(), FactoryError> {
        if chain.nodes.is_empty() {
            return Err(FactoryError::NoNodes(chain.chain_id.clone()));
        }
        for url in &chain.nodes {
            if !matches!(url.scheme(), "ws" | "wss") {
                return Err(FactoryError::UnsupportedScheme {
                    chain_id: chain.chain_id.clone(),
                    url: url.clone(),
                });
            }
        }
        Ok(())
    }
}

impl ConnectionFactory for WsConnectionFactory {
    fn create_connection(
        &self,
        chain: &ChainConfig,
        sink: StateSink,
    ) -> Result<Arc<dyn ChainTransport>, FactoryError> {
        Self::validate(chain)?;
        Ok(WsConnection::new(chain, sink, self.tuning))
    }

    fn create_one_shot(
        &self,
        chain: &ChainConfig,
    ) -> Result<Arc<dyn RequestTransport>, FactoryError> {
        Self::validate(chain)?;
        Ok(Arc::new(WsOneShot::new(chain, self.tuning)))
    }
}
