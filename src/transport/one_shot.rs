//! Single-request WebSocket transport.
//!
//! [`WsOneShot`] dials a node, submits one JSON-RPC call, awaits the
//! matching response, and closes the socket. It is not subject to the
//! persistent reconnect/suspend lifecycle; each request tries the
//! configured nodes in order until one answers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::BoxFuture;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use super::factory::{RequestTransport, TransportTuning};
use super::rpc::{RpcCall, RpcRequest, RpcResponse};
use crate::domain::{ChainConfig, ChainId};
use crate::error::TransportError;

/// Ad-hoc request transport for one chain.
///
/// Cached by the pool (at most one instance per chain id) and refreshed in
/// place when the chain configuration changes.
#[derive(Debug)]
pub struct WsOneShot {
    chain_id: ChainId,
    nodes: Mutex<Vec<Url>>,
    tuning: TransportTuning,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl WsOneShot {
    /// Creates a one-shot transport for the chain's node list.
    #[must_use]
    pub fn new(chain: &ChainConfig, tuning: TransportTuning) -> Self {
        Self {
            chain_id: chain.chain_id.clone(),
            nodes: Mutex::new(chain.nodes.clone()),
            tuning,
        }
    }

    fn nodes(&self) -> Vec<Url> {
        guard(&self.nodes).clone()
    }

    /// One dial/send/await/close exchange against a single node.
    async fn exchange(
        url: &Url,
        payload: String,
        id: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let (mut socket, _) = connect_async(url.as_str()).await?;
        socket.send(Message::text(payload)).await?;
        while let Some(frame) = socket.next().await {
            match frame? {
                Message::Text(text) => {
                    let Ok(response) = serde_json::from_str::<RpcResponse>(text.as_str()) else {
                        continue;
                    };
                    if response.id.as_deref() == Some(id) {
                        let _ = socket.send(Message::Close(None)).await;
                        return response.into_result();
                    }
                }
                Message::Ping(ping) => {
                    socket.send(Message::Pong(ping)).await?;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        Err(TransportError::ConnectionClosed)
    }
}

impl RequestTransport for WsOneShot {
    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn reconfigure(&self, chain: &ChainConfig) {
        *guard(&self.nodes) = chain.nodes.clone();
    }

    fn request(&self, call: RpcCall) -> BoxFuture<'_, Result<serde_json::Value, TransportError>> {
        Box::pin(async move {
            let request = RpcRequest::enveloping(call);
            let payload = serde_json::to_string(&request)
                .map_err(|error| TransportError::Malformed(error.to_string()))?;

            let mut last_error = TransportError::NotConnected;
            for url in self.nodes() {
                let attempt = tokio::time::timeout(
                    self.tuning.request_timeout,
                    Self::exchange(&url, payload.clone(), &request.id),
                );
                match attempt.await {
                    Ok(Ok(value)) => return Ok(value),
                    Ok(Err(error)) => {
                        tracing::debug!(chain = %self.chain_id, %url, %error, "one-shot node failed");
                        last_error = error;
                    }
                    Err(_) => {
                        tracing::debug!(chain = %self.chain_id, %url, "one-shot node timed out");
                        last_error = TransportError::Timeout(self.tuning.request_timeout);
                    }
                }
            }
            Err(last_error)
        })
    }
}
