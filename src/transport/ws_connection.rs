//! Persistent WebSocket transport with automatic reconnection.
//!
//! [`WsConnection`] owns a background run loop that rotates through the
//! configured nodes, raising every [`ConnectionState`] transition through
//! the pool's [`StateSink`]. Reconnect backoff starts at the tuning base
//! and doubles per failed attempt up to the cap, resetting on success.
//! The open socket is multiplexed: in-flight JSON-RPC requests are
//! correlated by id, which is what lets the pool fall back to a persistent
//! connection when one-shot creation fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures_util::future::BoxFuture;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use super::factory::{ChainTransport, RequestTransport, TransportTuning};
use super::rpc::{RpcCall, RpcRequest, RpcResponse};
use crate::domain::{ChainConfig, ChainId, ConnectionState};
use crate::error::TransportError;
use crate::pool::StateSink;

type PendingMap = HashMap<String, oneshot::Sender<Result<serde_json::Value, TransportError>>>;

/// Long-lived WebSocket connection to one chain's nodes.
///
/// Created by [`super::WsConnectionFactory`]; the pool is the owner and the
/// only caller of the lifecycle methods.
pub struct WsConnection {
    chain_id: ChainId,
    tuning: TransportTuning,
    sink: StateSink,
    nodes: Mutex<Vec<Url>>,
    state: Mutex<ConnectionState>,
    run_task: Mutex<Option<JoinHandle<()>>>,
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    pending: Mutex<PendingMap>,
    self_ref: Weak<WsConnection>,
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsConnection")
            .field("chain_id", &self.chain_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl WsConnection {
    /// Creates an idle connection handle. No socket activity starts until
    /// [`ChainTransport::connect`] is called.
    #[must_use]
    pub fn new(chain: &ChainConfig, sink: StateSink, tuning: TransportTuning) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            chain_id: chain.chain_id.clone(),
            tuning,
            sink,
            nodes: Mutex::new(chain.nodes.clone()),
            state: Mutex::new(ConnectionState::idle()),
            run_task: Mutex::new(None),
            outbound: Mutex::new(None),
            pending: Mutex::new(HashMap::new()),
            self_ref: Weak::clone(self_ref),
        })
    }

    /// Records the new state and fans it out. The state lock is released
    /// before the sink call so a relay can never nest inside it.
    fn transition(&self, state: ConnectionState) {
        {
            let mut current = guard(&self.state);
            if *current == state {
                return;
            }
            *current = state.clone();
        }
        self.sink.emit(&self.chain_id, state);
    }

    fn pick_node(&self, rotation: usize) -> Option<Url> {
        let nodes = guard(&self.nodes);
        if nodes.is_empty() {
            return None;
        }
        nodes.get(rotation % nodes.len()).cloned()
    }

    fn set_outbound(&self, channel: Option<mpsc::UnboundedSender<Message>>) {
        *guard(&self.outbound) = channel;
    }

    /// Completes every in-flight request with a closed-connection error.
    fn fail_pending(&self) {
        let drained = std::mem::take(&mut *guard(&self.pending));
        for (_, sender) in drained {
            let _ = sender.send(Err(TransportError::ConnectionClosed));
        }
    }

    fn forget_pending(&self, id: &str) {
        guard(&self.pending).remove(id);
    }

    fn route_response(&self, raw: &str) {
        match serde_json::from_str::<RpcResponse>(raw) {
            Ok(response) => {
                let Some(id) = response.id.clone() else {
                    tracing::trace!(chain = %self.chain_id, "ignoring frame without request id");
                    return;
                };
                let sender = guard(&self.pending).remove(&id);
                if let Some(sender) = sender {
                    let _ = sender.send(response.into_result());
                }
            }
            Err(error) => {
                tracing::debug!(chain = %self.chain_id, %error, "undecodable frame");
            }
        }
    }
}

impl ChainTransport for WsConnection {
    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn state(&self) -> ConnectionState {
        guard(&self.state).clone()
    }

    fn connect(&self) {
        let mut run_task = guard(&self.run_task);
        if let Some(task) = run_task.as_ref()
            && !task.is_finished()
        {
            return;
        }
        let Some(connection) = self.self_ref.upgrade() else {
            return;
        };
        *run_task = Some(tokio::spawn(run(connection)));
    }

    fn disconnect(&self, force: bool) {
        if !force {
            // Best effort: let the write half emit a close frame first.
            let outbound = guard(&self.outbound).clone();
            if let Some(outbound) = outbound {
                let _ = outbound.send(Message::Close(None));
            }
        }
        let task = guard(&self.run_task).take();
        if let Some(task) = task {
            task.abort();
        }
        self.set_outbound(None);
        self.fail_pending();
        self.transition(ConnectionState::NotConnected { url: None });
    }

    fn reconfigure(&self, chain: &ChainConfig) {
        *guard(&self.nodes) = chain.nodes.clone();
        tracing::debug!(
            chain = %self.chain_id,
            nodes = chain.nodes.len(),
            "node list updated, takes effect on next dial"
        );
    }

    fn request_transport(self: Arc<Self>) -> Option<Arc<dyn RequestTransport>> {
        Some(self)
    }
}

impl RequestTransport for WsConnection {
    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn reconfigure(&self, chain: &ChainConfig) {
        ChainTransport::reconfigure(self, chain);
    }

    fn request(&self, call: RpcCall) -> BoxFuture<'_, Result<serde_json::Value, TransportError>> {
        Box::pin(async move {
            let request = RpcRequest::enveloping(call);
            let payload = serde_json::to_string(&request)
                .map_err(|error| TransportError::Malformed(error.to_string()))?;

            let (sender, receiver) = oneshot::channel();
            guard(&self.pending).insert(request.id.clone(), sender);

            let dispatched = guard(&self.outbound)
                .as_ref()
                .is_some_and(|outbound| outbound.send(Message::text(payload)).is_ok());
            if !dispatched {
                self.forget_pending(&request.id);
                return Err(TransportError::NotConnected);
            }

            match tokio::time::timeout(self.tuning.request_timeout, receiver).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => Err(TransportError::ConnectionClosed),
                Err(_) => {
                    self.forget_pending(&request.id);
                    Err(TransportError::Timeout(self.tuning.request_timeout))
                }
            }
        })
    }
}

/// Connect/reconnect loop. Ends only when aborted by `disconnect` or when
/// the node list becomes empty.
async fn run(connection: Arc<WsConnection>) {
    let mut backoff = connection.tuning.reconnect_base;
    let mut rotation = 0usize;
    loop {
        let Some(url) = connection.pick_node(rotation) else {
            connection.transition(ConnectionState::idle());
            return;
        };
        connection.transition(ConnectionState::Connecting { url: url.clone() });
        match connect_async(url.as_str()).await {
            Ok((socket, _)) => {
                backoff = connection.tuning.reconnect_base;
                drive(&connection, socket, &url).await;
                connection.fail_pending();
            }
            Err(error) => {
                tracing::debug!(chain = %connection.chain_id, %url, %error, "dial failed");
            }
        }
        connection.transition(ConnectionState::WaitingReconnect { url });
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(connection.tuning.reconnect_cap);
        rotation = rotation.wrapping_add(1);
    }
}

/// Pumps one open socket until it closes or errors.
///
/// The outbound channel is installed before the `Connected` transition is
/// raised, so a subscriber reacting to `Connected` can submit a request
/// immediately.
async fn drive(
    connection: &Arc<WsConnection>,
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: &Url,
) {
    let (mut writer, mut reader) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    connection.set_outbound(Some(outbound_tx));
    connection.transition(ConnectionState::Connected { url: url.clone() });

    loop {
        tokio::select! {
            outgoing = outbound_rx.recv() => {
                let Some(message) = outgoing else { break };
                let closing = matches!(message, Message::Close(_));
                if writer.send(message).await.is_err() || closing {
                    break;
                }
            }
            incoming = reader.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => connection.route_response(text.as_str()),
                    Some(Ok(Message::Ping(payload))) => {
                        if writer.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::debug!(chain = %connection.chain_id, %error, "socket error");
                        break;
                    }
                }
            }
        }
    }
    connection.set_outbound(None);
}
