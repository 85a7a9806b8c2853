//! Transport layer: factory contract, WebSocket transports, JSON-RPC envelope.
//!
//! The pool consumes transports exclusively through the traits in
//! [`factory`]; the `tokio-tungstenite` implementations here are the
//! shipped defaults. Embedders with their own node access can implement
//! [`ConnectionFactory`] and hand it to the pool instead.

pub mod factory;
pub mod one_shot;
pub mod rpc;
pub mod ws_connection;

pub use factory::{
    ChainTransport, ConnectionFactory, RequestTransport, TransportTuning, WsConnectionFactory,
};
pub use one_shot::WsOneShot;
pub use rpc::{RpcCall, RpcRequest, RpcResponse};
pub use ws_connection::WsConnection;
