//! # chainhub
//!
//! Multi-chain connection pool and chain-state subscription hub.
//!
//! This crate owns a process-wide registry of persistent WebSocket
//! connections to blockchain networks keyed by chain id, caches one-shot
//! transports for ad-hoc JSON-RPC calls, fans connection-state transitions
//! out to weakly held subscribers, and reacts to process lifecycle
//! transitions by suspending or resuming every managed connection. A small
//! Axum surface exposes health and per-chain connectivity for operators.
//!
//! ## Architecture
//!
//! ```text
//! Operators (HTTP) ── Status Handlers (api/)
//!     │
//! ConnectionPool (pool/)
//!     ├── registries: persistent / one-shot / subscribers (one lock)
//!     └── StateDispatcher ── ConnectionStateSubscriber fan-out
//!     │
//! ConnectionFactory (transport/)
//!     ├── WsConnection (reconnect loop, rpc correlation)
//!     └── WsOneShot (dial, one exchange, close)
//!     │
//! LifecycleBus (lifecycle.rs) ── suspend / resume sweeps
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod transport;
