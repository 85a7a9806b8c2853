//! Pool layer: connection registry, subscriber fan-out, delivery queue.
//!
//! [`ConnectionPool`] is the process-wide registry of chain transports;
//! [`ConnectionStateSubscriber`] is the consumer-facing observer contract;
//! the dispatcher delivers state notifications outside the registry lock.

pub mod connection_pool;
pub mod dispatcher;
pub mod subscriber;

pub use connection_pool::{ConnectionPool, StateSink};
pub use subscriber::{ConnectionStateSubscriber, StateLogger};
