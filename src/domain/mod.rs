//! Domain layer: chain identity, chain configuration, and connection state.
//!
//! This module contains the value objects shared by the pool, the transport
//! layer, and the status API: the chain identifier used as registry key, the
//! externally supplied chain configuration, and the pool-observable
//! connection state machine.

pub mod chain;
pub mod chain_id;
pub mod connection_state;

pub use chain::ChainConfig;
pub use chain_id::ChainId;
pub use connection_state::ConnectionState;
