//! Chain configuration value object.
//!
//! [`ChainConfig`] carries everything a connection factory needs to build a
//! transport for one network: the stable identifier and the ordered list of
//! node endpoints. The pool itself never interprets the contents beyond the
//! chain id.

use serde::{Deserialize, Serialize};
use url::Url;

use super::ChainId;

/// Configuration for one blockchain network.
///
/// Loaded from the chains file at startup (or supplied programmatically by an
/// embedding application). Node order is the dial order: transports try the
/// first URL before rotating to the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Stable identifier, unique across the chains file.
    pub chain_id: ChainId,

    /// Human-readable network name, used for logging only.
    pub name: String,

    /// Ordered WebSocket node endpoints (`ws://` or `wss://`).
    pub nodes: Vec<Url>,
}

impl ChainConfig {
    /// Creates a configuration from its parts.
    #[must_use]
    pub fn new(chain_id: impl Into<ChainId>, name: impl Into<String>, nodes: Vec<Url>) -> Self {
        Self {
            chain_id: chain_id.into(),
            name: name.into(),
            nodes,
        }
    }
}
