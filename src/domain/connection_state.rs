//! Pool-observable lifecycle state of a persistent connection.
//!
//! Transports raise [`ConnectionState`] transitions; the pool relays them to
//! subscribers without driving the machine itself. The legal transitions are
//! `NotConnected → Connecting → Connected`, `Connected → WaitingReconnect →
//! Connecting`, and any state `→ NotConnected` on a forced disconnect.

use serde::Serialize;
use url::Url;

/// Connectivity state of one chain's persistent transport.
///
/// Each variant carries the node URL in use where one is known. Connectivity
/// failures are never modeled as errors at the pool layer; they surface only
/// as a transition into [`ConnectionState::WaitingReconnect`] or
/// [`ConnectionState::NotConnected`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionState {
    /// No transport activity. The initial state, and the state after a
    /// forced disconnect.
    NotConnected {
        /// Last node URL in use, if the connection was ever attempted.
        url: Option<Url>,
    },

    /// A dial to the given node is in flight.
    Connecting {
        /// Node being dialed.
        url: Url,
    },

    /// The socket to the given node is open.
    Connected {
        /// Node currently serving the connection.
        url: Url,
    },

    /// The socket dropped; the transport will retry on its own schedule.
    WaitingReconnect {
        /// Node that dropped (the next attempt may rotate to another).
        url: Url,
    },
}

impl ConnectionState {
    /// The state a chain reports before any connection has been set up.
    #[must_use]
    pub const fn idle() -> Self {
        Self::NotConnected { url: None }
    }

    /// Returns the node URL associated with this state, if any.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        match self {
            Self::NotConnected { url } => url.as_ref(),
            Self::Connecting { url } | Self::Connected { url } | Self::WaitingReconnect { url } => {
                Some(url)
            }
        }
    }

    /// Returns `true` if the socket is currently open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Returns the state discriminator as a static string slice.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::NotConnected { .. } => "not_connected",
            Self::Connecting { .. } => "connecting",
            Self::Connected { .. } => "connected",
            Self::WaitingReconnect { .. } => "waiting_reconnect",
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::idle()
    }
}
