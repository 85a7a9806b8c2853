//! DTOs describing per-chain connectivity.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ChainId, ConnectionState};

/// Connectivity snapshot of one managed chain.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChainStatusDto {
    /// Chain identifier.
    pub chain_id: String,
    /// State discriminator (`not_connected`, `connecting`, `connected`,
    /// `waiting_reconnect`).
    pub status: String,
    /// Node URL associated with the state, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ChainStatusDto {
    /// Builds the DTO from a pool snapshot entry.
    #[must_use]
    pub fn from_state(chain_id: &ChainId, state: &ConnectionState) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            status: state.status_str().to_string(),
            url: state.url().map(url::Url::to_string),
        }
    }
}

/// Response wrapper for the chain list endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChainListResponse {
    /// Number of chains currently connected.
    pub connected: usize,
    /// Number of managed chains.
    pub total: usize,
    /// Per-chain snapshots.
    pub chains: Vec<ChainStatusDto>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn connected_state_includes_url() {
        let Ok(url) = Url::parse("wss://rpc.example.org/") else {
            panic!("valid url");
        };
        let dto = ChainStatusDto::from_state(
            &ChainId::from("polkadot"),
            &ConnectionState::Connected { url },
        );
        assert_eq!(dto.status, "connected");
        assert_eq!(dto.url.as_deref(), Some("wss://rpc.example.org/"));
    }

    #[test]
    fn idle_state_omits_url_when_serialized() {
        let dto =
            ChainStatusDto::from_state(&ChainId::from("polkadot"), &ConnectionState::idle());
        let json = serde_json::to_string(&dto).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(!json.contains("url"));
        assert!(json.contains("not_connected"));
    }
}
