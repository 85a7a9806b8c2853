//! Chain status endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ChainListResponse, ChainStatusDto};
use crate::app_state::AppState;

/// `GET /api/v1/chains` — Connectivity snapshot for every managed chain.
#[utoipa::path(
    get,
    path = "/api/v1/chains",
    tag = "Chains",
    summary = "List managed chains",
    description = "Returns the current connection state for every chain the pool manages.",
    responses(
        (status = 200, description = "Snapshot of all managed chains", body = ChainListResponse),
    )
)]
pub async fn list_chains_handler(State(state): State<AppState>) -> impl IntoResponse {
    let states = state.pool.chain_states();
    let connected = states.iter().filter(|(_, s)| s.is_connected()).count();
    let chains: Vec<ChainStatusDto> = states
        .iter()
        .map(|(chain_id, s)| ChainStatusDto::from_state(chain_id, s))
        .collect();
    Json(ChainListResponse {
        connected,
        total: chains.len(),
        chains,
    })
}

/// Builds the chain status routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/chains", get(list_chains_handler))
}
