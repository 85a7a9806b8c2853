//! Route handlers for the status API.

pub mod chains;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    chains::routes()
}
