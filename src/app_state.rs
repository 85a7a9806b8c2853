//! Shared application state injected into all Axum handlers.

use crate::pool::ConnectionPool;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the process-wide connection pool.
    pub pool: ConnectionPool,
}
