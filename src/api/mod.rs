//! REST status surface: route handlers, DTOs, and router composition.
//!
//! Read-only by construction: the pool is driven by the process and its
//! lifecycle bus, never by HTTP callers.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// OpenAPI document for the status surface.
#[cfg(feature = "swagger-ui")]
#[derive(Debug, utoipa::OpenApi)]
#[openapi(
    paths(handlers::system::health_handler, handlers::chains::list_chains_handler),
    components(schemas(dto::ChainStatusDto, dto::ChainListResponse))
)]
pub struct ApiDoc;

/// Builds the complete API router with all status endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    };

    router
}
