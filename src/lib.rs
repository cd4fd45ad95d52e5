// Library crate for the spec explorer
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod sessions;
pub mod state;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    create_session, delete_session, get_catalog_status, get_endpoint, get_endpoint_view,
    get_session, health, list_endpoints, reload_catalog, render_schema, select_endpoint,
    update_query, update_sort, update_tab,
};
use crate::middlewares::catalog_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Catalog routes (answer 503 until a catalog is loaded)
    let catalog_routes = Router::new()
        // Endpoint routes
        .route("/api/endpoints", get(list_endpoints))
        .route("/api/endpoints/{id}", get(get_endpoint))
        .route("/api/endpoints/{id}/view", get(get_endpoint_view))
        // Session routes
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/query", put(update_query))
        .route("/api/sessions/{id}/sort", put(update_sort))
        .route("/api/sessions/{id}/selection", put(select_endpoint))
        .route("/api/sessions/{id}/tab", put(update_tab))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            catalog_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        // Catalog lifecycle
        .route("/api/catalog", get(get_catalog_status))
        .route("/api/catalog/reload", post(reload_catalog))
        // Standalone schema rendering
        .route("/api/schema/render", post(render_schema))
        .merge(catalog_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
