use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Catalog load state: `loading`, `loaded` or `failed`
    pub catalog: String,
    /// Number of live explorer sessions
    pub sessions: u64,
}

/// Liveness check; answers even while the catalog is loading
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let catalog = state.catalog.state().await;
    let sessions = state.sessions.count().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        catalog: catalog.as_str().to_string(),
        sessions,
    }))
}
