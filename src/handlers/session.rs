use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::EndpointSummaryResponse;
use crate::middlewares::LoadedCatalog;
use crate::models::EndpointView;
use crate::services::{DetailTab, ExplorerSession, SchemaWalker, SortKey};
use crate::state::AppState;

pub const NOTHING_SELECTED: &str = "Select an API from the sidebar to see its details";
pub const EMPTY_CATALOG: &str = "No APIs available";
pub const NO_RESULTS: &str = "No results found";

// ============ Request/Response DTOs ============

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub query: Option<String>,
    /// Sort key name or picker label
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSortRequest {
    /// Sort key name or picker label
    pub sort: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectEndpointRequest {
    pub id: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTabRequest {
    pub tab: DetailTab,
}

/// Content of the active detail tab
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum DetailPanel {
    Method {
        method: String,
        path: String,
    },
    Details {
        view: EndpointView,
    },
    Security {
        /// Formatted security requirements, absent when there are none
        security: Option<String>,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub query: String,
    pub sort: SortKey,
    pub tab: DetailTab,
    pub visible: Vec<EndpointSummaryResponse>,
    pub selected: Option<EndpointSummaryResponse>,
    pub panel: Option<DetailPanel>,
    /// Empty-state message for the list or detail pane
    pub notice: Option<String>,
}

impl SessionResponse {
    fn build(id: Uuid, session: &ExplorerSession) -> Self {
        let snapshot = session.current();

        let panel = snapshot.selected.map(|record| match snapshot.tab {
            DetailTab::Method => DetailPanel::Method {
                method: record.method.clone(),
                path: record.path.clone(),
            },
            DetailTab::Details => DetailPanel::Details {
                view: SchemaWalker::render_endpoint(record),
            },
            DetailTab::Security => DetailPanel::Security {
                security: SchemaWalker::render_endpoint(record).security,
            },
        });

        let notice = if session.catalog().is_empty() {
            Some(EMPTY_CATALOG)
        } else if snapshot.visible.is_empty() {
            Some(NO_RESULTS)
        } else if snapshot.selected.is_none() {
            Some(NOTHING_SELECTED)
        } else {
            None
        };

        Self {
            id,
            query: snapshot.query.to_string(),
            sort: snapshot.sort,
            tab: snapshot.tab,
            visible: snapshot
                .visible
                .iter()
                .map(|r| EndpointSummaryResponse::from(*r))
                .collect(),
            selected: snapshot.selected.map(EndpointSummaryResponse::from),
            panel,
            notice: notice.map(str::to_string),
        }
    }
}

// ============ Helpers ============

/// Run `change` on a stored session while holding its lock, after moving the
/// session onto the catalog this request sees.
async fn update_session<F>(
    state: &AppState,
    catalog: &LoadedCatalog,
    session_id: Uuid,
    change: F,
) -> AppResult<Json<SessionResponse>>
where
    F: FnOnce(&mut ExplorerSession) + Send,
{
    let handle = state
        .sessions
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session".to_string()))?;
    let mut session = handle.lock().await;

    if !Arc::ptr_eq(session.catalog(), &catalog.0) {
        tracing::debug!(%session_id, "Moving session onto reloaded catalog");
        session.replace_catalog(catalog.0.clone());
    }

    change(&mut *session);
    Ok(Json(SessionResponse::build(session_id, &session)))
}

// ============ Handlers ============

/// Start an explorer session over the current catalog
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Unknown sort key"),
        (status = 503, description = "Catalog not loaded")
    ),
    tag = "Sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Json(payload): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let mut session = ExplorerSession::new(catalog.0.clone());

    if let Some(sort) = payload.sort.as_deref() {
        session.set_sort(sort.parse()?);
    }
    if let Some(query) = payload.query {
        session.set_query(query);
    }

    let created = session.clone();
    let session_id = state.sessions.create(session).await?;
    tracing::debug!(%session_id, "Explorer session created");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::build(session_id, &created)),
    ))
}

/// Get the current state of a session
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 503, description = "Catalog not loaded")
    ),
    tag = "Sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    update_session(&state, &catalog, id, |_| {}).await
}

/// Change the search text
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/query",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateQueryRequest,
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn update_query(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQueryRequest>,
) -> AppResult<Json<SessionResponse>> {
    update_session(&state, &catalog, id, |session| {
        session.set_query(payload.query)
    })
    .await
}

/// Change the sort order
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/sort",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateSortRequest,
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 400, description = "Unknown sort key"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn update_sort(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSortRequest>,
) -> AppResult<Json<SessionResponse>> {
    let sort: SortKey = payload.sort.parse()?;
    update_session(&state, &catalog, id, |session| session.set_sort(sort)).await
}

/// Select an endpoint; the details tab becomes active
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/selection",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SelectEndpointRequest,
    responses(
        (status = 200, description = "Session state; `selected` is null for an unknown endpoint", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn select_endpoint(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectEndpointRequest>,
) -> AppResult<Json<SessionResponse>> {
    update_session(&state, &catalog, id, |session| {
        if !session.select(payload.id) {
            tracing::debug!(session_id = %id, endpoint_id = payload.id, "Selected endpoint not in catalog");
        }
    })
    .await
}

/// Switch the detail tab
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/tab",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateTabRequest,
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn update_tab(
    State(state): State<AppState>,
    catalog: LoadedCatalog,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTabRequest>,
) -> AppResult<Json<SessionResponse>> {
    update_session(&state, &catalog, id, |session| session.set_tab(payload.tab)).await
}

/// End a session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
