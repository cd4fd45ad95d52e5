use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::ListParams;
use crate::middlewares::LoadedCatalog;
use crate::models::{
    EndpointRecord, EndpointView, ParameterRecord, RequestBodyRecord, ResponseRecord,
};
use crate::services::{Catalog, SchemaWalker};
use crate::state::{AppState, LoadState};

// ============ Response DTOs ============

/// Compact endpoint entry for list views
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointSummaryResponse {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub method: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub subscribed: u64,
    pub latency: Option<u64>,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

impl From<&EndpointRecord> for EndpointSummaryResponse {
    fn from(r: &EndpointRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            path: r.path.clone(),
            method: r.method.clone(),
            description: r.description.clone(),
            tags: r.tags.clone(),
            category: r.category.clone(),
            subscribed: r.subscribed,
            latency: r.latency,
            created_at: r.created_at,
        }
    }
}

/// Full endpoint record
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointResponse {
    pub id: u64,
    pub name: String,
    pub summary: String,
    pub path: String,
    pub method: String,
    pub description: String,
    #[schema(value_type = Vec<Object>)]
    pub parameters: Vec<ParameterRecord>,
    #[schema(value_type = Option<Object>)]
    pub request_body: Option<RequestBodyRecord>,
    #[schema(value_type = Vec<Object>)]
    pub responses: Vec<ResponseRecord>,
    pub tags: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub security: Vec<serde_json::Value>,
    pub category: String,
    pub subscribed: u64,
    pub latency: Option<u64>,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

impl From<&EndpointRecord> for EndpointResponse {
    fn from(r: &EndpointRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            summary: r.summary.clone(),
            path: r.path.clone(),
            method: r.method.clone(),
            description: r.description.clone(),
            parameters: r.parameters.clone(),
            request_body: r.request_body.clone(),
            responses: r.responses.clone(),
            tags: r.tags.clone(),
            security: r.security.clone(),
            category: r.category.clone(),
            subscribed: r.subscribed,
            latency: r.latency,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointListResponse {
    pub data: Vec<EndpointSummaryResponse>,
    /// Number of records matching the query
    pub total: u64,
    /// Number of records in the catalog
    pub catalog_size: u64,
    pub query: String,
    pub sort: String,
}

/// Load status of the served catalog
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogStatusResponse {
    /// `loading`, `loaded` or `failed`
    pub status: String,
    pub source: String,
    pub endpoint_count: u64,
    pub last_error: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(with = "time::serde::rfc3339::option")]
    pub loaded_at: Option<time::OffsetDateTime>,
}

// ============ Handlers ============

/// Catalog load status
#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Catalog status", body = CatalogStatusResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_catalog_status(
    State(state): State<AppState>,
) -> AppResult<Json<CatalogStatusResponse>> {
    let status = state.catalog.status().await;
    let endpoint_count = match &status.state {
        LoadState::Loaded(catalog) => catalog.len() as u64,
        _ => 0,
    };

    Ok(Json(CatalogStatusResponse {
        status: status.state.as_str().to_string(),
        source: state.loader.describe(),
        endpoint_count,
        last_error: status.last_error,
        loaded_at: status.loaded_at,
    }))
}

/// Reload the specification document and replace the catalog
#[utoipa::path(
    post,
    path = "/api/catalog/reload",
    responses(
        (status = 200, description = "Catalog reloaded", body = CatalogStatusResponse),
        (status = 422, description = "Document is structurally invalid"),
        (status = 502, description = "Document could not be loaded")
    ),
    tag = "Catalog"
)]
pub async fn reload_catalog(
    State(state): State<AppState>,
) -> AppResult<Json<CatalogStatusResponse>> {
    state.reload().await?;
    get_catalog_status(State(state)).await
}

/// List endpoints, filtered by name and sorted
#[utoipa::path(
    get,
    path = "/api/endpoints",
    params(ListParams),
    responses(
        (status = 200, description = "Matching endpoints", body = EndpointListResponse),
        (status = 400, description = "Unknown sort key"),
        (status = 503, description = "Catalog not loaded")
    ),
    tag = "Endpoints"
)]
pub async fn list_endpoints(
    catalog: LoadedCatalog,
    Query(params): Query<ListParams>,
) -> AppResult<Json<EndpointListResponse>> {
    let sort = params.sort_key()?;
    let query = params.q.unwrap_or_default();

    let records = catalog.view(&query, sort);

    Ok(Json(EndpointListResponse {
        total: records.len() as u64,
        catalog_size: catalog.len() as u64,
        data: records.into_iter().map(EndpointSummaryResponse::from).collect(),
        query,
        sort: sort.as_str().to_string(),
    }))
}

/// Get an endpoint by ID
#[utoipa::path(
    get,
    path = "/api/endpoints/{id}",
    params(
        ("id" = u64, Path, description = "Endpoint ID (valid for the current catalog only)")
    ),
    responses(
        (status = 200, description = "Endpoint details", body = EndpointResponse),
        (status = 404, description = "No details available"),
        (status = 503, description = "Catalog not loaded")
    ),
    tag = "Endpoints"
)]
pub async fn get_endpoint(
    catalog: LoadedCatalog,
    Path(id): Path<u64>,
) -> AppResult<Json<EndpointResponse>> {
    let record = find_endpoint(&catalog, id)?;
    Ok(Json(record.into()))
}

/// Get the rendered parameter, request body, response and security view
#[utoipa::path(
    get,
    path = "/api/endpoints/{id}/view",
    params(
        ("id" = u64, Path, description = "Endpoint ID (valid for the current catalog only)")
    ),
    responses(
        (status = 200, description = "Rendered endpoint", body = EndpointView),
        (status = 404, description = "No details available"),
        (status = 503, description = "Catalog not loaded")
    ),
    tag = "Endpoints"
)]
pub async fn get_endpoint_view(
    catalog: LoadedCatalog,
    Path(id): Path<u64>,
) -> AppResult<Json<EndpointView>> {
    let record = find_endpoint(&catalog, id)?;
    Ok(Json(SchemaWalker::render_endpoint(record)))
}

fn find_endpoint(catalog: &Catalog, id: u64) -> AppResult<&EndpointRecord> {
    catalog
        .find_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Endpoint {}", id)))
}
