use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::models::RenderedSchema;
use crate::services::SchemaWalker;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderSchemaRequest {
    /// Any JSON schema value; non-objects render as an empty table
    #[schema(value_type = Object)]
    pub schema: Value,
}

/// Render a schema into property rows and its verbatim form
#[utoipa::path(
    post,
    path = "/api/schema/render",
    request_body = RenderSchemaRequest,
    responses(
        (status = 200, description = "Rendered schema", body = RenderedSchema),
        (status = 400, description = "Invalid request body")
    ),
    tag = "Schema"
)]
pub async fn render_schema(
    Json(payload): Json<RenderSchemaRequest>,
) -> AppResult<Json<RenderedSchema>> {
    Ok(Json(SchemaWalker::render_value(&payload.schema)))
}
