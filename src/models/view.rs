use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::{ParameterRow, RenderedSchema};

/// Everything the detail pane shows for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EndpointView {
    pub id: u64,
    pub method: String,
    pub path: String,
    pub name: String,
    pub description: String,
    pub parameters: ParameterTable,
    pub request_body: Option<RequestBodyView>,
    pub responses: Vec<ResponseView>,
    /// Formatted security requirements, `None` when there are none
    pub security: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParameterTable {
    pub rows: Vec<ParameterRow>,
    pub verbatim: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequestBodyView {
    pub required: bool,
    pub content: Vec<MediaSchemaView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResponseView {
    pub status_code: String,
    pub description: String,
    pub content: Vec<MediaSchemaView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaSchemaView {
    pub media_type: String,
    pub schema: RenderedSchema,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}
