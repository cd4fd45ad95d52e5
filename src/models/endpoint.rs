use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

pub const DEFAULT_NAME: &str = "Unnamed API";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_SUMMARY: &str = "No summary available";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_PARAMETER_DESCRIPTION: &str = "No description";
pub const DEFAULT_PARAMETER_EXAMPLE: &str = "No example";
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "No description";

/// One (path, method) entry of a specification document with defaults applied.
///
/// `id` is a 1-based counter in document traversal order. It is only stable
/// within one normalization pass; use `(path, method)` to identify an
/// endpoint across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub id: u64,
    pub path: String,
    pub method: String, // upper-case HTTP verb
    pub name: String,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<ParameterRecord>,
    pub request_body: Option<RequestBodyRecord>,
    pub responses: Vec<ResponseRecord>,
    pub tags: Vec<String>,
    /// Security requirement objects, kept opaque
    pub security: Vec<Value>,

    // Display metadata, not derived from the document
    pub category: String,
    pub subscribed: u64,
    pub latency: Option<u64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl EndpointRecord {
    /// Whether this record answers to the given route. Method case is ignored.
    pub fn matches_route(&self, path: &str, method: &str) -> bool {
        self.path == path && self.method.eq_ignore_ascii_case(method)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub description: String,
    pub example: Value,
    pub schema: ParameterSchema,
}

/// Parameter schema. Only `type` is read; a missing type stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyRecord {
    pub required: bool,
    pub content: Vec<MediaTypeContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub status_code: String,
    pub description: String,
    pub content: Vec<MediaTypeContent>,
}

/// One entry of a request/response `content` mapping.
///
/// `schema` is kept as found (an empty object when absent) and any other
/// metadata on the entry (`example`, `examples`, `encoding`, ...) rides along
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaTypeContent {
    pub media_type: String,
    pub schema: Value,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub extra: Map<String, Value>,
}
