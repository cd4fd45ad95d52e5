use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Marker shown in the example column when a property has no example.
pub const NO_EXAMPLE: &str = "N/A";

/// One-level property bag describing a request or response body.
///
/// Only `type`, `properties` and `required` are modelled. Anything deeper
/// than a property's own fields is kept opaque in `PropertySchema::nested`,
/// and the node as found is kept in `raw` for the verbatim rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub schema_type: Option<String>,
    /// Properties in document order
    pub properties: Vec<(String, PropertySchema)>,
    pub required: Vec<String>,
    pub raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    pub schema_type: Option<String>,
    pub description: Option<String>,
    /// `None` only when the key is absent; a JSON `null` example is `Some(Value::Null)`
    pub example: Option<Value>,
    pub enum_values: Option<Vec<String>>,
    /// Verbatim `properties` / `items` of a nested structure
    pub nested: Option<Value>,
}

/// Displayable row produced for one schema property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PropertyRow {
    pub name: String,
    /// Empty when the property declares no type
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: Option<String>,
    /// Canonical JSON text of the example, or `N/A`
    pub example: String,
    pub required: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<String>,
}

/// A schema rendered both as rows and as formatted JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderedSchema {
    pub rows: Vec<PropertyRow>,
    pub verbatim: String,
}

/// Displayable row for one operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParameterRow {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub required: bool,
    pub description: String,
    pub example: String,
}
