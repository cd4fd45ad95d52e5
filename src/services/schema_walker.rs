use serde::Serialize;
use serde_json::Value;

use crate::models::{
    EndpointRecord, EndpointView, MediaSchemaView, MediaTypeContent, ParameterRecord,
    ParameterRow, ParameterTable, PropertyRow, PropertySchema, RenderedSchema, RequestBodyView,
    ResponseView, SchemaNode, NO_EXAMPLE,
};

/// Renders schemas into table rows plus a formatted JSON echo.
///
/// Every function here is pure: the same input always renders the same output.
pub struct SchemaWalker;

impl SchemaWalker {
    /// Read a schema node from a raw JSON value. Non-object input gives a node
    /// with no properties.
    pub fn parse(value: &Value) -> SchemaNode {
        let Some(fields) = value.as_object() else {
            return SchemaNode {
                raw: value.clone(),
                ..SchemaNode::default()
            };
        };

        let properties = fields
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| (name.clone(), Self::parse_property(prop)))
                    .collect()
            })
            .unwrap_or_default();

        let required = fields
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        SchemaNode {
            schema_type: fields
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
            properties,
            required,
            raw: value.clone(),
        }
    }

    fn parse_property(value: &Value) -> PropertySchema {
        let Some(fields) = value.as_object() else {
            // Shorthand like `"id": "string"` is shown as written
            return PropertySchema {
                nested: Some(value.clone()),
                ..PropertySchema::default()
            };
        };

        PropertySchema {
            schema_type: fields
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
            description: fields
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            example: fields.get("example").cloned(),
            enum_values: fields.get("enum").and_then(Value::as_array).map(|values| {
                values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            }),
            nested: fields
                .get("properties")
                .or_else(|| fields.get("items"))
                .cloned(),
        }
    }

    /// Rows for each property, in the node's own property order.
    pub fn render_schema(node: &SchemaNode) -> Vec<PropertyRow> {
        node.properties
            .iter()
            .map(|(name, prop)| PropertyRow {
                name: name.clone(),
                property_type: prop.schema_type.clone().unwrap_or_default(),
                description: prop.description.clone(),
                example: match &prop.example {
                    Some(example) => example.to_string(),
                    None => NO_EXAMPLE.to_string(),
                },
                required: node.required.iter().any(|r| r == name)
                    || Self::flagged_required(&node.raw, name),
                enum_values: prop.enum_values.clone(),
                nested: prop.nested.as_ref().map(Value::to_string),
            })
            .collect()
    }

    // Older documents mark required-ness on the property itself.
    fn flagged_required(raw: &Value, name: &str) -> bool {
        raw.get("properties")
            .and_then(|props| props.get(name))
            .and_then(|prop| prop.get("required"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The whole node as formatted JSON text.
    pub fn verbatim(node: &SchemaNode) -> String {
        pretty(&node.raw)
    }

    /// Rows and verbatim text for one node.
    pub fn render(node: &SchemaNode) -> RenderedSchema {
        RenderedSchema {
            rows: Self::render_schema(node),
            verbatim: Self::verbatim(node),
        }
    }

    /// Parse and render a raw schema value.
    pub fn render_value(value: &Value) -> RenderedSchema {
        Self::render(&Self::parse(value))
    }

    pub fn render_parameters(params: &[ParameterRecord]) -> ParameterTable {
        let rows = params
            .iter()
            .map(|param| ParameterRow {
                name: param.name.clone(),
                location: param.location.clone(),
                parameter_type: param.schema.schema_type.clone().unwrap_or_default(),
                required: param.required,
                description: param.description.clone(),
                example: match &param.example {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect();

        ParameterTable {
            rows,
            verbatim: pretty(params),
        }
    }

    /// Render each media type entry separately, in content-map order.
    pub fn render_content(content: &[MediaTypeContent]) -> Vec<MediaSchemaView> {
        content
            .iter()
            .map(|entry| MediaSchemaView {
                media_type: entry.media_type.clone(),
                schema: Self::render_value(&entry.schema),
                extra: entry.extra.clone(),
            })
            .collect()
    }

    /// Full detail view of one endpoint record.
    pub fn render_endpoint(record: &EndpointRecord) -> EndpointView {
        EndpointView {
            id: record.id,
            method: record.method.clone(),
            path: record.path.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            parameters: Self::render_parameters(&record.parameters),
            request_body: record.request_body.as_ref().map(|body| RequestBodyView {
                required: body.required,
                content: Self::render_content(&body.content),
            }),
            responses: record
                .responses
                .iter()
                .map(|response| ResponseView {
                    status_code: response.status_code.clone(),
                    description: response.description.clone(),
                    content: Self::render_content(&response.content),
                })
                .collect(),
            security: if record.security.is_empty() {
                None
            } else {
                Some(pretty(&record.security))
            },
        }
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
