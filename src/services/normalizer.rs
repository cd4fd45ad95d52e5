use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::{
    EndpointRecord, MediaTypeContent, ParameterRecord, ParameterSchema, RequestBodyRecord,
    ResponseRecord, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_NAME,
    DEFAULT_PARAMETER_DESCRIPTION, DEFAULT_PARAMETER_EXAMPLE, DEFAULT_RESPONSE_DESCRIPTION,
    DEFAULT_SUMMARY,
};

/// Flattens a raw specification document into endpoint records.
pub struct SpecNormalizer;

impl SpecNormalizer {
    /// Normalize a document, stamping every record with the current time.
    pub fn normalize(doc: &Value) -> AppResult<Vec<EndpointRecord>> {
        Self::normalize_at(doc, OffsetDateTime::now_utc())
    }

    /// Normalize a document with a fixed `createdAt` timestamp.
    ///
    /// Paths are visited in document key order and, within a path, methods in
    /// document key order. Ids count up from 1 in that order.
    ///
    /// Only a non-object document root or a non-object `paths` value is an
    /// error. A document without `paths` yields no records.
    pub fn normalize_at(doc: &Value, created_at: OffsetDateTime) -> AppResult<Vec<EndpointRecord>> {
        let root = doc
            .as_object()
            .ok_or_else(|| AppError::MalformedDocument("document root is not an object".into()))?;

        let paths = match root.get("paths") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Object(paths)) => paths,
            Some(_) => {
                return Err(AppError::MalformedDocument(
                    "`paths` is not an object".into(),
                ))
            }
        };

        let mut records = Vec::new();
        let mut next_id: u64 = 1;

        for (path, item) in paths {
            let Some(methods) = item.as_object() else {
                tracing::trace!(path = %path, "path item is not an object, skipped");
                continue;
            };

            for (method, operation) in methods {
                records.push(Self::normalize_operation(
                    next_id, path, method, operation, created_at,
                ));
                next_id += 1;
            }
        }

        Ok(records)
    }

    fn normalize_operation(
        id: u64,
        path: &str,
        method: &str,
        operation: &Value,
        created_at: OffsetDateTime,
    ) -> EndpointRecord {
        let empty = Map::new();
        let op = operation.as_object().unwrap_or(&empty);

        EndpointRecord {
            id,
            path: path.to_string(),
            method: method.to_uppercase(),
            name: text_or(op.get("summary"), DEFAULT_NAME),
            summary: text_or(op.get("summary"), DEFAULT_SUMMARY),
            description: text_or(op.get("description"), DEFAULT_DESCRIPTION),
            parameters: Self::parameters(op.get("parameters")),
            request_body: Self::request_body(op.get("requestBody")),
            responses: Self::responses(op.get("responses")),
            tags: Self::tags(op.get("tags")),
            security: op
                .get("security")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            category: DEFAULT_CATEGORY.to_string(),
            subscribed: 0,
            latency: None,
            created_at,
        }
    }

    fn parameters(value: Option<&Value>) -> Vec<ParameterRecord> {
        let Some(params) = value.and_then(Value::as_array) else {
            return Vec::new();
        };

        params
            .iter()
            .filter_map(Value::as_object)
            .map(|param| ParameterRecord {
                name: text_or(param.get("name"), ""),
                location: text_or(param.get("in"), ""),
                required: param
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                description: text_or(param.get("description"), DEFAULT_PARAMETER_DESCRIPTION),
                example: match param.get("example") {
                    None | Some(Value::Null) => {
                        Value::String(DEFAULT_PARAMETER_EXAMPLE.to_string())
                    }
                    Some(example) => example.clone(),
                },
                schema: Self::parameter_schema(param.get("schema")),
            })
            .collect()
    }

    fn parameter_schema(value: Option<&Value>) -> ParameterSchema {
        let Some(schema) = value.and_then(Value::as_object) else {
            return ParameterSchema::default();
        };

        let mut extra = schema.clone();
        let schema_type = match extra.shift_remove("type") {
            Some(Value::String(t)) => Some(t),
            Some(other) => {
                // non-string `type` stays in the passthrough fields
                extra.insert("type".to_string(), other);
                None
            }
            None => None,
        };

        ParameterSchema { schema_type, extra }
    }

    fn request_body(value: Option<&Value>) -> Option<RequestBodyRecord> {
        let body = value?.as_object()?;

        Some(RequestBodyRecord {
            required: body
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            content: Self::content(body.get("content")),
        })
    }

    fn responses(value: Option<&Value>) -> Vec<ResponseRecord> {
        let Some(responses) = value.and_then(Value::as_object) else {
            return Vec::new();
        };

        responses
            .iter()
            .map(|(status_code, response)| {
                let response = response.as_object();
                ResponseRecord {
                    status_code: status_code.clone(),
                    description: text_or(
                        response.and_then(|r| r.get("description")),
                        DEFAULT_RESPONSE_DESCRIPTION,
                    ),
                    content: Self::content(response.and_then(|r| r.get("content"))),
                }
            })
            .collect()
    }

    fn content(value: Option<&Value>) -> Vec<MediaTypeContent> {
        let Some(content) = value.and_then(Value::as_object) else {
            return Vec::new();
        };

        content
            .iter()
            .map(|(media_type, entry)| {
                let mut extra = match entry {
                    Value::Object(fields) => fields.clone(),
                    Value::Null => Map::new(),
                    other => {
                        let mut fields = Map::new();
                        fields.insert("value".to_string(), other.clone());
                        fields
                    }
                };
                let schema = match extra.shift_remove("schema") {
                    None | Some(Value::Null) => Value::Object(Map::new()),
                    Some(schema) => schema,
                };

                MediaTypeContent {
                    media_type: media_type.clone(),
                    schema,
                    extra,
                }
            })
            .collect()
    }

    fn tags(value: Option<&Value>) -> Vec<String> {
        value
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .map(|tag| match tag {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A non-empty string field, or the given default.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}
