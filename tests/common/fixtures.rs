use serde_json::{json, Value};

/// Single-operation document with a body parameter
pub fn tscore_document() -> Value {
    json!({
        "paths": {
            "/tscore": {
                "post": {
                    "summary": "tScore",
                    "parameters": [
                        {"name": "msisdn", "in": "body", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {"200": {"description": "OK"}}
                }
            }
        }
    })
}

/// Five operations across three paths.
///
/// Ids in document order: 1 tScore, 2 List users, 3 Create user, 4 Get pet,
/// 5 Unnamed API.
pub fn explorer_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Explorer fixture", "version": "1.0.0"},
        "paths": {
            "/tscore": {
                "post": {
                    "summary": "tScore",
                    "responses": {"200": {"description": "OK"}}
                }
            },
            "/users": {
                "get": {
                    "summary": "List users",
                    "description": "Paged list of users",
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "integer"}, "example": 20},
                        {"name": "cursor", "in": "query", "description": "Page cursor"}
                    ],
                    "responses": {
                        "200": {
                            "description": "A page of users",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["items"],
                                        "properties": {
                                            "items": {"type": "array", "items": {"type": "object"}},
                                            "next": {"type": "string", "description": "Next cursor", "example": "abc"}
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create user",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "role": {"type": "string", "enum": ["admin", "member"]}
                                    }
                                }
                            }
                        }
                    },
                    "responses": {"201": {"description": "Created"}}
                }
            },
            "/pets/{id}": {
                "get": {
                    "summary": "Get pet",
                    "security": [{"api_key": []}],
                    "responses": {"200": {}}
                }
            },
            "/zeta": {
                "delete": {}
            }
        }
    })
}
