//! Progress endpoint: a single JSON record behind GET and PUT
//!
//! `GET` answers with the stored object, or `{}` when nothing is stored or
//! the stored value cannot be read. `PUT` overwrites the record (last write
//! wins) and answers `{"success": true}`; a body that is not a JSON object
//! or a failing store answers 500 with `{"error": "..."}`.

use serde_json::{Value, json};

use super::{KeyValueStore, PROGRESS_KEY, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

/// An incoming request
#[derive(Debug, Clone)]
pub struct StoreRequest {
    pub method: Method,
    pub body: Option<String>,
}

impl StoreRequest {
    pub fn get() -> Self {
        Self {
            method: Method::Get,
            body: None,
        }
    }

    pub fn put(body: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            body: Some(body.into()),
        }
    }
}

/// Status code plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: Value,
}

impl StoreResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            status: 500,
            body: json!({ "error": message.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Serves the progress record out of a key-value store
#[derive(Debug)]
pub struct ProgressEndpoint<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ProgressEndpoint<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, PROGRESS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn handle(&mut self, request: StoreRequest) -> StoreResponse {
        match request.method {
            Method::Get => StoreResponse::ok(self.read()),
            Method::Put => match self.write(request.body.as_deref().unwrap_or("")) {
                Ok(()) => StoreResponse::ok(json!({ "success": true })),
                Err(e) => {
                    log::error!("Progress PUT failed: {}", e);
                    StoreResponse::error(e)
                }
            },
        }
    }

    fn read(&self) -> Value {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) if value.is_object() => value,
                Ok(_) => {
                    log::warn!("Stored progress is not an object; serving {{}}");
                    json!({})
                }
                Err(e) => {
                    log::warn!("Stored progress is unreadable; serving {{}}: {}", e);
                    json!({})
                }
            },
            Ok(None) => json!({}),
            Err(e) => {
                log::warn!("Progress GET failed; serving {{}}: {}", e);
                json!({})
            }
        }
    }

    fn write(&mut self, body: &str) -> Result<(), StoreError> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(StoreError::InvalidRecord(json_kind(&value)));
        }
        self.store.put(&self.key, &value.to_string())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
