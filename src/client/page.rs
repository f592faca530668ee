//! One page of a paginated collection

use serde_json::{Map, Value};

use super::error::{ClientError, Result};

/// A record of a collection, kept as plain JSON
pub type Record = Value;

/// One server response of a paginated collection
///
/// Metadata fields the server did not report are `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Record>,
    pub start_at: Option<u64>,
    pub max_results: Option<u64>,
    pub total: Option<u64>,
    pub is_last: Option<bool>,
    pub next: Option<String>,
}

impl Page {
    /// Split a response body into pagination metadata and the items under `data_key`
    ///
    /// A missing or `null` data key yields no items.
    pub fn parse(body: Value, data_key: &str, operation: &str) -> Result<Self> {
        let Value::Object(mut fields) = body else {
            return Err(ClientError::malformed_page(operation, "body", "is not a JSON object"));
        };

        let items = match fields.remove(data_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ClientError::malformed_page(operation, data_key, "is not an array"))
            },
        };

        Ok(Self {
            items,
            start_at: unsigned(&fields, "startAt", operation)?,
            max_results: unsigned(&fields, "maxResults", operation)?,
            total: unsigned(&fields, "total", operation)?,
            is_last: boolean(&fields, "isLast", operation)?,
            next: link(&fields, "next", operation)?,
        })
    }

    /// All of `startAt`, `maxResults` and `total` reported as zero
    pub fn is_degenerate(&self) -> bool {
        self.start_at == Some(0) && self.max_results == Some(0) && self.total == Some(0)
    }
}

fn unsigned(fields: &Map<String, Value>, field: &str, operation: &str) -> Result<Option<u64>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ClientError::malformed_page(operation, field, "is not a non-negative integer")
        }),
    }
}

fn boolean(fields: &Map<String, Value>, field: &str, operation: &str) -> Result<Option<bool>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ClientError::malformed_page(operation, field, "is not a boolean")),
    }
}

fn link(fields: &Map<String, Value>, field: &str, operation: &str) -> Result<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ClientError::malformed_page(operation, field, "is not a string")),
    }
}
