use crate::error::{MapiError, MapiResult};
use serde_json::{Map, Value};

/// A decoded MAPI payload: a JSON object that names its sender in `app`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// Decodes and shape-checks raw bytes.
    pub fn decode(raw: &[u8]) -> MapiResult<Self> {
        let value: Value = serde_json::from_slice(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> MapiResult<Self> {
        let Value::Object(fields) = value else {
            return Err(MapiError::NotMapping);
        };
        match fields.get("app") {
            Some(Value::String(_)) => Ok(Self { fields }),
            _ => Err(MapiError::MissingApp),
        }
    }

    pub fn app(&self) -> &str {
        self.fields
            .get("app")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
