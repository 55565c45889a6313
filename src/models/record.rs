// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Record accessor used to read column-oriented properties.

use serde_json::{Map, Value};

use crate::models::error::FieldGroupError;
use crate::models::value::RawValue;

/// Opaque key-value view of a stored record.
pub trait Record {
    /// Raw value of the property called `name`.
    fn get(&self, name: &str) -> RawValue;
}

/// Record backed by a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonRecord {
    properties: Map<String, Value>,
}

impl JsonRecord {
    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, FieldGroupError> {
        match value {
            Value::Object(properties) => Ok(Self { properties }),
            _ => Err(FieldGroupError::RecordNotObject),
        }
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.shift_remove(name)
    }
}

impl From<JsonRecord> for Value {
    fn from(record: JsonRecord) -> Self {
        Value::Object(record.properties)
    }
}

impl Record for JsonRecord {
    fn get(&self, name: &str) -> RawValue {
        RawValue::from_json(self.properties.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_properties() {
        let record = JsonRecord::from_value(json!({"a": ["x"], "b": "y", "c": null})).unwrap();

        assert_eq!(record.get("a"), RawValue::Sequence(vec![json!("x")]));
        assert_eq!(record.get("b"), RawValue::Scalar(json!("y")));
        assert_eq!(record.get("c"), RawValue::Absent);
        assert_eq!(record.get("missing"), RawValue::Absent);
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(
            JsonRecord::from_value(json!([1, 2])),
            Err(FieldGroupError::RecordNotObject)
        );
    }
}
