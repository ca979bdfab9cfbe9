//! Decoded input records.
//!
//! A `Record` is an ordered list of named values. Field order is preserved
//! from the source document (or from the projection field list) and takes
//! part in equality, so two projections over the same field list compare
//! field by field.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::Serialize;

/// An ordered, dynamically typed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Decode a JSON document into a record.
    ///
    /// Only JSON objects are records; `source_name` identifies the document
    /// in the error otherwise.
    pub fn from_json(json: serde_json::Value, source_name: &str) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => {
                let mut record = Record::with_capacity(map.len());
                for (name, value) in map {
                    record.insert(name, Value::from(value));
                }
                Ok(record)
            }
            other => Err(Error::Decode {
                source_name: source_name.to_string(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Insert a field, replacing the value in place if the name exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Look up a field, failing with `MissingField` if it is absent.
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| Error::MissingField {
            field: name.to_string(),
            available: self.field_names().map(str::to_string).collect(),
        })
    }

    pub fn str_field(&self, name: &str) -> Result<String> {
        match self.require(name)? {
            Value::Str(s) => Ok(s.clone()),
            other => Err(mismatch(name, "string", other)),
        }
    }

    pub fn opt_str_field(&self, name: &str) -> Result<Option<String>> {
        match self.require(name)? {
            Value::Null => Ok(None),
            Value::Str(s) => Ok(Some(s.clone())),
            other => Err(mismatch(name, "string", other)),
        }
    }

    pub fn int_field(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch(name, "integer", other)),
        }
    }

    pub fn float_field(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| mismatch(name, "float", value))
    }

    pub fn opt_float_field(&self, name: &str) -> Result<Option<f64>> {
        match self.require(name)? {
            Value::Null => Ok(None),
            value => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| mismatch(name, "float", value)),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

fn mismatch(field: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
