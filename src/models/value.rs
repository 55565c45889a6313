// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Value shapes flowing between a column-oriented record and row-oriented editors.
//!
//! A record stores one property per sub-field name. Each property is either
//! missing, a single scalar, or a sequence holding one value per row.

use indexmap::IndexMap;
use serde_json::Value;

/// One row as a flat `name -> value` mapping, in sub-field order.
pub type RowValue = IndexMap<String, Value>;

/// Raw property value fetched from a record for one sub-field name.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// Property not present (or JSON `null`).
    Absent,
    /// Single-valued property.
    Scalar(Value),
    /// Multi-valued property, one entry per row.
    Sequence(Vec<Value>),
}

impl RawValue {
    /// Classify a JSON value read from a record.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Array(items)) => Self::Sequence(items.clone()),
            Some(other) => Self::Scalar(other.clone()),
        }
    }

    /// Value this property contributes to row `index` when transposing a sequence.
    ///
    /// Short sequences, scalars and absent properties contribute `null`.
    pub fn cell(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Sequence(items) => items.get(index),
            Self::Absent | Self::Scalar(_) => None,
        }
    }

    /// Value this property contributes to a single wrapped row.
    pub fn as_single(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Scalar(v) => v.clone(),
            Self::Sequence(items) => Value::Array(items.clone()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
        }
    }
}

/// Row layout decided once per load from the first declared sub-field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// No data for this group.
    Absent,
    /// One row wrapping scalar properties.
    Single,
    /// `n` rows transposed from equal-length sequences (`n >= 1`).
    Rows(usize),
}

impl Shape {
    /// Decide the shape from the first raw value.
    ///
    /// An empty sequence counts as a single wrapped row, not as zero rows.
    pub fn of(first: Option<&RawValue>) -> Self {
        match first {
            None | Some(RawValue::Absent) => Self::Absent,
            Some(RawValue::Sequence(items)) if !items.is_empty() => Self::Rows(items.len()),
            Some(_) => Self::Single,
        }
    }
}

/// Transpose per-field raw values into row values.
///
/// Only the first field decides the shape. Siblings whose shape differs are
/// logged and contribute `null` where they cannot provide a cell.
pub fn transpose(raw: &IndexMap<String, RawValue>) -> Vec<RowValue> {
    let shape = Shape::of(raw.values().next());
    if let Some((first_name, first)) = raw.first() {
        for (name, value) in raw.iter().skip(1) {
            let mismatch = match (shape, value) {
                (Shape::Rows(n), RawValue::Sequence(items)) => items.len() != n,
                (Shape::Rows(_), _) => true,
                (Shape::Single, RawValue::Sequence(items)) => !items.is_empty(),
                _ => false,
            };
            if mismatch {
                tracing::warn!(
                    field = %name,
                    shape = value.kind(),
                    leading = %first_name,
                    leading_shape = first.kind(),
                    "sibling field shape differs from the leading field"
                );
            }
        }
    }

    match shape {
        Shape::Absent => Vec::new(),
        Shape::Single => vec![
            raw.iter()
                .map(|(name, value)| (name.clone(), value.as_single()))
                .collect(),
        ],
        Shape::Rows(size) => (0..size)
            .map(|i| {
                raw.iter()
                    .map(|(name, value)| {
                        let cell = value.cell(i).cloned().unwrap_or(Value::Null);
                        (name.clone(), cell)
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Normalized input for replacing the whole list.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ListValue {
    /// Clears every row.
    #[default]
    Empty,
    /// Exactly one row.
    Row(RowValue),
    /// One row per entry, in order.
    Rows(Vec<RowValue>),
}

impl ListValue {
    /// Normalize a loosely typed JSON value.
    ///
    /// `null` and `""` clear the list, arrays produce one row per element and
    /// anything else produces a single row. Elements that are not objects
    /// produce rows left at their defaults.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::Array(items) => Self::Rows(items.iter().map(row_from_json).collect()),
            other => Self::Row(row_from_json(other)),
        }
    }

    /// Row values in the order they will be applied.
    pub fn rows(&self) -> &[RowValue] {
        match self {
            Self::Empty => &[],
            Self::Row(row) => std::slice::from_ref(row),
            Self::Rows(rows) => rows,
        }
    }
}

impl From<Vec<RowValue>> for ListValue {
    fn from(rows: Vec<RowValue>) -> Self {
        Self::Rows(rows)
    }
}

impl From<RowValue> for ListValue {
    fn from(row: RowValue) -> Self {
        Self::Row(row)
    }
}

fn row_from_json(value: &Value) -> RowValue {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => RowValue::new(),
    }
}
