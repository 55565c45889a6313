// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form submission for a field group and its application to a record.
//!
//! Responsibilities:
//! - Flatten the control into ordered form parameters, skipping disabled handles.
//! - Apply parameters to a column-oriented record: delete markers first, then
//!   one property per name, array-valued when more than one row was posted or
//!   when an array type hint is present.

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::hidden::{DELETE_SUFFIX, TYPEHINT_SUFFIX};
use crate::models::list::FieldGroupList;
use crate::models::record::JsonRecord;

/// One posted `name = value` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct FormParam {
    pub name: String,
    pub value: Value,
}

impl FormParam {
    fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Collect the parameters a form would post for this control.
///
/// Row values come first in visual order, followed by the delete markers and
/// the type hint. Disabled sub-fields and hidden fields are not posted.
pub fn submit(list: &FieldGroupList) -> Vec<FormParam> {
    let mut params = Vec::new();
    for row in list.rows() {
        for field in row.fields().iter().filter(|f| f.is_enabled()) {
            params.push(FormParam::new(field.name(), field.value().clone()));
        }
    }
    for marker in list.delete_markers().values().filter(|m| m.is_enabled()) {
        params.push(FormParam::new(marker.name(), Value::String(marker.value().to_string())));
    }
    if let Some(hint) = list.type_hint().filter(|h| h.is_enabled()) {
        params.push(FormParam::new(hint.name(), Value::String(hint.value().to_string())));
    }
    params
}

/// Apply posted parameters to `record`, returning the names that changed.
pub fn apply_submission(record: &mut JsonRecord, params: &[FormParam]) -> Vec<String> {
    let mut deletes = Vec::new();
    let mut force_array = false;
    let mut values: IndexMap<&str, Vec<Value>> = IndexMap::new();

    for param in params {
        if let Some(target) = param.name.strip_suffix(DELETE_SUFFIX) {
            deletes.push(target.to_string());
        } else if param.name.ends_with(TYPEHINT_SUFFIX) {
            force_array |= param.value.as_str().is_some_and(|t| t.ends_with("[]"));
        } else {
            values
                .entry(param.name.as_str())
                .or_default()
                .push(param.value.clone());
        }
    }

    let mut touched = Vec::new();
    for name in deletes {
        if record.remove(&name).is_some() {
            tracing::debug!(property = %name, "property deleted");
        }
        touched.push(name);
    }

    for (name, mut posted) in values {
        let value = if posted.len() == 1 && !force_array {
            posted.remove(0)
        } else {
            Value::Array(posted)
        };
        record.insert(name, value);
        if !touched.iter().any(|t| t == name) {
            touched.push(name.to_string());
        }
    }
    touched
}

/// Write the list back into `record` the way a form post would.
pub fn write_back(list: &FieldGroupList, record: &mut JsonRecord) -> Vec<String> {
    let params = submit(list);
    let touched = apply_submission(record, &params);
    tracing::info!(
        group = %list.name(),
        rows = list.len(),
        properties = touched.len(),
        "record updated"
    );
    touched
}
