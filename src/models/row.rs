// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! One repeatable row of a field group.

use std::fmt;

use uuid::Uuid;

use crate::models::sub_field::SubField;
use crate::models::template::GroupTemplate;
use crate::models::value::RowValue;

/// Stable identity of a row; survives value swaps during reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row: one sub-field instance per declared name, plus row affordances.
#[derive(Clone, Debug)]
pub struct FieldGroupRow {
    id: RowId,
    fields: Vec<SubField>,
    orderable: bool,
    read_only: bool,
}

impl FieldGroupRow {
    /// Instantiate every declared sub-field afresh from the template.
    ///
    /// A read-only group makes every sub-field read-only.
    pub fn new(template: &GroupTemplate) -> Self {
        let fields = template
            .items
            .iter()
            .map(|decl| {
                let mut decl = decl.clone();
                decl.read_only |= template.read_only;
                SubField::new(&decl)
            })
            .collect();
        Self {
            id: RowId::new(),
            fields,
            orderable: template.orderable,
            read_only: template.read_only,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn fields(&self) -> &[SubField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [SubField] {
        &mut self.fields
    }

    /// Whether up/down controls are shown.
    pub fn shows_reorder_controls(&self) -> bool {
        self.orderable && !self.read_only
    }

    /// Whether the remove control is shown.
    pub fn shows_remove_control(&self) -> bool {
        !self.read_only
    }

    /// Flat `name -> value` mapping of every sub-field.
    pub fn value(&self) -> RowValue {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.value().clone()))
            .collect()
    }

    /// Merge `value` into the row.
    ///
    /// Keys without a matching sub-field are ignored; sub-fields without a
    /// matching key keep their current value.
    pub fn set_value(&mut self, value: &RowValue) {
        for (key, v) in value {
            for field in self.fields.iter_mut().filter(|f| f.name() == key) {
                field.set_value(v.clone());
            }
        }
    }

    /// Swap values with `target`; sub-field instances stay where they are.
    pub fn reorder(&mut self, target: &mut FieldGroupRow) {
        let saved = target.value();
        target.set_value(&self.value());
        self.set_value(&saved);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        for field in &mut self.fields {
            if enabled {
                field.enable();
            } else {
                field.disable();
            }
        }
    }

    /// Hand the repository path to every path-aware sub-field.
    pub fn process_path(&mut self, path: &str) {
        for field in &mut self.fields {
            field.process_path(path);
        }
    }

    /// Validation failures of enabled sub-fields, as `(name, message)`.
    pub fn validation_errors(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|f| f.is_enabled())
            .filter_map(|f| f.validation_error().map(|msg| (f.name().to_string(), msg)))
            .collect()
    }
}
