// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Auxiliary hidden form values posted next to the visible sub-fields.

/// Suffix marking a property for removal by the storage layer.
pub const DELETE_SUFFIX: &str = "@Delete";
/// Suffix carrying the stored type of a property.
pub const TYPEHINT_SUFFIX: &str = "@TypeHint";

/// A hidden form value that can be enabled or disabled with its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenField {
    name: String,
    value: String,
    enabled: bool,
}

impl HiddenField {
    /// Delete marker for one sub-field: `<field>@Delete`.
    pub fn delete_marker(field: &str) -> Self {
        Self {
            name: format!("{field}{DELETE_SUFFIX}"),
            value: String::new(),
            enabled: true,
        }
    }

    /// Type hint for a group: `<group>@TypeHint = <type>[]`.
    ///
    /// The group is multi-valued by construction, so the hint is always the
    /// array form of the configured type.
    pub fn type_hint(group: &str, type_hint: &str) -> Self {
        Self {
            name: format!("{group}{TYPEHINT_SUFFIX}"),
            value: format!("{type_hint}[]"),
            enabled: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}
