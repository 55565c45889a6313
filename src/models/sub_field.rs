// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Single-value sub-field instances living inside a row.

use regex::Regex;
use serde_json::Value;

use crate::models::template::{SubFieldDecl, SubFieldKind};

/// Editable single-value field built from a [`SubFieldDecl`].
///
/// Every row builds its own instances, so sibling rows never share config
/// (including the compiled validation pattern).
#[derive(Clone, Debug)]
pub struct SubField {
    decl: SubFieldDecl,
    pattern: Option<Regex>,
    value: Value,
    enabled: bool,
    path: Option<String>,
}

impl SubField {
    /// Build a fresh instance from its declaration.
    ///
    /// Patterns are checked when the template is validated; one that still
    /// fails to compile here simply disables validation for the field.
    pub fn new(decl: &SubFieldDecl) -> Self {
        let pattern = decl.regex.as_deref().and_then(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(
                    field = %decl.name,
                    error = %err,
                    "ignoring invalid validation pattern"
                );
                None
            }
        });
        Self {
            decl: decl.clone(),
            pattern,
            value: Value::Null,
            enabled: true,
            path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn kind(&self) -> &SubFieldKind {
        &self.decl.kind
    }

    pub fn label(&self) -> &str {
        self.decl.label.as_deref().unwrap_or(&self.decl.name)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
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

    pub fn is_read_only(&self) -> bool {
        self.decl.read_only
    }

    pub fn root_path(&self) -> Option<&str> {
        self.decl.root_path.as_deref()
    }

    pub fn root_title(&self) -> Option<&str> {
        self.decl.root_title.as_deref()
    }

    /// Repository path handed down by the owning list (path-aware kinds only).
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Receive the repository path of the edited record.
    ///
    /// Returns `false` when this kind does not react to paths.
    pub fn process_path(&mut self, path: &str) -> bool {
        if !self.decl.kind.is_path_aware() {
            return false;
        }
        self.path = Some(path.to_string());
        true
    }

    /// Text shown in a single-line editor.
    pub fn display_text(&self) -> String {
        value_to_text(&self.value)
    }

    /// Validation failure message, if any.
    ///
    /// Empty values always pass; numbers must parse; patterns must match the
    /// displayed text.
    pub fn validation_error(&self) -> Option<String> {
        let text = self.display_text();
        if text.is_empty() {
            return None;
        }
        if self.decl.kind == SubFieldKind::NumberField
            && !self.value.is_number()
            && text.trim().parse::<f64>().is_err()
        {
            return Some(format!("'{}' must be a number", self.label()));
        }
        match &self.pattern {
            Some(re) if !re.is_match(&text) => Some(
                self.decl
                    .regex_text
                    .clone()
                    .unwrap_or_else(|| format!("'{}' has an invalid format", self.label())),
            ),
            _ => None,
        }
    }
}

/// Render a scalar JSON value the way a text widget would show it.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
