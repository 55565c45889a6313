// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Row template: the group configuration every row is instantiated from.
//! Parsing is kept pure so it can be reused by the UI and tests.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::error::FieldGroupError;

/// Rows accepted through the add button unless configured otherwise.
pub const DEFAULT_MAX_ITEMS: usize = 12;

/// Sub-field widget kinds we know how to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubFieldKind {
    TextField,
    PathField,
    NumberField,
    Checkbox,
    Unknown(String),
}

impl SubFieldKind {
    /// Map an `xtype` token to a kind. Unknown tokens are kept verbatim.
    pub fn from_xtype(raw: &str) -> Self {
        match raw {
            "textfield" => Self::TextField,
            "pathfield" => Self::PathField,
            "numberfield" => Self::NumberField,
            "checkbox" | "selection" => Self::Checkbox,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::TextField => "textfield",
            Self::PathField => "pathfield",
            Self::NumberField => "numberfield",
            Self::Checkbox => "checkbox",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Whether the widget reacts to the repository path of the edited record.
    pub fn is_path_aware(&self) -> bool {
        matches!(self, Self::PathField)
    }
}

/// One declared sub-field of the row template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubFieldDecl {
    pub name: String,
    pub kind: SubFieldKind,
    pub label: Option<String>,
    /// Validation pattern, compiled separately by every row.
    pub regex: Option<String>,
    pub regex_text: Option<String>,
    pub read_only: bool,
    pub root_path: Option<String>,
    pub root_title: Option<String>,
}

/// Group configuration controlling a field group list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupTemplate {
    /// Name of the group as a whole (used for the type hint field).
    pub name: String,
    pub items: Vec<SubFieldDecl>,
    pub orderable: bool,
    pub read_only: bool,
    pub type_hint: Option<String>,
    pub max_items: usize,
}

impl GroupTemplate {
    /// Check naming invariants: at least one sub-field and unique names.
    pub fn validate(&self) -> Result<(), FieldGroupError> {
        if self.items.is_empty() {
            return Err(FieldGroupError::NoSubFields(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(FieldGroupError::UnnamedSubField {
                    group: self.name.clone(),
                    index,
                });
            }
            if !seen.insert(item.name.as_str()) {
                return Err(FieldGroupError::DuplicateSubField(item.name.clone()));
            }
            if let Some(pattern) = &item.regex {
                regex::Regex::new(pattern).map_err(|e| FieldGroupError::InvalidPattern {
                    name: item.name.clone(),
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

impl Default for GroupTemplate {
    /// Story teaser list: a page path plus a thumbnail image path.
    fn default() -> Self {
        let decl = |name: &str, label: &str| SubFieldDecl {
            name: name.to_string(),
            kind: SubFieldKind::PathField,
            label: Some(label.to_string()),
            regex: None,
            regex_text: None,
            read_only: false,
            root_path: Some("/content".to_string()),
            root_title: None,
        };
        Self {
            name: "./stories".to_string(),
            items: vec![decl("path", "Path"), decl("thumbnail", "Thumbnail")],
            orderable: true,
            read_only: false,
            type_hint: None,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateRaw {
    name: String,
    #[serde(default)]
    orderable: Option<bool>,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    type_hint: Option<String>,
    #[serde(default, alias = "maxEntries")]
    max_items: Option<usize>,
    #[serde(default)]
    root_path: Option<String>,
    #[serde(default)]
    root_title: Option<String>,
    #[serde(default)]
    field_config: FieldConfigRaw,
}

#[derive(Debug, Default, Deserialize)]
struct FieldConfigRaw {
    #[serde(default)]
    items: Vec<SubFieldRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubFieldRaw {
    #[serde(default)]
    name: String,
    #[serde(default)]
    xtype: Option<String>,
    #[serde(default)]
    field_label: Option<String>,
    #[serde(default)]
    regex: Option<String>,
    #[serde(default)]
    regex_text: Option<String>,
    #[serde(default)]
    read_only: bool,
}

/// Parse a group template from its JSON configuration.
///
/// Missing `orderable` defaults to `true`, missing `xtype` to `textfield` and
/// missing `maxItems` to [`DEFAULT_MAX_ITEMS`]. `rootPath`/`rootTitle` and the
/// group `readOnly` flag are pushed down to every sub-field declaration.
pub fn parse_group_template(json: &str) -> Result<GroupTemplate> {
    let raw: TemplateRaw =
        serde_json::from_str(json).context("Failed to parse field group template JSON")?;

    let items = raw
        .field_config
        .items
        .into_iter()
        .map(|item| SubFieldDecl {
            name: item.name.trim().to_string(),
            kind: SubFieldKind::from_xtype(item.xtype.as_deref().unwrap_or("textfield").trim()),
            label: item.field_label.filter(|l| !l.trim().is_empty()),
            regex: item.regex.filter(|r| !r.is_empty()),
            regex_text: item.regex_text,
            read_only: item.read_only || raw.read_only,
            root_path: raw.root_path.clone(),
            root_title: raw.root_title.clone(),
        })
        .collect();

    let template = GroupTemplate {
        name: raw.name,
        items,
        orderable: raw.orderable.unwrap_or(true),
        read_only: raw.read_only,
        type_hint: raw.type_hint.filter(|t| !t.trim().is_empty()),
        max_items: raw.max_items.unwrap_or(DEFAULT_MAX_ITEMS),
    };
    template.validate()?;
    Ok(template)
}
