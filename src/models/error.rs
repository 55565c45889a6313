// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Typed failures raised while building a field group from configuration.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldGroupError {
    #[error("group '{0}' declares no sub-fields")]
    NoSubFields(String),
    #[error("sub-field #{index} in group '{group}' has no name")]
    UnnamedSubField { group: String, index: usize },
    #[error("sub-field name '{0}' is declared more than once")]
    DuplicateSubField(String),
    #[error("invalid validation pattern for sub-field '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },
    #[error("record must be a JSON object")]
    RecordNotObject,
}
