// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reading and writing record and template files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::record::JsonRecord;
use crate::models::template::{GroupTemplate, parse_group_template};

/// Read a JSON record file. The top level must be an object.
pub fn read_record(path: &Path) -> Result<JsonRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record JSON in {}", path.display()))?;
    let record = JsonRecord::from_value(value)
        .with_context(|| format!("Unsupported record layout in {}", path.display()))?;
    tracing::debug!(path = %path.display(), properties = record.properties().len(), "record read");
    Ok(record)
}

/// Write a record as pretty-printed JSON.
pub fn write_record(path: &Path, record: &JsonRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record.properties())
        .context("Failed to serialize record")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write record file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "record written");
    Ok(())
}

/// Read a group template file.
pub fn read_template(path: &Path) -> Result<GroupTemplate> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file {}", path.display()))?;
    parse_group_template(&content)
        .with_context(|| format!("Invalid template in {}", path.display()))
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps an existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Record;
    use crate::models::value::RawValue;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn record_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.json");
        let record = JsonRecord::from_value(json!({"path": ["/a", "/b"]})).unwrap();

        write_record(&path, &record).unwrap();
        let read = read_record(&path).unwrap();

        assert_eq!(read.get("path"), RawValue::Sequence(vec![json!("/a"), json!("/b")]));
    }

    #[test]
    fn non_object_record_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = read_record(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported record layout"));
    }

    #[test]
    fn template_file_is_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.json");
        fs::write(
            &path,
            r#"{"name":"./links","fieldConfig":{"items":[{"name":"href"}]}}"#,
        )
        .unwrap();

        let template = read_template(&path).unwrap();
        assert_eq!(template.items[0].name, "href");
    }

    #[test]
    fn extension_is_enforced() {
        assert_eq!(
            ensure_extension(PathBuf::from("out"), "json"),
            PathBuf::from("out.json")
        );
        assert_eq!(
            ensure_extension(PathBuf::from("out.JSON"), "json"),
            PathBuf::from("out.JSON")
        );
    }
}
