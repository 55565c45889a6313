// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line arguments with environment fallbacks.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "fieldgroup", version)]
/// Edit a repeatable field group stored as one array per sub-field.
pub struct Args {
    /// Path to the field group template JSON. Uses the built-in path/thumbnail group when omitted.
    #[arg(long, short, env = "FIELDGROUP_TEMPLATE")]
    pub template: Option<PathBuf>,
    /// Record JSON to open at startup.
    #[arg(long, short, env = "FIELDGROUP_RECORD")]
    pub record: Option<PathBuf>,
    /// Repository path of the edited record, handed to path-aware sub-fields.
    #[arg(long, env = "FIELDGROUP_REPOSITORY_PATH", default_value = "/content")]
    pub repository_path: String,
    /// Log filter directive, e.g. `info` or `fieldgroup=debug`.
    #[arg(long = "log", env = "FIELDGROUP_LOG")]
    pub log_filter: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let args = Args::try_parse_from(["fieldgroup"]).unwrap();
        assert!(args.template.is_none());
        assert!(args.record.is_none());
        assert_eq!(args.repository_path, "/content");
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::try_parse_from([
            "fieldgroup",
            "--template",
            "group.json",
            "-r",
            "page.json",
            "--repository-path",
            "/content/site/en",
            "--log",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.template, Some(PathBuf::from("group.json")));
        assert_eq!(args.record, Some(PathBuf::from("page.json")));
        assert_eq!(args.repository_path, "/content/site/en");
        assert_eq!(args.log_filter.as_deref(), Some("debug"));
    }
}
