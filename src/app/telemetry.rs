// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Logging setup.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
pub fn init(filter: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(filter))
        .with_target(true)
        .without_time()
        .init();
}

/// An explicit filter wins over `RUST_LOG`; unparsable filters fall back to `info`.
fn build_filter(filter: Option<&str>) -> EnvFilter {
    let parsed = match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
