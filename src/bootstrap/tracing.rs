//! Tracing configuration for the wizard
//!
//! ## Behavior / 行为
//!
//! - `RUST_LOG` wins when set
//! - Otherwise the configured filter is used, then the built-in defaults
//! - Output goes to stdout through the fmt layer

use std::io;

use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        "warn".to_string(),
        format!("diverlah={level}"),
        format!("dl_app={level}"),
        format!("dl_infra={level}"),
        format!("dl_core={level}"),
    ]
}

fn build_env_filter(configured: &str, is_dev: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if !configured.trim().is_empty() {
        match EnvFilter::try_new(configured) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("Invalid log filter {configured:?}, using defaults: {err}"),
        }
    }

    EnvFilter::new(build_filter_directives(is_dev).join(","))
}

/// Initialize the tracing subscriber
///
/// `configured_filter` is the `[logging] filter` value from the config file,
/// possibly empty.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(configured_filter: &str) -> anyhow::Result<()> {
    let env_filter = build_env_filter(configured_filter, is_development());

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stdout));

    registry().with(env_filter).with(stdout_layer).try_init()?;

    Ok(())
}
