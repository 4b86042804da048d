//! Configuration loader and validator.
//!
//! Responsibilities:
//! - Read environment variables to populate [`ContextConfig`]
//! - Apply defaults when values are missing
//! - Validate constraints (e.g., `max_files` must be > 0)

pub mod model;

use crate::config::model::ContextConfig;
use anyhow::{Context, Result};
use std::str::FromStr;
use tracing::debug;

/// Load [`ContextConfig`] from ENV variables, falling back to defaults if not set.
///
/// Recognised variables:
/// - `CTX_MAX_FILES`
/// - `CTX_MAX_TOKENS_PER_FILE`
/// - `CTX_CONTEXT_LIMIT`
/// - `CTX_BASE_REF`
/// - `CTX_WINDOW_RADIUS`
/// - `CTX_INCLUDE_BEHAVIOR` (`1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`)
pub fn load_from_env_or_default() -> Result<ContextConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env_or_default`], reading values through `lookup`.
pub fn load_with<F>(lookup: F) -> Result<ContextConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = ContextConfig::default();

    if let Some(v) = parse_var(&lookup, "CTX_MAX_FILES")? {
        cfg.limits.max_files = v;
    }
    if let Some(v) = parse_var(&lookup, "CTX_MAX_TOKENS_PER_FILE")? {
        cfg.limits.max_tokens_per_file = v;
    }
    if let Some(v) = parse_var(&lookup, "CTX_CONTEXT_LIMIT")? {
        cfg.limits.context_limit = v;
    }
    if let Some(v) = parse_var(&lookup, "CTX_WINDOW_RADIUS")? {
        cfg.review.window_radius = v;
    }
    if let Some(raw) = lookup("CTX_INCLUDE_BEHAVIOR").filter(|s| !s.trim().is_empty()) {
        cfg.behavior.include_behavior = parse_flag(&raw)
            .with_context(|| format!("invalid value for CTX_INCLUDE_BEHAVIOR: {raw:?}"))?;
    }
    if let Some(base) = lookup("CTX_BASE_REF").filter(|s| !s.trim().is_empty()) {
        cfg.review.base_ref = base.trim().to_string();
    }

    cfg.validate()?;
    debug!(limits = ?cfg.limits, base_ref = %cfg.review.base_ref, "config loaded");
    Ok(cfg)
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got `{other}`")),
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        _ => Ok(None),
    }
}
