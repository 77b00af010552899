//! Schema validation helpers for membridge JSON5 configuration.

use super::SchemaMode;
use crate::ConfigError;
use serde_json::{Map, Value};

/// Top-level blocks describing external providers.
const PROVIDER_BLOCKS: &[&str] = &["llm", "embedder", "vector_store"];

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(
    value: &Value,
    mode: SchemaMode,
    layer: &str,
) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = ["$schema", "llm", "embedder", "vector_store", "search"];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    for block in PROVIDER_BLOCKS {
        if let Some(value) = map.get(*block) {
            validate_provider(value, mode, layer, block)?;
        }
    }
    if let Some(value) = map.get("search") {
        validate_search(value, layer, "search")?;
    }

    Ok(())
}

/// Validate a `{ provider, config }` block.
///
/// Partial layers may override `config` alone; the effective config must name
/// the provider.
fn validate_provider(
    value: &Value,
    mode: SchemaMode,
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    if value.is_null() {
        return Ok(());
    }
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["provider", "config"], layer, path)?;

    let provider_path = join_path(path, "provider");
    match map.get("provider") {
        Some(value) => expect_non_empty_string(value, layer, &provider_path)?,
        None if matches!(mode, SchemaMode::Full) => {
            return Err(invalid_field(layer, &provider_path, "missing required field"));
        }
        None => {}
    }
    if let Some(value) = map.get("config") {
        expect_object(value, layer, &join_path(path, "config"))?;
    }
    Ok(())
}

/// Validate the "search" block.
fn validate_search(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["default_limit"], layer, path)?;
    if let Some(value) = map.get("default_limit") {
        expect_u64(value, layer, &join_path(path, "default_limit"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a non-empty JSON string.
fn expect_non_empty_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid_field(layer, path, "must not be empty")),
        None => Err(invalid_field(layer, path, "expected string")),
    }
}

/// Expect a non-negative JSON integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
