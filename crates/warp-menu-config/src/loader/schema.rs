//! Schema validation helpers for the aggregation config document.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a parsed config document against the schema.
pub(super) fn validate_config_schema(value: &Value, label: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, label, "")?;
    ensure_allowed_keys(map, &["sources", "support", "order"], label, "")?;

    if let Some(sources) = map.get("sources") {
        let arr = expect_array(sources, label, "sources")?;
        for (idx, entry) in arr.iter().enumerate() {
            validate_source(entry, label, &format!("sources[{idx}]"))?;
        }
    }
    if let Some(support) = map.get("support") {
        let arr = expect_array(support, label, "support")?;
        for (idx, entry) in arr.iter().enumerate() {
            validate_support(entry, label, &format!("support[{idx}]"))?;
        }
    }
    if let Some(order) = map.get("order") {
        validate_order(order, label, "order")?;
    }
    Ok(())
}

/// Validate a single source definition.
fn validate_source(value: &Value, label: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, label, path)?;
    ensure_allowed_keys(map, &["type", "path", "tag"], label, path)?;

    let type_path = join_path(path, "type");
    let Some(kind) = map.get("type") else {
        return Err(invalid_field(label, &type_path, "missing required field"));
    };
    expect_string(kind, label, &type_path)?;
    if let Some(value) = map.get("path") {
        expect_string(value, label, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("tag") {
        expect_string(value, label, &join_path(path, "tag"))?;
    }
    Ok(())
}

/// Validate a single support link definition.
fn validate_support(value: &Value, label: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, label, path)?;
    ensure_allowed_keys(map, &["identifier", "href", "external"], label, path)?;

    let id_path = join_path(path, "identifier");
    let Some(identifier) = map.get("identifier") else {
        return Err(invalid_field(label, &id_path, "missing required field"));
    };
    expect_string(identifier, label, &id_path)?;
    if let Some(value) = map.get("href") {
        expect_string(value, label, &join_path(path, "href"))?;
    }
    if let Some(value) = map.get("external") {
        expect_bool(value, label, &join_path(path, "external"))?;
    }
    Ok(())
}

/// Validate the category order mapping.
fn validate_order(value: &Value, label: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, label, path)?;
    for (category, order) in map {
        let order_path = join_path(path, category);
        match order.as_i64() {
            Some(order) if i32::try_from(order).is_ok() => {}
            Some(_) => return Err(invalid_field(label, &order_path, "integer out of range")),
            None => return Err(invalid_field(label, &order_path, "expected integer")),
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    label: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(label, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    label: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(label, path, "expected array")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, label: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(label, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, label: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(label, path, "expected bool"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    label: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(label, &join_path(path, key), "unknown key"));
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
fn invalid_field(label: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{label}:{normalized_path}"),
        message: message.to_string(),
    }
}
