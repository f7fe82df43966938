//! Ways to obtain a [`Mapping`]: environment variables, TOML, JSON, and
//! resource manifests.
//!
//! The binder only ever sees the flat mapping. Structured sources are
//! flattened the same way nested tags compose keys: a table `infoblox` with
//! a key `host` becomes `infoblox_host`. Scalars are stringified and arrays of
//! scalars are joined with `,`, so they read back as sequences.

use std::path::Path;

use crate::error::BindError;
use crate::types::Mapping;

const KEY_SEPARATOR: &str = "_";
const INLINE: &str = "<inline>";

/// Build a mapping from environment variables matching `{PREFIX}_*`.
///
/// The prefix and its `_` are stripped and the rest is lowercased, so with
/// prefix `DNS`, `DNS_INFOBLOX_HOST` becomes `infoblox_host`.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn from_env(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Mapping {
    let needle = format!("{prefix}{KEY_SEPARATOR}");
    vars.into_iter()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(&needle)?;
            if rest.is_empty() {
                return None;
            }
            Some((rest.to_lowercase(), value))
        })
        .collect()
}

/// Flatten a TOML document into a mapping.
pub fn from_toml_str(content: &str) -> Result<Mapping, BindError> {
    parse_toml(content, Path::new(INLINE))
}

/// Flatten a JSON object into a mapping. `null` values are skipped.
pub fn from_json_str(content: &str) -> Result<Mapping, BindError> {
    parse_json(content, Path::new(INLINE))
}

/// Extract `metadata.annotations` from a JSON resource manifest.
///
/// A manifest without annotations yields an empty mapping. Annotation values
/// must be strings.
pub fn from_manifest_json(content: &str) -> Result<Mapping, BindError> {
    let path = Path::new(INLINE);
    let manifest: serde_json::Value =
        serde_json::from_str(content).map_err(|e| parse_error(path, e))?;
    let Some(annotations) = manifest.pointer("/metadata/annotations") else {
        return Ok(Mapping::new());
    };
    let object = annotations
        .as_object()
        .ok_or_else(|| parse_error(path, "metadata.annotations is not an object"))?;

    let mut out = Mapping::new();
    for (key, value) in object {
        let serde_json::Value::String(value) = value else {
            return Err(parse_error(
                path,
                format!("annotation '{key}' is not a string"),
            ));
        };
        out.insert(key.clone(), value.clone());
    }
    Ok(out)
}

/// Read a `.toml` or `.json` file and flatten it into a mapping.
pub fn from_file(path: &Path) -> Result<Mapping, BindError> {
    let content = std::fs::read_to_string(path).map_err(|e| BindError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml(&content, path),
        Some("json") => parse_json(&content, path),
        _ => Err(parse_error(path, "expected a .toml or .json file")),
    }
}

fn parse_toml(content: &str, path: &Path) -> Result<Mapping, BindError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(path, e))?;
    let mut out = Mapping::new();
    flatten_toml(&table, "", path, &mut out)?;
    Ok(out)
}

fn flatten_toml(
    table: &toml::Table,
    prefix: &str,
    path: &Path,
    out: &mut Mapping,
) -> Result<(), BindError> {
    for (key, value) in table {
        let key = join_key(prefix, key);
        match value {
            toml::Value::Table(sub) => flatten_toml(sub, &key, path, out)?,
            toml::Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| {
                        toml_scalar(item).ok_or_else(|| {
                            parse_error(path, format!("array '{key}' must hold only scalars"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(key, joined.join(","));
            }
            scalar => {
                if let Some(text) = toml_scalar(scalar) {
                    out.insert(key, text);
                }
            }
        }
    }
    Ok(())
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Mapping, BindError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| parse_error(path, e))?;
    let serde_json::Value::Object(object) = value else {
        return Err(parse_error(path, "top-level value is not an object"));
    };
    let mut out = Mapping::new();
    flatten_json(&object, "", path, &mut out)?;
    Ok(out)
}

fn flatten_json(
    object: &serde_json::Map<String, serde_json::Value>,
    prefix: &str,
    path: &Path,
    out: &mut Mapping,
) -> Result<(), BindError> {
    for (key, value) in object {
        let key = join_key(prefix, key);
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Object(sub) => flatten_json(sub, &key, path, out)?,
            serde_json::Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| {
                        json_scalar(item).ok_or_else(|| {
                            parse_error(path, format!("array '{key}' must hold only scalars"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(key, joined.join(","));
            }
            scalar => {
                if let Some(text) = json_scalar(scalar) {
                    out.insert(key, text);
                }
            }
        }
    }
    Ok(())
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{key}")
    }
}

fn parse_error(path: &Path, reason: impl ToString) -> BindError {
    BindError::ParseError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
