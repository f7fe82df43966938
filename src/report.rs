//! Binding reports: what a bind would read, without writing anything.
//!
//! Useful for `--dry-run` style tooling and for debugging prefix
//! composition. Unlike [`bind`](crate::bind), a missing required key is
//! reported in the listing instead of failing the call.

use std::fmt;

use serde::Serialize;

use crate::bind::root_name;
use crate::error::BindError;
use crate::field::Annotated;
use crate::types::{Kind, Mapping};
use crate::walk::{self, Required};

/// One resolved field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Dotted field path from the root type, e.g. `DnsConfig.infoblox.port`.
    pub path: String,
    /// Fully prefixed external key.
    pub key: String,
    /// `None` for a field type the binder does not support.
    pub kind: Option<Kind>,
    pub default: Option<String>,
    pub required: bool,
    pub protected: bool,
    pub value: Option<String>,
}

impl ReportEntry {
    /// A required key with no value; binding would fail on it.
    pub fn is_missing(&self) -> bool {
        self.required && self.value.is_none()
    }
}

/// All tagged fields of a target, sorted by field path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn missing(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.is_missing())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let value = match (&entry.value, &entry.default) {
                (Some(v), _) => v.clone(),
                (None, Some(d)) => format!("{d} (default)"),
                (None, None) if entry.is_missing() => "<missing>".to_string(),
                (None, None) => "<not set>".to_string(),
            };
            let kind = entry
                .kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unsupported".to_string());
            write!(f, "{} = {value}  [{kind}]", entry.key)?;
            if entry.required {
                write!(f, " required")?;
            }
            if entry.protected {
                write!(f, " protected")?;
            }
        }
        Ok(())
    }
}

/// Resolve every tagged field of `target` against `annotations`.
///
/// Fails only on a malformed tag or an invalid descriptor table.
pub fn describe<T: Annotated>(annotations: &Mapping, target: &mut T) -> Result<Report, BindError> {
    let table = walk::build_table(
        annotations,
        root_name::<T>(),
        target.fields(),
        Required::Ignore,
    )?;
    let entries = table
        .into_iter()
        .map(|(path, entry)| {
            let binding = entry.binding;
            ReportEntry {
                path,
                kind: entry.slot.kind(),
                default: binding.tag.default.as_ref().map(|d| d.text()),
                required: binding.tag.required,
                protected: binding.tag.protected,
                value: binding.raw_value,
                key: binding.resolved_key,
            }
        })
        .collect();
    Ok(Report { entries })
}
