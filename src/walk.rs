//! Structure walker: flatten a field tree into a table of resolved bindings.
//!
//! Nested structures are visited depth-first in declaration order. Each
//! nested tag's key name is appended to the key prefix with `_`, so a leaf
//! tagged `inner` under a structure tagged `outer` resolves to `outer_inner`.
//! Table keys are dotted field paths from the root type (`Config.db.port`),
//! unique even when sibling structures reuse field names.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::BindError;
use crate::field::{Bindable, Field, Target};
use crate::tag::{self, TagSpec, TagValue};
use crate::types::{Kind, Mapping};

const KEY_SEPARATOR: &str = "_";

/// A parsed tag joined with the value found under its resolved key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBinding {
    pub tag: TagSpec,
    /// Key name with every ancestor prefix applied.
    pub resolved_key: String,
    /// Value under `resolved_key`, `None` when the mapping lacks the key.
    pub raw_value: Option<String>,
}

impl ResolvedBinding {
    pub fn key(&self) -> &str {
        &self.resolved_key
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    pub fn default(&self) -> Option<&TagValue> {
        self.tag.default.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.raw_value.is_some()
    }
}

/// The write side of one table entry.
pub(crate) enum Slot<'a> {
    Value(&'a mut dyn Bindable),
    Unsupported(&'static str),
}

impl Slot<'_> {
    pub(crate) fn kind(&self) -> Option<Kind> {
        match self {
            Slot::Value(value) => Some(value.kind()),
            Slot::Unsupported(_) => None,
        }
    }
}

pub(crate) struct Entry<'a> {
    pub(crate) binding: ResolvedBinding,
    pub(crate) slot: Slot<'a>,
}

pub(crate) type BindingTable<'a> = BTreeMap<String, Entry<'a>>;

/// Whether a missing `require=true` key aborts the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Required {
    Enforce,
    Ignore,
}

/// Build the binding table for `fields`, the top-level fields of `root`.
pub(crate) fn build_table<'a>(
    annotations: &Mapping,
    root: &str,
    fields: Vec<Field<'a>>,
    required: Required,
) -> Result<BindingTable<'a>, BindError> {
    let mut table = BindingTable::new();
    roll(annotations, fields, root, "", required, &mut table)?;
    Ok(table)
}

fn roll<'a>(
    annotations: &Mapping,
    fields: Vec<Field<'a>>,
    path: &str,
    prefix: &str,
    required: Required,
    table: &mut BindingTable<'a>,
) -> Result<(), BindError> {
    for field in fields {
        let field_path = format!("{path}.{}", field.name);

        let slot = match field.target {
            Target::Nested(children) => {
                let nested_prefix = join_key(prefix, &tag::key_name(field.tag)?);
                roll(annotations, children, &field_path, &nested_prefix, required, table)?;
                continue;
            }
            Target::Leaf(value) => Slot::Value(value),
            Target::Unsupported(type_name) => Slot::Unsupported(type_name),
        };

        if field.tag.is_empty() {
            debug!(field = %field_path, "skipping untagged field");
            continue;
        }

        let spec = tag::parse_tag(field.tag)?;
        let resolved_key = join_key(prefix, &spec.key_name);
        let raw_value = annotations.get(&resolved_key).cloned();

        if spec.required && raw_value.is_none() && required == Required::Enforce {
            return Err(BindError::RequiredKeyMissing { key: resolved_key });
        }

        trace!(
            field = %field_path,
            key = %resolved_key,
            present = raw_value.is_some(),
            "resolved binding"
        );

        if table.contains_key(&field_path) {
            return Err(BindError::InvalidTarget {
                reason: format!("field path {field_path} is declared more than once"),
            });
        }
        table.insert(
            field_path,
            Entry {
                binding: ResolvedBinding {
                    tag: spec,
                    resolved_key,
                    raw_value,
                },
                slot,
            },
        );
    }
    Ok(())
}

fn join_key(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{KEY_SEPARATOR}{name}"),
    }
}
