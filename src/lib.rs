//! Bind flat string annotations into nested Rust structs, driven by
//! declarative per-field tags.
//!
//! Resource annotations, labels, and similar sources are flat
//! `string → string` maps. Annobind turns such a map into a typed config
//! struct: each field declares its external key, an optional default,
//! whether it is required, and whether an existing value must be kept.
//!
//! ```
//! use std::collections::HashMap;
//! use annobind::{Annotated, Field};
//!
//! #[derive(Default)]
//! struct Dns {
//!     ttl: u32,
//!     geo_tags: Vec<String>,
//! }
//!
//! impl Annotated for Dns {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::leaf("ttl", "dns-ttl-seconds,default=30", &mut self.ttl),
//!             Field::leaf("geo_tags", "geo-tags,default=[us,eu]", &mut self.geo_tags),
//!         ]
//!     }
//! }
//!
//! let annotations = HashMap::from([("geo-tags".to_string(), "fr, au".to_string())]);
//! let mut dns = Dns::default();
//! dns.bind_from(&annotations)?;
//! assert_eq!(dns.ttl, 30);
//! assert_eq!(dns.geo_tags, vec!["fr", "au"]);
//! # Ok::<(), annobind::BindError>(())
//! ```
//!
//! # Tags
//!
//! ```text
//! key[,default=LITERAL][,require=true|false][,protected=true|false]
//! ```
//!
//! - **`key`** is the external key name. Required, surrounding spaces ignored.
//! - **`default=`** is used when the key is absent. A bracketed literal such
//!   as `default=[us,eu]` is a sequence default; `default=[]` is an empty one.
//! - **`require=true`** makes a missing key an error.
//! - **`protected=true`** keeps a field that already holds a non-zero value
//!   (`true`, non-zero number, non-empty string or sequence). Only zero-valued
//!   protected fields are bound.
//!
//! Properties may appear in any order, each at most once. Use `\,` for a
//! literal comma and `\[` / `\]` for literal brackets inside a value.
//!
//! # Nesting
//!
//! [`Field::nested`] declares a nested structure. Its tag's key name is a
//! prefix for every key beneath it, joined with `_`: a leaf tagged `host`
//! inside a structure tagged `infoblox` reads `infoblox_host`. A nested
//! structure with an empty tag adds no prefix.
//!
//! # Supported field types
//!
//! `bool`, `i8`–`i64`, `isize`, `u8`–`u64`, `usize`, `f32`, `f64`, `String`,
//! and `Vec` of any of these. Sequence values are comma-separated with all
//! whitespace removed (`"us, fr"` is `["us", "fr"]`), and an explicitly empty
//! value is an empty sequence, not the default.
//!
//! Numeric sequences are parsed as `f64` and narrowed to the element type:
//! fractions truncate toward zero, and values the element type cannot hold
//! are rejected. See [`convert`] for the exact policy.
//!
//! Fields of any other type can still be declared with
//! [`Field::unsupported`]; binding one fails with
//! [`BindError::UnsupportedKind`].
//!
//! # Errors
//!
//! Binding stops at the first error and returns a [`BindError`] naming the
//! resolved key and, for conversion failures, the raw value and target kind.
//! Fields written before the error keep their new values. To get
//! all-or-nothing behavior, bind into a scratch value and swap it in on
//! success.
//!
//! # Sources and single lookups
//!
//! The [`source`] module builds mappings from environment variables, TOML or
//! JSON files, and resource manifests. The [`lookup`] module reads a single
//! key with a typed fallback, without declaring a struct.

pub mod convert;
pub mod error;
pub mod lookup;
pub mod source;
pub mod tag;
pub mod types;

mod bind;
mod field;
mod report;
mod walk;

#[cfg(test)]
mod fixtures;

pub use bind::bind;
pub use error::BindError;
pub use field::{Annotated, Bindable, Field};
pub use report::{describe, Report, ReportEntry};
pub use tag::{parse_tag, TagSpec, TagValue};
pub use types::{Kind, Mapping, ScalarKind};
pub use walk::ResolvedBinding;
