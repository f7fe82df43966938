//! Tag grammar: `key[,default=LITERAL][,require=BOOL][,protected=BOOL]`.
//!
//! The first comma-separated token is the key name. Every other token is a
//! `property=value` pair; properties may appear in any order, at most once.
//! A value is either a scalar literal or a bracketed array literal such as
//! `[us,eu,au]`. Commas inside brackets do not split the tag.
//!
//! Escaping: `\` takes the next character literally, so `\,` is a comma that
//! never splits, and `\[` / `\]` are brackets that never open or close an
//! array. Brackets that are not escaped must balance.

use crate::convert::parse_bool;
use crate::error::BindError;

const DEFAULT: &str = "default";
const REQUIRE: &str = "require";
const PROTECTED: &str = "protected";

/// Parsed form of one field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Base external key, before any nested-structure prefix is applied.
    pub key_name: String,
    /// `None` when the tag has no `default=` property at all.
    pub default: Option<TagValue>,
    pub required: bool,
    pub protected: bool,
}

/// A raw property literal, escapes still in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    raw: String,
}

impl TagValue {
    fn new(raw: &str) -> Self {
        TagValue {
            raw: raw.to_string(),
        }
    }

    /// The literal exactly as written in the tag.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The literal read as a scalar, with escapes removed.
    pub fn text(&self) -> String {
        unescape(&self.raw)
    }

    pub fn is_array(&self) -> bool {
        self.raw.starts_with('[')
    }

    /// The literal read as a sequence.
    ///
    /// The outer brackets of an array literal are stripped (escaped brackets
    /// never count), the rest is split on unescaped commas and each element is
    /// trimmed. `[]` (or an empty scalar) yields an empty sequence.
    pub fn as_sequence(&self) -> Vec<String> {
        let raw = self.raw.trim();
        let inner = match array_end(raw) {
            Some(end) if raw.starts_with('[') => &raw[1..end],
            _ => raw.strip_prefix('[').unwrap_or(raw),
        };
        let items: Vec<String> = split_unescaped(inner, ',')
            .into_iter()
            .map(|item| unescape(item.trim()))
            .collect();
        if items.len() == 1 && items[0].is_empty() {
            return Vec::new();
        }
        items
    }
}

/// Parse one tag into its properties.
pub fn parse_tag(tag: &str) -> Result<TagSpec, BindError> {
    let mut tokens = split_tokens(tag)?.into_iter();
    let key_name = unescape(tokens.next().unwrap_or_default().trim());
    if key_name.is_empty() {
        return Err(BindError::malformed(tag, "missing key name"));
    }

    let mut default: Option<TagValue> = None;
    let mut required: Option<bool> = None;
    let mut protected: Option<bool> = None;

    for token in tokens {
        let Some((name, value)) = token.split_once('=') else {
            return Err(BindError::malformed(
                tag,
                format!("expected `property=value`, found '{}'", token.trim()),
            ));
        };
        let name = name.trim();
        let value = value.trim();
        match name {
            DEFAULT => set_once(tag, name, &mut default, property_value(tag, value)?)?,
            REQUIRE => set_once(tag, name, &mut required, flag(tag, name, value)?)?,
            PROTECTED => set_once(tag, name, &mut protected, flag(tag, name, value)?)?,
            other => {
                return Err(BindError::malformed(
                    tag,
                    format!("unknown property '{other}'"),
                ));
            }
        }
    }

    Ok(TagSpec {
        key_name,
        default,
        required: required.unwrap_or(false),
        protected: protected.unwrap_or(false),
    })
}

/// Key name of a tag, ignoring its properties. Used for nested structures,
/// which only contribute a prefix.
pub fn key_name(tag: &str) -> Result<String, BindError> {
    let tokens = split_tokens(tag)?;
    Ok(tokens
        .first()
        .map(|first| unescape(first.trim()))
        .unwrap_or_default())
}

fn set_once<T>(tag: &str, name: &str, slot: &mut Option<T>, value: T) -> Result<(), BindError> {
    if slot.is_some() {
        return Err(BindError::malformed(
            tag,
            format!("property '{name}' given more than once"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn flag(tag: &str, name: &str, value: &str) -> Result<bool, BindError> {
    parse_bool(value).ok_or_else(|| {
        BindError::malformed(tag, format!("'{name}' expects a boolean, found '{value}'"))
    })
}

fn property_value(tag: &str, value: &str) -> Result<TagValue, BindError> {
    if value.starts_with('[') && array_end(value) != Some(value.len() - 1) {
        return Err(BindError::malformed(
            tag,
            format!("unexpected text after array literal '{value}'"),
        ));
    }
    Ok(TagValue::new(value))
}

/// Byte index of the `]` closing the array literal that opens at index 0.
fn array_end(value: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a tag on commas outside brackets. Escapes are kept in the tokens.
fn split_tokens(tag: &str) -> Result<Vec<String>, BindError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = tag.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    return Err(BindError::malformed(tag, "dangling escape at end of tag"));
                };
                current.push('\\');
                current.push(next);
            }
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                if depth == 0 {
                    return Err(BindError::malformed(tag, "unmatched ']'"));
                }
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if depth > 0 {
        return Err(BindError::malformed(tag, "unclosed '['"));
    }
    tokens.push(current);
    Ok(tokens)
}

fn split_unescaped(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
