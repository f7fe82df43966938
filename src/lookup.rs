//! Single-key typed lookups with a fallback.
//!
//! An absent key always yields the fallback. A present key that does not
//! parse yields [`BindError::Conversion`]; callers that prefer the fallback in
//! that case use `.unwrap_or(fallback)`.
//!
//! Sequence lookups strip all whitespace before splitting on commas, and an
//! explicitly empty value is an empty sequence rather than the fallback.

use crate::convert::{self, Scalar};
use crate::error::BindError;
use crate::types::Mapping;

/// Look up `key` and parse it as `T`.
pub fn get_scalar<T: Scalar>(
    annotations: &Mapping,
    key: &str,
    fallback: T,
) -> Result<T, BindError> {
    convert::scalar(key, annotations.get(key).map(String::as_str), fallback)
}

/// Look up `key` and parse it as a comma-separated sequence of `T`.
pub fn get_sequence<T: Scalar>(
    annotations: &Mapping,
    key: &str,
    fallback: Vec<T>,
) -> Result<Vec<T>, BindError> {
    convert::sequence(key, annotations.get(key).map(String::as_str), fallback)
}

pub fn get_string(annotations: &Mapping, key: &str, fallback: &str) -> String {
    annotations
        .get(key)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

pub fn get_string_sequence(
    annotations: &Mapping,
    key: &str,
    fallback: Vec<String>,
) -> Vec<String> {
    match annotations.get(key) {
        Some(raw) => convert::split_sequence(raw),
        None => fallback,
    }
}

pub fn get_int(annotations: &Mapping, key: &str, fallback: i64) -> Result<i64, BindError> {
    get_scalar(annotations, key, fallback)
}

pub fn get_float(annotations: &Mapping, key: &str, fallback: f64) -> Result<f64, BindError> {
    get_scalar(annotations, key, fallback)
}

pub fn get_bool(annotations: &Mapping, key: &str, fallback: bool) -> Result<bool, BindError> {
    get_scalar(annotations, key, fallback)
}

pub fn get_int_sequence(
    annotations: &Mapping,
    key: &str,
    fallback: Vec<i64>,
) -> Result<Vec<i64>, BindError> {
    get_sequence(annotations, key, fallback)
}

pub fn get_float_sequence(
    annotations: &Mapping,
    key: &str,
    fallback: Vec<f64>,
) -> Result<Vec<f64>, BindError> {
    get_sequence(annotations, key, fallback)
}

pub fn get_bool_sequence(
    annotations: &Mapping,
    key: &str,
    fallback: Vec<bool>,
) -> Result<Vec<bool>, BindError> {
    get_sequence(annotations, key, fallback)
}
