//! String-to-value conversion for scalars and comma-separated sequences.
//!
//! Numeric sequences are parsed as `f64` first and then narrowed to the
//! element type. Narrowing truncates toward zero and rejects anything that
//! does not fit: NaN, infinities, values outside the integer range, and
//! finite values that overflow `f32`. Nothing wraps and nothing saturates.
//! Integers above 2^53 lose precision on the way through `f64`.

use crate::error::BindError;
use crate::tag::TagValue;
use crate::types::{Kind, ScalarKind};

/// Parse a boolean literal: `1 t T TRUE true True` or `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A single value parsed from annotation text.
pub trait Scalar: Sized + Clone + Default {
    const KIND: ScalarKind;

    fn parse_scalar(raw: &str) -> Option<Self>;

    fn is_zero(&self) -> bool;
}

/// A numeric scalar reachable from the `f64` pivot.
pub trait Numeric: Scalar {
    /// Checked narrowing; `None` when `v` has no representation in `Self`.
    fn from_f64(v: f64) -> Option<Self>;
}

/// A scalar that can appear as a sequence element.
pub trait Element: Scalar {
    /// Convert a sequence field from its raw value, falling back to its
    /// tag default when the key is absent.
    fn sequence(
        key: &str,
        raw: Option<&str>,
        default: Option<&TagValue>,
    ) -> Result<Vec<Self>, BindError>;
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn parse_scalar(raw: &str) -> Option<Self> {
        parse_bool(raw)
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn parse_scalar(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Numeric for f64 {
    fn from_f64(v: f64) -> Option<Self> {
        Some(v)
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse::<f64>().ok().and_then(f32::from_f64)
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Numeric for f32 {
    fn from_f64(v: f64) -> Option<Self> {
        let narrowed = v as f32;
        if v.is_finite() && narrowed.is_infinite() {
            return None;
        }
        Some(narrowed)
    }
}

macro_rules! signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn parse_scalar(raw: &str) -> Option<Self> {
                raw.parse().ok()
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }

        impl Numeric for $ty {
            fn from_f64(v: f64) -> Option<Self> {
                if !v.is_finite() {
                    return None;
                }
                let t = v.trunc();
                // -MIN is 2^(bits-1), exact in f64.
                let min = <$ty>::MIN as f64;
                if t < min || t >= -min {
                    return None;
                }
                Some(t as $ty)
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn parse_scalar(raw: &str) -> Option<Self> {
                raw.parse().ok()
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }

        impl Numeric for $ty {
            fn from_f64(v: f64) -> Option<Self> {
                if !v.is_finite() {
                    return None;
                }
                let t = v.trunc();
                // MAX + 1 is 2^bits, exact in f64.
                let bound = <$ty>::MAX as f64 + 1.0;
                if t < 0.0 || t >= bound {
                    return None;
                }
                Some(t as $ty)
            }
        }
    )*};
}

signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Element for bool {
    fn sequence(
        key: &str,
        raw: Option<&str>,
        default: Option<&TagValue>,
    ) -> Result<Vec<Self>, BindError> {
        let default = default_sequence(key, default)?;
        sequence(key, raw, default)
    }
}

impl Element for String {
    fn sequence(
        key: &str,
        raw: Option<&str>,
        default: Option<&TagValue>,
    ) -> Result<Vec<Self>, BindError> {
        let default = default_sequence(key, default)?;
        sequence(key, raw, default)
    }
}

macro_rules! numeric_element {
    ($($ty:ty),* $(,)?) => {$(
        impl Element for $ty {
            fn sequence(
                key: &str,
                raw: Option<&str>,
                default: Option<&TagValue>,
            ) -> Result<Vec<Self>, BindError> {
                numeric_sequence(key, raw, default)
            }
        }
    )*};
}

numeric_element!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Convert a scalar: absent → `default`, present → parsed or `Conversion`.
pub fn scalar<T: Scalar>(key: &str, raw: Option<&str>, default: T) -> Result<T, BindError> {
    match raw {
        None => Ok(default),
        Some(raw) => T::parse_scalar(raw)
            .ok_or_else(|| BindError::conversion(key, raw, Kind::Scalar(T::KIND))),
    }
}

/// Convert a sequence element by element: absent → `default`, present →
/// [`split_sequence`] and parse each item.
pub fn sequence<T: Scalar>(
    key: &str,
    raw: Option<&str>,
    default: Vec<T>,
) -> Result<Vec<T>, BindError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    split_sequence(raw)
        .iter()
        .map(|item| {
            T::parse_scalar(item)
                .ok_or_else(|| BindError::conversion(key, item, Kind::Sequence(T::KIND)))
        })
        .collect()
}

/// Split a raw sequence value. All whitespace is removed before splitting on
/// commas, so `"us, fr, au"` gives `["us", "fr", "au"]`. An empty value is an
/// empty sequence.
pub fn split_sequence(raw: &str) -> Vec<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Vec::new();
    }
    compact.split(',').map(str::to_string).collect()
}

/// Narrow a pivot sequence element-wise into `T`.
pub fn narrow<T: Numeric>(key: &str, values: &[f64]) -> Result<Vec<T>, BindError> {
    values
        .iter()
        .map(|&v| {
            T::from_f64(v).ok_or_else(|| {
                BindError::conversion(key, &v.to_string(), Kind::Sequence(T::KIND))
            })
        })
        .collect()
}

/// Parse a scalar tag default. No `default=` property means the zero value.
pub fn default_scalar<T: Scalar>(key: &str, default: Option<&TagValue>) -> Result<T, BindError> {
    let Some(default) = default else {
        return Ok(T::default());
    };
    let text = default.text();
    T::parse_scalar(&text)
        .ok_or_else(|| BindError::invalid_default(key, &text, Kind::Scalar(T::KIND)))
}

/// Parse a sequence tag default. No `default=` property means empty.
pub fn default_sequence<T: Scalar>(
    key: &str,
    default: Option<&TagValue>,
) -> Result<Vec<T>, BindError> {
    let Some(default) = default else {
        return Ok(Vec::new());
    };
    default
        .as_sequence()
        .iter()
        .map(|item| {
            T::parse_scalar(item).ok_or_else(|| {
                BindError::invalid_default(key, default.raw(), Kind::Sequence(T::KIND))
            })
        })
        .collect()
}

fn numeric_sequence<T: Numeric>(
    key: &str,
    raw: Option<&str>,
    default: Option<&TagValue>,
) -> Result<Vec<T>, BindError> {
    let default: Vec<T> = match default {
        None => Vec::new(),
        Some(d) => d
            .as_sequence()
            .iter()
            .map(|item| f64::parse_scalar(item).and_then(T::from_f64))
            .collect::<Option<_>>()
            .ok_or_else(|| BindError::invalid_default(key, d.raw(), Kind::Sequence(T::KIND)))?,
    };

    let Some(raw) = raw else {
        return Ok(default);
    };
    // Errors carry the element as written, not the re-formatted pivot.
    split_sequence(raw)
        .iter()
        .map(|item| {
            f64::parse_scalar(item)
                .and_then(T::from_f64)
                .ok_or_else(|| BindError::conversion(key, item, Kind::Sequence(T::KIND)))
        })
        .collect()
}
