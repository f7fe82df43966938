use std::path::PathBuf;

use thiserror::Error;

use crate::types::Kind;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum BindError {
    #[error("Invalid bind target: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::invalid_target)))]
    InvalidTarget { reason: String },

    #[error("Malformed tag '{tag}': {reason}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(annobind::malformed_tag),
            help("tags look like `key[,default=LITERAL][,require=true][,protected=true]`")
        )
    )]
    MalformedTag { tag: String, reason: String },

    #[error("Required key '{key}' is missing")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::required_key_missing)))]
    RequiredKeyMissing { key: String },

    #[error("Can't convert value '{value}' of '{key}' to {kind}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::conversion)))]
    Conversion { key: String, value: String, kind: Kind },

    #[error("Can't convert default value '{value}' of '{key}' to {kind}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::invalid_default)))]
    InvalidDefault { key: String, value: String, kind: Kind },

    #[error("Unsupported type {type_name} for {path} (key '{key}')")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::unsupported_kind)))]
    UnsupportedKind {
        path: String,
        key: String,
        type_name: &'static str,
    },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::io)))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(annobind::parse)))]
    ParseError { path: PathBuf, reason: String },
}

impl BindError {
    pub(crate) fn conversion(key: &str, value: &str, kind: Kind) -> Self {
        BindError::Conversion {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }

    pub(crate) fn invalid_default(key: &str, value: &str, kind: Kind) -> Self {
        BindError::InvalidDefault {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }

    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        BindError::MalformedTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}
