//! Engine error type.

use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Engine error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A type tag that no registered widget kind answers to.
    #[error("unknown widget type {tag:?} (known types: {})", known.join(", "))]
    UnknownType {
        /// The tag as supplied by the caller.
        tag: String,
        /// Canonical tags of every registered kind.
        known: Vec<String>,
    },
    #[error("not found: {0}")]
    /// No node with the given id.
    NotFound(String),
    #[error("not a container: {0}")]
    /// Children were added to a leaf kind.
    NotContainer(String),
    #[error("duplicate id: {0}")]
    /// A node id appears more than once in a tree.
    DuplicateId(String),
    #[error("invalid: {0}")]
    /// A tree or tab invariant would be broken.
    Invalid(String),
    #[error("property {path}: {message}")]
    /// A property read or write was refused.
    Property {
        /// Dotted property path.
        path: String,
        /// Reason for the refusal.
        message: String,
    },
    #[error("decode: {0}")]
    /// A document could not be decoded.
    Decode(String),
    #[error("json: {0}")]
    /// JSON parse or conversion failure.
    Json(#[from] serde_json::Error),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl Error {
    /// Construct a property error.
    pub fn property(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Property {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_lists_known() {
        let e = Error::UnknownType {
            tag: "sparkline".into(),
            known: vec!["textbox".into(), "number".into()],
        };
        assert_eq!(
            e.to_string(),
            "unknown widget type \"sparkline\" (known types: textbox, number)"
        );
    }

    #[test]
    fn from_geom() {
        let e: Error = geom::Error::Direction("up".into()).into();
        assert!(matches!(e, Error::Geometry(_)));
    }
}
