//! Error types for folio operations.

use thiserror::Error;

/// Errors that can occur while configuring or running an export.
///
/// Problems local to a single component never surface here: they are
/// recorded as [`Diagnostic`](crate::Diagnostic)s and the component is
/// dropped. What remains are configuration errors and collaborator failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("the spec for {component}/{name} contains invalid tokens: {}", tokens.join(", "))]
    InvalidSpec {
        component: String,
        name: String,
        tokens: Vec<String>,
    },

    #[error("unknown spec {component}/{name}")]
    UnknownSpec { component: String, name: String },

    #[error("theme not found: {0}")]
    ThemeNotFound(String),

    #[error("metadata lookup failed: {0}")]
    Metadata(String),

    #[error("could not bundle {url}: {reason}")]
    Bundle { url: String, reason: String },
}

impl Error {
    /// Whether the error means the export cannot proceed at all.
    ///
    /// Spec validation failures reject a single override and leave the
    /// stored theme untouched, so callers can report them and carry on.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::InvalidSpec { .. } | Error::UnknownSpec { .. } | Error::Bundle { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
