//! Error types
//!
//! Every fallible operation in the library returns [`Error`]. The binary
//! reports these through `anyhow`, so the `Display` output is what the user
//! sees.

use crate::resourceid::IdError;
use std::time::Duration;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type for the provider.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// ARM returned a non-success status.
    #[error("{method} {url} returned HTTP {status}: {code}: {message}")]
    Api {
        method: String,
        url: String,
        status: u16,
        code: String,
        message: String,
    },

    /// Response body could not be decoded into the expected model.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Lifecycle ───────────────────────────────────────────────────
    /// A resource with the same identity exists but is not in state.
    #[error(
        "A resource with the ID {id:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for {resource_type:?} for more information."
    )]
    AlreadyExists { resource_type: String, id: String },

    /// Import was requested for an ID that does not exist remotely.
    #[error("Cannot import non-existent remote object {id:?}")]
    ImportNotFound { id: String },

    /// The operation needs an ID but the instance has none.
    #[error("{resource_type}: no resource ID is set on this instance")]
    MissingId { resource_type: String },

    /// Force-new attributes changed, so an in-place update is impossible.
    #[error("{resource_type} cannot be updated in place; changing {} requires replacement", .attributes.join(", "))]
    RequiresReplacement {
        resource_type: String,
        attributes: Vec<String>,
    },

    /// The resource has no update operation.
    #[error("{0} does not support in-place updates")]
    UpdateNotSupported(String),

    // ── Long-running operations ─────────────────────────────────────
    /// A polled operation reached a Failed or Canceled state.
    #[error("long-running operation finished with status {status:?}: {code}: {message}")]
    OperationFailed {
        status: String,
        code: String,
        message: String,
    },

    /// The operation did not finish within its budget.
    #[error("timed out after {} waiting for {operation}", humantime::format_duration(*.timeout))]
    Timeout { operation: String, timeout: Duration },

    // ── Validation ──────────────────────────────────────────────────
    /// Malformed resource ID.
    #[error(transparent)]
    InvalidId(#[from] IdError),

    /// Schema or model validation failed.
    #[error("validating {target}: {}", .messages.join("; "))]
    Validation {
        target: String,
        messages: Vec<String>,
    },

    /// The attribute map could not be decoded into the typed model.
    #[error("decoding attributes for {target}: {source}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// No resource or data source is registered under this name.
    #[error("unknown {kind} type {name:?}")]
    UnknownType { kind: &'static str, name: String },

    /// Invalid provider configuration.
    #[error("invalid provider configuration: {0}")]
    Config(String),

    // ── Context ─────────────────────────────────────────────────────
    /// An inner error annotated with what was being done.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a validation error from a single message.
    pub fn validation(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            target: target.into(),
            messages: vec![message.into()],
        }
    }

    /// Build the import-as-existing error.
    pub fn already_exists(resource_type: &str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.to_string(),
            id: id.into(),
        }
    }

    /// HTTP status of the underlying API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Context { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the remote side reported a conflicting resource.
    pub fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(409 | 412))
    }

    /// Returns `true` for errors that stem from an expired deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Context { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Short hint shown by the CLI for well-known failure classes.
    pub fn hint(&self) -> Option<&'static str> {
        match self.status()? {
            401 => Some("Authentication failed. Refresh ARM_ACCESS_TOKEN."),
            403 => Some("Permission denied. Check the role assignments of the caller."),
            429 => Some("Rate limit exceeded. Please try again later."),
            500 | 502 | 503 => Some("Azure service temporarily unavailable. Please try again."),
            _ => None,
        }
    }
}

/// Attach operation context to errors.
pub trait ResultExt<T> {
    /// Wrap the error with a fixed context string.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap the error with a lazily built context string.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| Error::Context {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}
