//! Unified error type for gradeview.
//!
//! Every crate funnels its failures into [`Error`]. The server derives the
//! HTTP status of an error page from [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in gradeview.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "user", "session").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The caller's role does not permit the requested page.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request or configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A conflicting resource already exists (e.g. a taken username).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A page template failed to register or render.
    #[error("Template error [{template}]: {message}")]
    Template {
        /// Name of the template involved.
        template: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Forbidden(_) => 403,
            Error::Validation(_) => 400,
            Error::Conflict(_) => 409,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Template { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Template`].
    pub fn template(template: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Template {
            template: template.into(),
            message: message.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
