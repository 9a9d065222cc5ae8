//! Shared error types for DevLink
//!
//! Every fallible operation returns `DevLinkError`; at the GraphQL
//! boundary each variant maps to a stable machine-readable `code`
//! extension, and validation failures additionally carry a `fields`
//! map of per-field messages.

use std::collections::BTreeMap;

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Error type for DevLink operations
#[derive(Error, Debug)]
pub enum DevLinkError {
    /// Invalid input, with per-field messages
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Missing or invalid credentials/session
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authenticated caller lacks rights over the target
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness conflict (email, handle)
    #[error("{0}")]
    Conflict(String),

    /// External dependency failed (mail relay)
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// MongoDB operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DevLinkError {
    /// Single-field validation error
    pub fn invalid(message: &str, field: &str, detail: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), detail.to_string());
        DevLinkError::Validation {
            message: message.to_string(),
            fields,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            DevLinkError::Validation { .. } => "VALIDATION_ERROR",
            DevLinkError::Authentication(_) => "UNAUTHENTICATED",
            DevLinkError::Authorization(_) => "FORBIDDEN",
            DevLinkError::NotFound(_) => "NOT_FOUND",
            DevLinkError::Conflict(_) => "CONFLICT",
            DevLinkError::Dependency(_) => "DEPENDENCY_ERROR",
            DevLinkError::Database(_) => "DATABASE_ERROR",
            DevLinkError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ErrorExtensions for DevLinkError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let DevLinkError::Validation { fields, .. } = self {
                if let Ok(value) = async_graphql::Value::from_json(serde_json::json!(fields)) {
                    e.set("fields", value);
                }
            }
        })
    }
}

/// Result type alias using DevLinkError
pub type Result<T, E = DevLinkError> = std::result::Result<T, E>;
