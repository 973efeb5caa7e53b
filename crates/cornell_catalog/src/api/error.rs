//! Error types for the class roster API subsystem.

use super::routes::{Filters, RecordKind};
use std::fmt;
use thiserror::Error;

/// Identifies one fetch: what was asked for and where it was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: RecordKind,
    pub filters: Filters,
    pub url: String,
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.filters, self.url)
    }
}

/// Errors that can occur while fetching or assembling the catalog.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// A required setting was not provided
    #[error("Missing configuration: {key} must be set")]
    MissingConfig { key: String },

    /// A setting was provided but could not be used
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    /// A record type name with no route
    #[error("Unregistered record type: {name}")]
    UnregisteredType { name: String },

    /// The request URL could not be built
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The request failed or returned a non-success status
    #[error("Failed to fetch {request}: {message}")]
    Transport {
        request: Box<FetchRequest>,
        status: Option<u16>,
        message: String,
    },

    /// The response body did not have the expected `data` envelope
    #[error("Invalid data returned for {request}: {reason}")]
    Envelope {
        request: Box<FetchRequest>,
        reason: String,
    },

    /// A record in the envelope did not match its schema
    #[error("Could not decode record #{index} of {request}: {message}")]
    Decode {
        request: Box<FetchRequest>,
        index: usize,
        message: String,
    },

    /// A spawned fetch task panicked or was cancelled
    #[error("Fetch task failed: {message}")]
    TaskFailed { message: String },
}

impl CatalogError {
    /// Returns true if this error is raised before any request is made.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingConfig { .. } | CatalogError::InvalidConfig { .. }
        )
    }

    /// Returns the request that failed, if the error came from a fetch.
    pub fn request(&self) -> Option<&FetchRequest> {
        match self {
            CatalogError::Transport { request, .. }
            | CatalogError::Envelope { request, .. }
            | CatalogError::Decode { request, .. } => Some(&**request),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for CatalogError {
    fn from(err: tokio::task::JoinError) -> Self {
        CatalogError::TaskFailed {
            message: err.to_string(),
        }
    }
}
