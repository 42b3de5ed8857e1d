//! Error types for Shipyard core.

use std::{error::Error, fmt};

use crate::domain::ShipId;

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipyardError {
    /// Malformed identifier, missing required field, or a field out of range.
    InvalidRequest(String),
    /// No ship is stored under the identifier.
    NotFound(ShipId),
    /// The registry backend failed.
    Storage(String),
}

impl ShipyardError {
    /// Build an invalid request error with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Build a storage error with a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;
