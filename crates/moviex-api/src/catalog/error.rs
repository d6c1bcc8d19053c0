//! Error taxonomy for catalog requests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single catalog request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent, timed out, or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not valid JSON or did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The requested entity does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status other than 404.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the raw body.
        message: String,
    },
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ApiError::Network`].
    Network,
    /// See [`ApiError::Decode`].
    Decode,
    /// See [`ApiError::NotFound`].
    NotFound,
    /// See [`ApiError::Rejected`].
    Rejected,
}

impl ApiError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected { .. } => ErrorKind::Rejected,
        }
    }
}
