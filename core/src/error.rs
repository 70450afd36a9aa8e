//! Error types for the EDI API client.
//!
//! # Design
//! Every failed call surfaces as a single `ApiError` carrying the request
//! URI it was issued against. Transport failures, non-2xx statuses and
//! payload mismatches are separate variants so callers can branch on them,
//! but none of them are retried or recovered inside the client.

use thiserror::Error;

use crate::serializer::SerializerError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure reported by an `HttpTransport` before any response was read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors returned by the EDI API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("request to {uri} failed: {source}")]
    Transport {
        uri: String,
        #[source]
        source: TransportError,
    },

    /// The remote service answered with a non-2xx status.
    #[error("request to {uri} returned HTTP {status}: {body}")]
    HttpStatus { uri: String, status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("unexpected response from {uri}: {source}")]
    Deserialization {
        uri: String,
        #[source]
        source: SerializerError,
    },

    /// The request payload could not be encoded.
    #[error("request payload for {uri} was not sent: {source}")]
    Serialization {
        uri: String,
        #[source]
        source: SerializerError,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The request URI the failure belongs to, if any.
    pub fn uri(&self) -> Option<&str> {
        match self {
            ApiError::Transport { uri, .. }
            | ApiError::HttpStatus { uri, .. }
            | ApiError::Deserialization { uri, .. }
            | ApiError::Serialization { uri, .. } => Some(uri),
            ApiError::Config(_) => None,
        }
    }

    /// The HTTP status returned by the remote service, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Transport {
                source: TransportError::Timeout,
                ..
            }
        )
    }
}
