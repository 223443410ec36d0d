//! Error types for the accounts API client.
//!
//! # Design
//! `ApiError` is what the resource client hands back to callers. Statuses the
//! API documents for an operation get their own variant; anything else lands
//! in `UnexpectedStatusCode`. Failures below the HTTP status line (building
//! the request, the network, the body) are `TransportError`s and reach the
//! caller wrapped in `ApiError::Transport` with the cause preserved.
//! `ConfigError` is only produced while constructing an `HttpTransport`.

use thiserror::Error;

/// Errors returned by `AccountsClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input was rejected before any request was issued.
    #[error("request isn't valid: {reason}")]
    Validation { reason: String },

    /// The server returned 404.
    #[error("not found")]
    NotFound,

    /// The server returned 409: duplicate resource or stale version.
    #[error("{reason}")]
    Conflict { reason: String },

    /// The server returned 400. `reason` is the raw response body, or
    /// `"unknown"` when the body could not be read.
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    /// The server returned a status the operation does not handle.
    #[error("unexpected status code {code}")]
    UnexpectedStatusCode { code: u16 },

    #[error("{operation} request failed")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("failed to decode body")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode payload to json")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        ApiError::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn conflict(reason: impl Into<String>) -> Self {
        ApiError::Conflict {
            reason: reason.into(),
        }
    }
}

/// Errors raised by a `Transport` while issuing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build {method} request")]
    Build {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed")]
    Request(#[source] reqwest::Error),

    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Errors raised while constructing an `HttpTransport`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("empty base address")]
    EmptyBaseAddress,

    #[error("failed to parse base address: {address}")]
    InvalidBaseAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base address must be host[:port], got: {address}")]
    NotAnAuthority { address: String },

    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
}
