//! Async client for the organisation accounts API.
//!
//! # Overview
//! `AccountsClient` fetches, creates and deletes account resources and maps
//! the API's status codes onto [`ApiError`]. It talks to the network only
//! through the [`Transport`] trait; [`HttpTransport`] is the reqwest-backed
//! implementation, bound to a base address at construction.
//!
//! # Design
//! - The client is stateless apart from its transport, so a single instance
//!   can be shared between tasks.
//! - Every call takes a [`RequestContext`]; cancelling it or letting its
//!   deadline pass aborts the in-flight request.
//! - Input the client can reject locally (non-UUID ids, missing attributes)
//!   fails before any I/O. Everything else is left to the server.
//! - Nothing is retried.
//!
//! ```rust,ignore
//! use accounts_client::{AccountsClient, HttpTransport, RequestContext, TransportConfig};
//!
//! let transport = HttpTransport::new("localhost:8080", TransportConfig::default())?;
//! let client = AccountsClient::new(transport);
//! let account = client.fetch_by_id(&RequestContext::background(), id).await?;
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod types;

pub use client::AccountsClient;
pub use context::RequestContext;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpTransport, Scheme, Transport, TransportConfig};
pub use types::{Account, AccountAttributes, CreateAccountRequest, Envelope};
