//! HTTP transport for the accounts client.
//!
//! # Design
//! The resource client only sees the [`Transport`] trait: three verbs taking
//! a context and a path, returning the raw response. Nothing here looks at
//! status codes; a 404 or 500 comes back as `Ok` for the caller to classify.
//!
//! [`HttpTransport`] first describes each call as a plain-data
//! [`HttpRequest`] (method, URL, headers, body), then executes it with the
//! configured `reqwest::Client` under the caller's [`RequestContext`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use tracing::debug;
use url::Url;

use crate::context::RequestContext;
use crate::error::{ConfigError, TransportError};

/// Request timeout of the client built when none is injected.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The capability the resource client needs from an HTTP layer.
///
/// Implementations must return non-2xx responses as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, ctx: &RequestContext, path: &str) -> Result<Response, TransportError>;

    async fn post(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Response, TransportError>;

    async fn delete_with_query_params(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, TransportError>;
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// URL scheme used for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction-time settings for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Client used to execute requests. `None` builds a client with a
    /// [`DEFAULT_TIMEOUT_SECS`] request timeout.
    pub client: Option<reqwest::Client>,
    /// Defaults to plaintext [`Scheme::Http`].
    pub scheme: Scheme,
}

impl TransportConfig {
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_https(mut self) -> Self {
        self.scheme = Scheme::Https;
        self
    }
}

/// [`Transport`] backed by `reqwest`, bound to one base address.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    scheme: Scheme,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Bind a transport to `base_address`, a bare `host` or `host:port`.
    pub fn new(base_address: &str, config: TransportConfig) -> Result<Self, ConfigError> {
        if base_address.is_empty() {
            return Err(ConfigError::EmptyBaseAddress);
        }
        let base_url = Url::parse(&format!("{}://{base_address}", config.scheme)).map_err(
            |source| ConfigError::InvalidBaseAddress {
                address: base_address.to_string(),
                source,
            },
        )?;
        if base_url.path() != "/" || base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ConfigError::NotAnAuthority {
                address: base_address.to_string(),
            });
        }

        let client = match config.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .map_err(ConfigError::Client)?,
        };

        Ok(Self {
            base_url,
            scheme: config.scheme,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Describe a request against the base address without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let mut url = self.base_url.clone();
        url.set_path(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let headers = match body {
            Some(_) => vec![(
                CONTENT_TYPE.as_str().to_string(),
                "application/json".to_string(),
            )],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Send a described request, honouring the context's cancellation and
    /// deadline.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> Result<Response, TransportError> {
        let method = request.method;
        let mut builder = self.client.request(method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(|source| TransportError::Build {
            method: method.as_str(),
            source,
        })?;

        debug!(method = method.as_str(), url = %request.url(), "sending request");
        let response = ctx
            .run(self.client.execute(request))
            .await?
            .map_err(TransportError::Request)?;
        debug!(
            method = method.as_str(),
            status = response.status().as_u16(),
            "received response"
        );
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, ctx: &RequestContext, path: &str) -> Result<Response, TransportError> {
        let request = self.build_request(HttpMethod::Get, path, &[], None);
        self.execute(ctx, request).await
    }

    async fn post(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Response, TransportError> {
        let request = self.build_request(HttpMethod::Post, path, &[], Some(body));
        self.execute(ctx, request).await
    }

    async fn delete_with_query_params(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, TransportError> {
        let request = self.build_request(HttpMethod::Delete, path, query, None);
        self.execute(ctx, request).await
    }
}
