//! Accounts resource client.
//!
//! # Design
//! `AccountsClient` holds only its transport and carries no mutable state
//! between calls, so one instance can serve concurrent callers. Each
//! operation validates its input, issues exactly one request, and maps the
//! status code to a result. Input rejected locally never reaches the
//! transport.

use reqwest::{Response, StatusCode};
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpTransport, Transport};
use crate::types::{Account, CreateAccountRequest, Envelope};

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// Client for the `/v1/organisation/accounts` resource.
#[derive(Debug, Clone)]
pub struct AccountsClient<T = HttpTransport> {
    transport: T,
}

impl<T: Transport> AccountsClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a single account with `GET /v1/organisation/accounts/{id}`.
    pub async fn fetch_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Account, ApiError> {
        validate_id(id)?;
        let resp = self
            .transport
            .get(ctx, &account_path(id))
            .await
            .map_err(transport_error("GET"))?;

        let status = resp.status();
        debug!(%id, status = status.as_u16(), "fetch account");
        match status {
            StatusCode::OK => {
                let body = read_body(ctx, resp).await.map_err(transport_error("GET"))?;
                let envelope: Envelope<Account> =
                    serde_json::from_slice(&body).map_err(ApiError::Decode)?;
                Ok(envelope.data)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            other => Err(ApiError::UnexpectedStatusCode {
                code: other.as_u16(),
            }),
        }
    }

    /// Create an account with `POST /v1/organisation/accounts`.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        request: &CreateAccountRequest,
    ) -> Result<(), ApiError> {
        validate_create_request(request)?;
        let body = serde_json::to_vec(&Envelope::new(request)).map_err(ApiError::Encode)?;
        let resp = self
            .transport
            .post(ctx, ACCOUNTS_PATH, body)
            .await
            .map_err(transport_error("POST"))?;

        let status = resp.status();
        debug!(status = status.as_u16(), "create account");
        match status {
            StatusCode::CREATED => Ok(()),
            StatusCode::BAD_REQUEST => {
                let reason = match read_body(ctx, resp).await {
                    Ok(body) => String::from_utf8_lossy(&body).into_owned(),
                    Err(_) => "unknown".to_string(),
                };
                Err(ApiError::BadRequest { reason })
            }
            StatusCode::CONFLICT => Err(ApiError::conflict("account already exists")),
            other => Err(ApiError::UnexpectedStatusCode {
                code: other.as_u16(),
            }),
        }
    }

    /// Delete an account with `DELETE /v1/organisation/accounts/{id}?version={n}`.
    ///
    /// The server refuses the delete with a conflict when `version` is not
    /// the account's current version.
    pub async fn delete_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
        version: i64,
    ) -> Result<(), ApiError> {
        validate_id(id)?;
        let version = version.to_string();
        let resp = self
            .transport
            .delete_with_query_params(ctx, &account_path(id), &[("version", version.as_str())])
            .await
            .map_err(transport_error("DELETE"))?;

        let status = resp.status();
        debug!(%id, %version, status = status.as_u16(), "delete account");
        match status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::CONFLICT => Err(ApiError::conflict("specified version incorrect")),
            other => Err(ApiError::UnexpectedStatusCode {
                code: other.as_u16(),
            }),
        }
    }
}

fn account_path(id: &str) -> String {
    format!("{ACCOUNTS_PATH}/{id}")
}

fn validate_id(id: &str) -> Result<(), ApiError> {
    if Uuid::parse_str(id).is_err() {
        debug!(%id, "rejecting non-uuid id");
        return Err(ApiError::validation("id isn't uuid"));
    }
    Ok(())
}

fn validate_create_request(request: &CreateAccountRequest) -> Result<(), ApiError> {
    if request.attributes.is_none() {
        debug!("rejecting create request without attributes");
        return Err(ApiError::validation("Attributes property can't be empty"));
    }
    Ok(())
}

fn transport_error(operation: &'static str) -> impl Fn(TransportError) -> ApiError {
    move |source| ApiError::Transport { operation, source }
}

async fn read_body(ctx: &RequestContext, resp: Response) -> Result<Vec<u8>, TransportError> {
    let bytes = ctx.run(resp.bytes()).await?.map_err(TransportError::Body)?;
    Ok(bytes.to_vec())
}
