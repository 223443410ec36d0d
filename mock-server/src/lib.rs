use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub account_type: String,
    pub version: i64,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct NewAccount {
    pub id: Option<String>,
    pub organisation_id: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<i64>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error_message": message }))).into_response()
}

/// Checks the fields the accounts API requires, returning one message per
/// failure.
fn validate(input: &NewAccount) -> Result<(Uuid, Uuid, Map<String, Value>), Vec<String>> {
    let mut failures = Vec::new();

    let id = match input.id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => {
            failures.push("id in body must be of type uuid".to_string());
            None
        }
        None => {
            failures.push("id in body is required".to_string());
            None
        }
    };
    let organisation_id = match input.organisation_id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => {
            failures.push("organisation_id in body must be of type uuid".to_string());
            None
        }
        None => {
            failures.push("organisation_id in body is required".to_string());
            None
        }
    };
    match input.account_type.as_deref() {
        Some("accounts") => {}
        Some(_) => failures.push("type in body should be one of [accounts]".to_string()),
        None => failures.push("type in body is required".to_string()),
    }

    let attributes = input.attributes.clone().unwrap_or_default();
    if input.attributes.is_none() {
        failures.push("attributes in body is required".to_string());
    } else {
        let has_name = attributes
            .get("name")
            .and_then(Value::as_array)
            .is_some_and(|names| !names.is_empty());
        if !has_name {
            failures.push("name in body is required".to_string());
        }
        if !attributes.get("country").is_some_and(Value::is_string) {
            failures.push("country in body is required".to_string());
        }
    }

    match (id, organisation_id) {
        (Some(id), Some(organisation_id)) if failures.is_empty() => {
            Ok((id, organisation_id, attributes))
        }
        _ => Err(failures),
    }
}

async fn create_account(
    State(db): State<Db>,
    Json(input): Json<Envelope<NewAccount>>,
) -> Response {
    let (id, organisation_id, attributes) = match validate(&input.data) {
        Ok(fields) => fields,
        Err(failures) => {
            debug!(?failures, "rejecting account");
            let message = format!("validation failure list:\n{}", failures.join("\n"));
            return error_response(StatusCode::BAD_REQUEST, &message);
        }
    };

    let mut accounts = db.write().await;
    if accounts.contains_key(&id) {
        debug!(%id, "duplicate account");
        return error_response(
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint",
        );
    }

    let now = Utc::now();
    let account = Account {
        id,
        organisation_id,
        account_type: "accounts".to_string(),
        version: 0,
        created_on: now,
        modified_on: now,
        attributes,
    };
    accounts.insert(id, account.clone());
    debug!(%id, "created account");
    (StatusCode::CREATED, Json(Envelope { data: account })).into_response()
}

async fn fetch_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Account>>, Response> {
    let accounts = db.read().await;
    accounts
        .get(&id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                &format!("record {id} does not exist"),
            )
        })
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Some(version) = params.version else {
        return error_response(StatusCode::BAD_REQUEST, "invalid version number");
    };

    let mut accounts = db.write().await;
    match accounts.get(&id) {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(account) if account.version != version => {
            error_response(StatusCode::CONFLICT, "invalid version")
        }
        Some(_) => {
            accounts.remove(&id);
            debug!(%id, version, "deleted account");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
