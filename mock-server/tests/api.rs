use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Account, Envelope};
use tower::ServiceExt;

const ID: &str = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc";
const ORG_ID: &str = "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn create_body(id: &str) -> String {
    format!(
        r#"{{"data":{{"id":"{id}","organisation_id":"{ORG_ID}","type":"accounts",
            "attributes":{{"country":"GB","name":["fake account"]}}}}}}"#
    )
}

// --- create ---

#[tokio::test]
async fn create_account_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/organisation/accounts", &create_body(ID)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<Account> = body_json(resp).await;
    assert_eq!(created.data.id.to_string(), ID);
    assert_eq!(created.data.version, 0);
    assert_eq!(created.data.attributes["country"], "GB");
}

#[tokio::test]
async fn create_account_missing_name_returns_400() {
    let body = format!(
        r#"{{"data":{{"id":"{ID}","organisation_id":"{ORG_ID}","type":"accounts",
            "attributes":{{"country":"GB"}}}}}}"#
    );
    let resp = app()
        .oneshot(json_request("POST", "/v1/organisation/accounts", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value = body_json(resp).await;
    assert_eq!(
        error["error_message"],
        "validation failure list:\nname in body is required"
    );
}

#[tokio::test]
async fn create_account_without_envelope_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/organisation/accounts", r#"{"id":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- fetch ---

#[tokio::test]
async fn fetch_account_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/v1/organisation/accounts/{ID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fetch_account_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/v1/organisation/accounts/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_account_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "DELETE",
            &format!("/v1/organisation/accounts/{ID}?version=0"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_account_without_version_returns_400() {
    let resp = app()
        .oneshot(empty_request("DELETE", &format!("/v1/organisation/accounts/{ID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn account_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v1/organisation/accounts", &create_body(ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // create again — duplicate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v1/organisation/accounts", &create_body(ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // fetch
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/v1/organisation/accounts/{ID}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Envelope<Account> = body_json(resp).await;
    assert_eq!(fetched.data.organisation_id.to_string(), ORG_ID);
    assert_eq!(fetched.data.account_type, "accounts");
    assert_eq!(fetched.data.created_on, fetched.data.modified_on);

    // delete with stale version — conflict
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request(
            "DELETE",
            &format!("/v1/organisation/accounts/{ID}?version=1"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request(
            "DELETE",
            &format!("/v1/organisation/accounts/{ID}?version=0"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // fetch after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/v1/organisation/accounts/{ID}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
