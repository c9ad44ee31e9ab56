//! Client registration and capability round-trip tests.

mod common;

use authz_server::services::Principal;
use axum::http::StatusCode;
use tower::ServiceExt;

fn bearer_for(state: &authz_server::AppState) -> String {
    let principal = Principal {
        id: uuid::Uuid::new_v4(),
        email: "operator@example.com".to_string(),
    };
    let issued = state.jwt.issue(&principal).unwrap();
    format!("Bearer {}", issued.token)
}

fn register_request(
    auth: &str,
    payload: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/clients/register")
        .header("content-type", "application/json")
        .header("authorization", auth)
        .body(axum::body::Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn duplicate_grant_types_collapse_and_round_trip() {
    let state = common::db_state().await;
    let auth = bearer_for(&state);
    let client_service = state.client_service.clone();
    let app = common::app(state).await;

    let res = app
        .oneshot(register_request(
            &auth,
            serde_json::json!({
                "clientName": "Round Trip",
                "authorizationGrantTypes": [
                    "authorization_code",
                    "refresh_token",
                    "authorization_code"
                ],
                "scopes": ["openid", "openid", "profile"],
                "requireAuthorizationConsent": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await;

    let grants = body["data"]["authorizationGrantTypes"].as_array().unwrap();
    assert_eq!(grants.len(), 2);

    // Reading the record back through the registry stays set-equal
    let client_id = body["data"]["clientId"].as_str().unwrap();
    let stored = client_service.find_by_client_id(client_id).await.unwrap();
    let grant_strings = stored.grant_types.as_strings();
    assert_eq!(grant_strings.len(), 2);
    assert!(grant_strings.contains("authorization_code"));
    assert!(grant_strings.contains("refresh_token"));
    assert_eq!(stored.scopes.as_strings().len(), 2);
    assert!(stored.require_authorization_consent);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn plaintext_secret_is_exposed_exactly_once() {
    let state = common::db_state().await;
    let auth = bearer_for(&state);
    let client_service = state.client_service.clone();
    let app = common::app(state).await;

    let res = app
        .oneshot(register_request(
            &auth,
            serde_json::json!({ "clientName": "Secret Holder" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await;

    let client_id = body["data"]["clientId"].as_str().unwrap();
    let plaintext = body["data"]["clientSecret"].as_str().unwrap();
    assert!(!plaintext.is_empty());

    // Every later read only yields the algorithm-tagged hash
    let stored = client_service.find_by_client_id(client_id).await.unwrap();
    assert!(stored.client_secret_hash.starts_with("$argon2"));
    assert_ne!(stored.client_secret_hash, plaintext);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn extension_values_survive_storage_verbatim() {
    let state = common::db_state().await;
    let auth = bearer_for(&state);
    let client_service = state.client_service.clone();
    let app = common::app(state).await;

    let res = app
        .oneshot(register_request(
            &auth,
            serde_json::json!({
                "clientName": "Extension Client",
                "clientAuthenticationMethods": ["private_key_jwt"],
                "authorizationGrantTypes": ["urn:ietf:params:oauth:grant-type:device_code"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await;

    let client_id = body["data"]["clientId"].as_str().unwrap();
    let stored = client_service.find_by_client_id(client_id).await.unwrap();
    assert!(stored
        .authentication_methods
        .as_strings()
        .contains("private_key_jwt"));
    assert!(stored
        .grant_types
        .as_strings()
        .contains("urn:ietf:params:oauth:grant-type:device_code"));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn caller_supplied_duplicate_client_id_is_rejected() {
    let state = common::db_state().await;
    let auth = bearer_for(&state);
    let app = common::app(state).await;

    let client_id = format!("pinned-{}", uuid::Uuid::new_v4().simple());
    let payload = serde_json::json!({
        "clientId": client_id,
        "clientName": "Pinned Id"
    });

    let res = app
        .clone()
        .oneshot(register_request(&auth, payload.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(register_request(&auth, payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn client_registration_requires_authentication() {
    let state = common::db_state().await;
    let app = common::app(state).await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/clients/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "clientName": "Anonymous" }).to_string(),
        ))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
