//! Router tests for the auth and status endpoints
mod common;

use crate::common::{
    default_app, test_app, FakeIdentityProvider, FakeProfileStore, FakePublisher, EXTERNAL_ID,
};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_service::models::USER_SIGN_UP_TOPIC;
use auth_service::routes::build_router;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-request-id", "test-request")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

// ============================================================================
// POST /auth/signUp
// ============================================================================

#[tokio::test]
async fn test_sign_up_returns_session() {
    let app = default_app();

    let (status, body) = send(
        build_router(app.state.clone()),
        post_json(
            "/auth/signUp",
            json!({"email": "a@x.com", "password": "secret1", "name": "Ada"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], "access-token");
    assert_eq!(body["refreshToken"], "refresh-token");
    assert_eq!(body["expiresIn"], 3600);
    assert!(body["expiresAt"].as_i64().is_some());
    assert_eq!(body["user"]["id"], EXTERNAL_ID);
    assert_eq!(body["user"]["email"], "a@x.com");

    let profiles = app.profiles.profiles.lock().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].auth_id, EXTERNAL_ID);
    assert_eq!(profiles[0].name, "Ada");

    let linked = app.identity.linked.lock().unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].1.profile_id, profiles[0].id);

    let published = app.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, USER_SIGN_UP_TOPIC);
    assert_eq!(
        published[0].1,
        json!({"id": profiles[0].id, "email": "a@x.com", "name": "Ada"})
    );
}

#[tokio::test]
async fn test_sign_up_rejects_invalid_input_before_side_effects() {
    let cases = [
        json!({"email": "a@x.com", "password": "12345", "name": "Ada"}),
        json!({"email": "a@x.com", "password": "x".repeat(51), "name": "Ada"}),
        json!({"email": "not-an-email", "password": "secret1", "name": "Ada"}),
        json!({"email": "a@x.com", "password": "secret1", "name": ""}),
        json!({"email": "a@x.com", "password": "secret1"}),
    ];

    for case in cases {
        let app = default_app();
        let (status, body) = send(build_router(app.state.clone()), post_json("/auth/signUp", case.clone())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", case);
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
        assert!(app.profiles.profiles.lock().unwrap().is_empty());
        assert!(app.publisher.published.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_sign_up_malformed_json() {
    let app = default_app();
    let request = Request::builder()
        .method("POST")
        .uri("/auth/signUp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(build_router(app.state), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_sign_up_provider_rejection_keeps_status_and_stage() {
    let app = test_app(
        FakeIdentityProvider {
            reject_create: Some((400, "User already registered")),
            ..Default::default()
        },
        FakeProfileStore::default(),
        FakePublisher::default(),
        true,
    );

    let (status, body) = send(
        build_router(app.state.clone()),
        post_json(
            "/auth/signUp",
            json!({"email": "a@x.com", "password": "secret1", "name": "Ada"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "User already registered", "status": 400, "stage": "createAccount"})
    );
    assert!(app.profiles.profiles.lock().unwrap().is_empty());
    assert!(app.publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_up_store_failure_hides_internals() {
    let app = test_app(
        FakeIdentityProvider::default(),
        FakeProfileStore {
            unavailable: true,
            ..Default::default()
        },
        FakePublisher::default(),
        true,
    );

    let (status, body) = send(
        build_router(app.state.clone()),
        post_json(
            "/auth/signUp",
            json!({"email": "a@x.com", "password": "secret1", "name": "Ada"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["stage"], "createProfile");
    assert_eq!(body["error"], "Internal server error");
    assert!(app.identity.linked.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_up_publish_failure_reports_stage() {
    let app = test_app(
        FakeIdentityProvider::default(),
        FakeProfileStore::default(),
        FakePublisher {
            disconnected: true,
            ..Default::default()
        },
        true,
    );

    let (status, body) = send(
        build_router(app.state.clone()),
        post_json(
            "/auth/signUp",
            json!({"email": "a@x.com", "password": "secret1", "name": "Ada"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["stage"], "publish");
    // Profile and back-link are left in place
    assert_eq!(app.profiles.profiles.lock().unwrap().len(), 1);
    assert_eq!(app.identity.linked.lock().unwrap().len(), 1);
}

// ============================================================================
// POST /auth/signIn, /auth/signOut
// ============================================================================

#[tokio::test]
async fn test_sign_in_returns_session() {
    let app = default_app();

    let (status, body) = send(
        build_router(app.state),
        post_json("/auth/signIn", json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], "access-token");
    assert_eq!(body["user"]["lastSignInAt"], "2022-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_sign_in_invalid_credentials() {
    let app = test_app(
        FakeIdentityProvider {
            reject_sign_in: Some((400, "Invalid login credentials")),
            ..Default::default()
        },
        FakeProfileStore::default(),
        FakePublisher::default(),
        true,
    );

    let (status, body) = send(
        build_router(app.state),
        post_json("/auth/signIn", json!({"email": "a@x.com", "password": "wrong-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid login credentials", "status": 400}));
}

#[tokio::test]
async fn test_sign_out() {
    let app = default_app();

    let (status, body) = send(
        build_router(app.state.clone()),
        post_json("/auth/signOut", json!({"jwt": "user-jwt"})),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(*app.identity.signed_out.lock().unwrap(), vec!["user-jwt".to_string()]);
}

#[tokio::test]
async fn test_sign_out_requires_token() {
    let app = default_app();

    let (status, _) = send(
        build_router(app.state.clone()),
        post_json("/auth/signOut", json!({"jwt": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.identity.signed_out.lock().unwrap().is_empty());
}

// ============================================================================
// GET /status, /health
// ============================================================================

#[tokio::test]
async fn test_status_all_healthy() {
    let app = default_app();
    let request = Request::builder().uri("/status").body(Body::empty()).unwrap();

    let (status, body) = send(build_router(app.state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "service": "OK",
            "integrations": [{"name": "supabase", "status": "OK"}],
            "databases": [{"name": "nova_auth", "status": "OK"}],
            "rabbitmq": [{"name": "user", "status": "OK"}]
        })
    );
}

#[tokio::test]
async fn test_status_reports_failures_with_200() {
    let app = test_app(
        FakeIdentityProvider {
            probe_down: true,
            ..Default::default()
        },
        FakeProfileStore::default(),
        FakePublisher {
            disconnected: true,
            ..Default::default()
        },
        true,
    );
    let request = Request::builder().uri("/status").body(Body::empty()).unwrap();

    let (status, body) = send(build_router(app.state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "OK");
    assert_eq!(body["integrations"][0]["status"], "ERROR");
    assert_eq!(body["databases"][0]["status"], "OK");
    assert_eq!(body["rabbitmq"][0]["status"], "ERROR");
}

#[tokio::test]
async fn test_health_liveness() {
    let app = default_app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(build_router(app.state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}
