//! End-to-end tests for the HTTP and SDK bindings against a loopback server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::{Value, json};
use waypoint_core::{
    ContentRequest, ContentSource, FetchError, Platform, PresentationType, UserIdentity,
    VerificationToken, VerifiedUser,
};
use waypoint_sources::{EmbeddedSdk, HttpContentSource, SdkConfig, SdkContentSource, TargetedContentSdk};

#[derive(Clone)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    status: StatusCode,
    body: Value,
}

async fn events_handler(
    State(state): State<Recorded>,
    Path(org): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.lock().unwrap().push((org, body));
    (state.status, Json(state.body.clone()))
}

async fn spawn_server(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<(String, Value)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = Recorded {
        calls: calls.clone(),
        status,
        body,
    };
    let app = Router::new()
        .route("/{org}/targeted-content-events", post(events_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), calls)
}

fn request(trigger_point: &str) -> ContentRequest {
    ContentRequest {
        identity: UserIdentity::new("u1").unwrap(),
        token: VerificationToken::new("feedface"),
        trigger_point: trigger_point.into(),
        platform: Platform::Desktop,
        content_types: vec!["featurette".into()],
    }
}

fn popup_body() -> Value {
    json!({
        "content": [
            {"triggerPoint": "payments", "viewUrl": "https://x/v1", "presentationType": "popup"},
            {
                "triggerPoint": "payments",
                "viewUrl": "https://x/tour",
                "presentationType": "button-triggered",
                "buttonConfig": {"title": "See tour", "textColor": "#fff", "backgroundColor": "#000", "borderRadius": 8}
            }
        ]
    })
}

#[tokio::test]
async fn created_response_yields_content() {
    let (base, calls) = spawn_server(StatusCode::CREATED, popup_body()).await;
    let source = HttpContentSource::new(&base, "acme", Duration::from_secs(5)).unwrap();

    let items = source.request_content(&request("payments")).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].view_url.as_deref(), Some("https://x/v1"));
    assert_eq!(items[1].presentation_type, PresentationType::ButtonTriggered);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (org, body) = &calls[0];
    assert_eq!(org, "acme");
    assert_eq!(body["type"], "trigger-point");
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["userIdVerification"], "feedface");
    assert_eq!(body["triggerPoint"], "payments");
    assert_eq!(body["platform"], "desktop");
    assert_eq!(body["contentTypes"], json!(["featurette"]));
}

#[tokio::test]
async fn ok_status_is_not_success() {
    let (base, _) = spawn_server(StatusCode::OK, popup_body()).await;
    let source = HttpContentSource::new(&base, "acme", Duration::from_secs(5)).unwrap();

    let err = source.request_content(&request("payments")).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status_code: 200, .. }));
}

#[tokio::test]
async fn server_error_is_status_failure() {
    let (base, _) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
    let source = HttpContentSource::new(&base, "acme", Duration::from_secs(5)).unwrap();

    match source.request_content(&request("payments")).await {
        Err(FetchError::Status { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_failure() {
    let (base, _) = spawn_server(StatusCode::CREATED, json!({"unexpected": true})).await;
    let source = HttpContentSource::new(&base, "acme", Duration::from_secs(5)).unwrap();

    let err = source.request_content(&request("payments")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn sdk_binding_posts_through_http_transport() {
    let (base, calls) = spawn_server(StatusCode::CREATED, popup_body()).await;
    let sdk = EmbeddedSdk::new();
    sdk.initialize(SdkConfig {
        organization_code: "acme".into(),
        api_base_url: base,
        platform: Platform::Mobile,
        content_types: vec!["featurette".into()],
        request_timeout: Duration::from_secs(5),
        button_class_name: None,
        view_class_name: None,
    })
    .await
    .unwrap();
    let source = SdkContentSource::new(sdk);

    let user = VerifiedUser {
        identity: UserIdentity::new("u2").unwrap(),
        token: VerificationToken::new("cafebabe"),
    };
    source.identify(Some(&user)).await;

    let items = source.request_content(&request("payments")).await.unwrap();
    assert_eq!(items.len(), 2);

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].1["userId"], "u2");
    assert_eq!(calls[0].1["userIdVerification"], "cafebabe");
    assert_eq!(calls[0].1["platform"], "mobile");
}
