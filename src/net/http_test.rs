use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::header::AUTHORIZATION;
use tracing_subscriber::layer::{Context, SubscriberExt};

use super::test_helpers::*;
use super::*;

// =============================================================
// Helpers
// =============================================================

/// Counts `ERROR`-level events emitted while installed.
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn client() -> (Arc<MockTransport>, ApiClient) {
    let transport = MockTransport::new(vec![response(200, "{}")]);
    let client = client_with(&transport);
    (transport, client)
}

// =============================================================
// build_request
// =============================================================

#[test]
fn url_is_base_followed_by_path() {
    let (_, client) = client();
    for path in ["/auth/self", "/campaign/3/subjects", "", "?x=1"] {
        assert_eq!(client.build_request(path, RequestOptions::new()).url, format!("{TEST_BASE_URL}{path}"));
    }
}

#[test]
fn defaults_to_get_with_credentials() {
    let (_, client) = client();
    let request = client.build_request("/auth/self", RequestOptions::new());
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.credentials, Credentials::Include);
    assert_eq!(request.headers.get(ACCEPT).unwrap(), "application/json");
    assert!(request.body.is_none());
}

#[test]
fn credentials_survive_any_caller_options() {
    let (_, client) = client();
    let options = RequestOptions::new()
        .method(Method::DELETE)
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer x"))
        .body("payload");
    let request = client.build_request("/tutoring/1/hour/2", options);
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.credentials, Credentials::Include);
    assert_eq!(request.body.as_deref(), Some(b"payload".as_slice()));
}

#[test]
fn caller_headers_override_defaults() {
    let (_, client) = client();
    let options = RequestOptions::new().header(ACCEPT, HeaderValue::from_static("text/plain"));
    let request = client.build_request("/auth/self", options);
    let accept: Vec<_> = request.headers.get_all(ACCEPT).iter().collect();
    assert_eq!(accept.len(), 1);
    assert_eq!(accept[0], "text/plain");
}

#[test]
fn json_options_set_content_type_and_body() {
    let options = RequestOptions::new().json(&serde_json::json!({ "mail": "a@b.fr" })).unwrap();
    assert_eq!(options.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(options.body.as_deref(), Some(br#"{"mail":"a@b.fr"}"#.as_slice()));
}

// =============================================================
// fetch
// =============================================================

#[tokio::test]
async fn fetch_returns_raw_response_for_any_status() {
    let transport = MockTransport::new(vec![response(401, r#"{"error":"UNAUTHORIZED"}"#)]);
    let client = client_with(&transport);

    let response = client.fetch("/auth/self", RequestOptions::new()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!response.ok());
    assert_eq!(response.text(), r#"{"error":"UNAUTHORIZED"}"#);

    let sent = transport.last_request();
    assert_eq!(sent.url, "http://tutorat.test/auth/self");
    assert_eq!(sent.credentials, Credentials::Include);
}

#[tokio::test]
async fn fetch_rethrows_identical_error_after_logging_once() {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let failure = TransportError::Connect("connection refused".to_owned());
    let transport = MockTransport::new(vec![Err(failure.clone())]);
    let client = client_with(&transport);

    let err = client.fetch("/auth/self", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err, failure);
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_does_not_retry() {
    let transport = MockTransport::new(vec![Err(TransportError::Aborted("reset".to_owned())), response(200, "{}")]);
    let client = client_with(&transport);

    assert!(client.fetch("/auth/self", RequestOptions::new()).await.is_err());
    assert_eq!(transport.requests().len(), 1);
}

// =============================================================
// typed helpers
// =============================================================

#[tokio::test]
async fn send_maps_non_success_to_status_error() {
    let transport = MockTransport::new(vec![response(404, r#"{"code":404,"error":"NOT_FOUND","tip":"missing"}"#)]);
    let client = client_with(&transport);

    let err = client.send("/campaign/9/subjects", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn send_tolerates_non_json_error_body() {
    let transport = MockTransport::new(vec![response(502, "<html>bad gateway</html>")]);
    let client = client_with(&transport);

    let err = client.send("/auth/self", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, body: None, .. }));
}

#[tokio::test]
async fn get_json_reports_decode_failure() {
    let transport = MockTransport::new(vec![response(200, "not json")]);
    let client = client_with(&transport);

    let err = client.get_json::<Vec<u64>>("/admin/subjects").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn send_json_posts_encoded_body() {
    let transport = MockTransport::new(vec![json_response(200, &serde_json::json!([1, 2]))]);
    let client = client_with(&transport);

    let ids: Vec<u64> = client.send_json(Method::POST, "/ids", &serde_json::json!({ "n": 2 })).await.unwrap();
    assert_eq!(ids, vec![1, 2]);

    let sent = transport.last_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.body.as_deref(), Some(br#"{"n":2}"#.as_slice()));
}

#[tokio::test]
async fn send_unit_without_body_sends_none() {
    let transport = MockTransport::new(vec![response(200, "")]);
    let client = client_with(&transport);

    client.send_unit::<()>(Method::DELETE, "/tutoring/1/hour/2", None).await.unwrap();
    let sent = transport.last_request();
    assert_eq!(sent.method, Method::DELETE);
    assert!(sent.body.is_none());
    assert!(sent.headers.get(CONTENT_TYPE).is_none());
}
