use std::sync::Mutex;

use serde_json::json;

use super::*;
use crate::net::http::test_helpers::*;
use crate::net::http::{Credentials, HttpResponse};
use crate::ui::ToastKind;

// =============================================================
// Helpers
// =============================================================

#[derive(Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_owned());
    }
}

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

struct Harness {
    transport: Arc<MockTransport>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    store: SessionStore,
}

fn harness(results: Vec<Result<HttpResponse, TransportError>>) -> Harness {
    let transport = MockTransport::new(results);
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SessionStore::new(client_with(&transport), navigator.clone(), notifier.clone());
    Harness { transport, navigator, notifier, store }
}

fn user_body() -> serde_json::Value {
    json!({
        "id": 1,
        "firstName": "A",
        "lastName": "B",
        "mail": "a.b@insa.test",
        "isTutor": false,
        "isTutee": true,
        "isAdmin": false
    })
}

fn expected_user() -> SessionUser {
    SessionUser {
        id: 1,
        first_name: "A".to_owned(),
        last_name: "B".to_owned(),
        mail: "a.b@insa.test".to_owned(),
        is_tutor: false,
        is_tutee: true,
        is_admin: false,
    }
}

// =============================================================
// fetch_user
// =============================================================

#[tokio::test]
async fn store_starts_logged_out() {
    let h = harness(vec![]);
    assert_eq!(h.store.user(), None);
    assert!(!h.store.is_authenticated());
}

#[tokio::test]
async fn fetch_user_stores_user_on_success() {
    let h = harness(vec![json_response(200, &user_body())]);

    h.store.fetch_user().await;

    assert_eq!(h.store.user(), Some(expected_user()));
    assert!(h.store.is_authenticated());
    assert!(h.navigator.paths.lock().unwrap().is_empty());

    let sent = h.transport.last_request();
    assert_eq!(sent.method, reqwest::Method::GET);
    assert_eq!(sent.url, "http://tutorat.test/auth/self");
    assert_eq!(sent.credentials, Credentials::Include);
}

#[tokio::test]
async fn fetch_user_unauthorized_redirects_to_root() {
    let h = harness(vec![json_response(200, &user_body()), response(401, r#"{"error":"UNAUTHORIZED"}"#)]);
    h.store.fetch_user().await;
    assert!(h.store.is_authenticated());

    h.store.fetch_user().await;

    assert_eq!(h.store.user(), None);
    assert_eq!(*h.navigator.paths.lock().unwrap(), vec![ROOT_PATH.to_owned()]);
}

#[tokio::test]
async fn fetch_user_network_error_is_swallowed() {
    let h = harness(vec![
        json_response(200, &user_body()),
        Err(TransportError::Connect("connection refused".to_owned())),
    ]);
    h.store.fetch_user().await;

    h.store.fetch_user().await;

    assert_eq!(h.store.user(), None);
    assert!(h.navigator.paths.lock().unwrap().is_empty());
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_user_undecodable_body_logs_out() {
    let h = harness(vec![response(200, "<html>login</html>")]);

    h.store.fetch_user().await;

    assert_eq!(h.store.user(), None);
    assert!(h.navigator.paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sequential_fetches_last_write_wins() {
    let mut second = user_body();
    second["id"] = json!(2);
    let h = harness(vec![json_response(200, &user_body()), json_response(200, &second)]);

    h.store.fetch_user().await;
    h.store.fetch_user().await;

    assert_eq!(h.store.user().map(|u| u.id), Some(2));
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let h = harness(vec![json_response(200, &user_body()), response(200, "")]);
    let mut rx = h.store.subscribe();
    assert_eq!(*rx.borrow_and_update(), None);

    h.store.fetch_user().await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(expected_user()));

    h.store.logout().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), None);
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_success_clears_user_and_toasts_once() {
    let h = harness(vec![json_response(200, &user_body()), response(200, "")]);
    h.store.fetch_user().await;

    h.store.logout().await.unwrap();

    assert_eq!(h.store.user(), None);
    let toasts = h.notifier.toasts.lock().unwrap();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Success);
    assert_eq!(toasts[0].message, "Déconnexion réussie");

    let sent = h.transport.last_request();
    assert_eq!(sent.method, reqwest::Method::GET);
    assert_eq!(sent.url, "http://tutorat.test/auth/logout");
}

#[tokio::test]
async fn logout_failure_status_keeps_user_silently() {
    let h = harness(vec![json_response(200, &user_body()), response(500, "")]);
    h.store.fetch_user().await;

    h.store.logout().await.unwrap();

    assert_eq!(h.store.user(), Some(expected_user()));
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn logout_transport_error_propagates_and_keeps_user() {
    let failure = TransportError::Aborted("connection reset".to_owned());
    let h = harness(vec![json_response(200, &user_body()), Err(failure.clone())]);
    h.store.fetch_user().await;

    let err = h.store.logout().await.unwrap_err();

    assert_eq!(err, failure);
    assert_eq!(h.store.user(), Some(expected_user()));
    assert!(h.notifier.toasts.lock().unwrap().is_empty());
}
