//! Test harness for the storefront and admin.
//!
//! Each test starts a [`FakeApi`] standing in for the REST API and points a
//! real storefront or admin server at it. The fake answers from a table of
//! canned responses and records every call, so tests can assert on exactly
//! which requests a user action produced.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jfa-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request the fake API received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    /// Path without the query string, `/api` prefix included.
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedCall {
    /// `"PATCH /api/products/3/reduce-stock"`, for readable assertions.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Default)]
struct FakeState {
    responses: HashMap<(Method, String), (StatusCode, Value)>,
    calls: Vec<RecordedCall>,
}

/// An in-process stand-in for the REST API.
///
/// Unconfigured routes answer `200` with a `null` body.
#[derive(Clone)]
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// Bind on an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(FakeState::default()));
        let router = Router::new().fallback(record).with_state(Arc::clone(&state));
        let addr = serve(router).await;
        Self { addr, state }
    }

    /// Base URL to configure as `JFA_API_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Answer `method path` (path relative to `/api`) with `status` and `body`.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.lock()
            .responses
            .insert((method, format!("/api{path}")), (status, body));
    }

    /// Answer `method path` with `200` and `body`.
    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, StatusCode::OK, body);
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls other than `GET`, i.e. the ones that change something.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != Method::GET)
            .collect()
    }

    /// Forget the calls recorded so far.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn record(
    State(state): State<Arc<Mutex<FakeState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let call = RecordedCall {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).ok(),
    };

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.calls.push(call);
    let (status, body) = state
        .responses
        .get(&(method, path))
        .cloned()
        .unwrap_or((StatusCode::OK, Value::Null));
    drop(state);

    (status, axum::Json(body)).into_response()
}

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });
    addr
}

/// Start a storefront talking to `api`; returns its base URL.
pub async fn start_storefront(api: &FakeApi) -> String {
    let api_url = api.base_url();
    let config = jfa_storefront::config::StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_BASE_URL" => Some("http://localhost".to_owned()),
        "JFA_API_URL" => Some(api_url.clone()),
        "JFA_API_TIMEOUT_SECS" => Some("5".to_owned()),
        _ => None,
    })
    .expect("Invalid storefront config");
    let state = jfa_storefront::state::AppState::new(config).expect("Failed to build state");
    let addr = serve(jfa_storefront::app(state)).await;
    format!("http://{addr}")
}

/// Start an admin panel talking to `api`; returns its base URL.
pub async fn start_admin(api: &FakeApi) -> String {
    let api_url = api.base_url();
    let config = jfa_admin::config::AdminConfig::from_lookup(|key| match key {
        "ADMIN_BASE_URL" => Some("http://localhost".to_owned()),
        "JFA_API_URL" => Some(api_url.clone()),
        "JFA_API_TIMEOUT_SECS" => Some("5".to_owned()),
        _ => None,
    })
    .expect("Invalid admin config");
    let state = jfa_admin::state::AppState::new(config).expect("Failed to build state");
    let addr = serve(jfa_admin::app(state)).await;
    format!("http://{addr}")
}

/// A browser-like client: keeps cookies, does not follow redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The login response the fake API returns for a user with `role`.
#[must_use]
pub fn login_body(token: &str, user_id: i32, role: &str) -> Value {
    serde_json::json!({
        "token": token,
        "user": {
            "id": user_id,
            "nombre": "Ana",
            "apellido": "Pérez",
            "email": "ana@correo.com",
            "username": "ana",
            "role": role,
        }
    })
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
