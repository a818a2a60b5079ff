//! In-process mock of the Prioritask backend for tests.
//!
//! Every request is recorded. `/auth/login` and `/auth/register` are public,
//! `/auth/refresh` follows the configured [`RefreshBehavior`], and every
//! other path requires a bearer token from the accepted set before the
//! canned response registered with [`MockBackend::on`] is returned.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::session::MemorySessionStore;

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub(crate) enum RefreshBehavior {
    /// Issue `token` and start accepting it.
    Issue(String),
    /// Issue `token` without accepting it on other endpoints.
    IssueUnusable(String),
    /// Answer with the given status.
    Fail(u16),
}

struct MockState {
    accepted: Mutex<HashSet<String>>,
    routes: Mutex<HashMap<(Method, String), (u16, Value)>>,
    refresh: Mutex<RefreshBehavior>,
    refresh_delay: Mutex<Duration>,
    response_delay: Mutex<Duration>,
    refresh_calls: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

pub(crate) struct MockBackend {
    state: Arc<MockState>,
    base_url: String,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub(crate) async fn start() -> Self {
        let state = Arc::new(MockState {
            accepted: Mutex::new(HashSet::new()),
            routes: Mutex::new(HashMap::new()),
            refresh: Mutex::new(RefreshBehavior::Fail(401)),
            refresh_delay: Mutex::new(Duration::ZERO),
            response_delay: Mutex::new(Duration::ZERO),
            refresh_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}{}", addr, API_PREFIX),
            server,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client against this backend with an in-memory session.
    pub(crate) fn client(&self, token: Option<&str>) -> (ApiClient, Arc<MemorySessionStore>) {
        let store = Arc::new(match token {
            Some(t) => MemorySessionStore::with_token(t),
            None => MemorySessionStore::new(),
        });
        let config = ClientConfig::new(self.base_url()).unwrap();
        let client = ApiClient::new(config, store.clone()).unwrap();
        (client, store)
    }

    pub(crate) fn accept_token(&self, token: &str) {
        self.state.accepted.lock().unwrap().insert(token.to_string());
    }

    pub(crate) fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body));
    }

    pub(crate) fn refresh_with(&self, behavior: RefreshBehavior) {
        *self.state.refresh.lock().unwrap() = behavior;
    }

    pub(crate) fn delay_refresh(&self, delay: Duration) {
        *self.state.refresh_delay.lock().unwrap() = delay;
    }

    pub(crate) fn delay_responses(&self, delay: Duration) {
        *self.state.response_delay.lock().unwrap() = delay;
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Requests received for `path` (relative to the API prefix).
    pub(crate) fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn json_response(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, axum::Json(body)).into_response()
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    if path == "/auth/refresh" {
        state.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *state.refresh_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        let behavior = state.refresh.lock().unwrap().clone();
        return match behavior {
            RefreshBehavior::Issue(token) => {
                state.accepted.lock().unwrap().insert(token.clone());
                json_response(200, json!({ "access_token": token, "token_type": "bearer" }))
            }
            RefreshBehavior::IssueUnusable(token) => {
                json_response(200, json!({ "access_token": token, "token_type": "bearer" }))
            }
            RefreshBehavior::Fail(status) => {
                json_response(status, json!({ "detail": "Token inválido o expirado" }))
            }
        };
    }

    let delay = *state.response_delay.lock().unwrap();
    tokio::time::sleep(delay).await;

    let public = path == "/auth/login" || path == "/auth/register";
    if !public {
        let token = authorization
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "));
        let allowed = token.is_some_and(|t| state.accepted.lock().unwrap().contains(t));
        if !allowed {
            return json_response(
                401,
                json!({ "detail": "No autorizado. Por favor, proporcione un token válido." }),
            );
        }
    }

    let route = state.routes.lock().unwrap().get(&(method, path)).cloned();
    match route {
        Some((status, body)) => json_response(status, body),
        None => json_response(404, json!({ "detail": "Not Found" })),
    }
}
