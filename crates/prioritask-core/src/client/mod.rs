//! API client for the Prioritask backend.
//!
//! Every request goes through [`ApiClient::send`], which attaches the stored
//! access token and transparently renews it once on a 401.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use prioritask_core::{ApiClient, ClientConfig, MemorySessionStore};
//!
//! #[tokio::main]
//! async fn main() -> prioritask_core::Result<()> {
//!     let client = ApiClient::new(ClientConfig::from_env()?, Arc::new(MemorySessionStore::new()))?;
//!     let tasks = client.list_tasks().await?;
//!     println!("{} tasks", tasks.len());
//!     Ok(())
//! }
//! ```
//!
//! # 401 handling
//!
//! ```text
//! send ─► dispatch ─► 401? ─no─► return response
//!                      │
//!                      ├─ already retried / auth endpoint / no token ─► return 401
//!                      │
//!                      └─ mark retried ─► refresh (single flight)
//!                                          ├─ ok   ─► store token ─► dispatch once more
//!                                          └─ fail ─► clear token ─► SessionInvalidated ─► return 401
//! ```

mod events;
mod refresh;
mod request;

pub use events::SessionEvent;
pub use request::{ApiRequest, ApiResponse, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH};

use std::sync::Arc;

use futures::FutureExt;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::types::TokenResponse;
use events::EventBus;
use refresh::{RefreshFailure, RefreshGate, RefreshOutcome};

/// Authenticated client for the Prioritask API.
///
/// Cheap to clone; clones share the HTTP connection pool, the session store,
/// the event channel and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    events: EventBus,
    refresh: RefreshGate,
}

impl ApiClient {
    /// Create a client for `config`, reading and writing the session through
    /// `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("prioritask/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                store,
                events: EventBus::new(),
                refresh: RefreshGate::default(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The session store this client reads its token from.
    pub fn session(&self) -> &dyn SessionStore {
        self.inner.store.as_ref()
    }

    /// Whether an access token is currently stored.
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.inner.store.token()?.is_some())
    }

    /// Receive session lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.inner.events.emit(event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Core pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a request, renewing the session at most once on a 401.
    ///
    /// Every HTTP response, including error statuses, is returned as `Ok`.
    /// A 401 that could not be recovered is returned as the original 401
    /// response. `Err` is reserved for transport and session store failures.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let inner = &self.inner;

        let sent_with = inner.store.token()?;
        let response = inner.dispatch(request, sent_with.as_deref()).await?;
        if response.status() != 401 {
            return Ok(response);
        }

        if request.is_retried() {
            debug!(path = request.path(), "401 on an already retried request");
            return Ok(response);
        }
        if request.is_auth_endpoint() {
            debug!(path = request.path(), "401 from auth endpoint");
            return Ok(response);
        }
        let Some(current) = inner.store.token()? else {
            debug!(path = request.path(), "401 without a stored session");
            return Ok(response);
        };

        if !request.mark_retried() {
            return Ok(response);
        }

        let fresh = if sent_with.as_deref() != Some(current.as_str()) {
            debug!(path = request.path(), "Session renewed while request was in flight");
            current
        } else {
            match inner.refresh_token().await {
                Ok(token) => token,
                Err(failure) => {
                    warn!(path = request.path(), "Session could not be renewed: {}", failure);
                    return Ok(response);
                }
            }
        };

        inner.dispatch(request, Some(&fresh)).await
    }

    /// Like [`send`](Self::send), but resolves to [`Error::Cancelled`] as soon
    /// as `cancel` fires. A cancelled request never triggers a refresh.
    pub async fn send_with_cancel(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(path = request.path(), "Request cancelled");
                Err(Error::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    /// Renew the access token now. Joins a refresh already in flight.
    pub async fn refresh_session(&self) -> Result<()> {
        match self.inner.refresh_token().await {
            Ok(_) => Ok(()),
            Err(RefreshFailure::Transport(e)) => Err(Error::Transport(e)),
            Err(RefreshFailure::Storage(e)) => Err(Error::Storage(e)),
            Err(failure) => Err(Error::Unauthorized {
                detail: Some(failure.to_string()),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Send, fail on non-success status, decode the JSON body.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(&request)
            .await?
            .error_for_status(request.path())?
            .json()
    }

    /// Send and fail on non-success status, ignoring the body.
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(&request).await?.error_for_status(request.path())?;
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::get(path)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute_empty(ApiRequest::delete(path)).await
    }
}

impl ClientInner {
    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse> {
        let url = self.config.url_for(request.path());
        debug!(
            method = %request.method(),
            url = %url,
            authenticated = token.is_some(),
            "API request"
        );

        let mut headers = request.headers().clone();
        if token.is_some() {
            headers.remove(AUTHORIZATION);
        }

        let mut req = self
            .http
            .request(request.method().clone(), &url)
            .headers(headers);
        if !request.query_pairs().is_empty() {
            req = req.query(request.query_pairs());
        }
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{} {}: {}", request.method(), url, e)))?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        debug!(status, path = request.path(), "API response");
        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }

    /// Obtain a fresh token through the single-flight gate.
    async fn refresh_token(self: &Arc<Self>) -> RefreshOutcome {
        let this = Arc::downgrade(self);
        self.refresh
            .run(move || {
                async move {
                    match this.upgrade() {
                        Some(inner) => inner.perform_refresh().await,
                        None => Err(RefreshFailure::NoSession),
                    }
                }
                .boxed()
            })
            .await
    }

    async fn perform_refresh(&self) -> RefreshOutcome {
        let stale = self
            .store
            .token()
            .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
        let Some(stale) = stale else {
            return Err(RefreshFailure::NoSession);
        };

        let request = ApiRequest::post(REFRESH_PATH);
        let outcome = match self.dispatch(&request, Some(&stale)).await {
            Ok(resp) if resp.is_success() => match resp.json::<TokenResponse>() {
                Ok(body) if !body.access_token.is_empty() => Ok(body.access_token),
                Ok(_) => Err(RefreshFailure::Malformed("empty access_token".into())),
                Err(e) => Err(RefreshFailure::Malformed(e.to_string())),
            },
            Ok(resp) => Err(RefreshFailure::Rejected(resp.status())),
            Err(e) => Err(RefreshFailure::Transport(e.to_string())),
        };

        let outcome = outcome.and_then(|token| {
            self.store
                .set_token(&token)
                .map(|_| token)
                .map_err(|e| RefreshFailure::Storage(e.to_string()))
        });

        match outcome {
            Ok(token) => {
                info!("Access token refreshed");
                self.events.emit(SessionEvent::TokenRefreshed);
                Ok(token)
            }
            Err(failure) => {
                warn!("Token refresh failed, ending session: {}", failure);
                if let Err(e) = self.store.clear_token() {
                    warn!("Failed to clear stored token: {}", e);
                }
                self.events.emit(SessionEvent::SessionInvalidated);
                Err(failure)
            }
        }
    }
}
