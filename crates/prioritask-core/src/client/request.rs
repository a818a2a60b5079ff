//! Outbound request and received response values.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Login endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "/auth/login";
/// Registration endpoint, relative to the base URL.
pub const REGISTER_PATH: &str = "/auth/register";
/// Token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

const AUTH_PATHS: [&str; 3] = [LOGIN_PATH, REGISTER_PATH, REFRESH_PATH];

/// A request to the Prioritask API.
///
/// Cloning yields the *same* logical request: clones share the retry marker,
/// so a request that already went through one refresh cycle will never
/// trigger another, no matter how often it is re-sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Value>,
    retried: Arc<AtomicBool>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            retried: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set an extra header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Validation(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Validation(format!("invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether this request already went through a refresh-and-retry cycle.
    pub fn is_retried(&self) -> bool {
        self.retried.load(Ordering::SeqCst)
    }

    /// Set the retry marker. Returns `false` if it was already set.
    pub(crate) fn mark_retried(&self) -> bool {
        !self.retried.swap(true, Ordering::SeqCst)
    }

    /// Whether the request targets login, registration or refresh. A 401 from
    /// these endpoints is final.
    pub fn is_auth_endpoint(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        AUTH_PATHS.contains(&path)
    }
}

/// A response received from the API, buffered in full.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }

    /// The `detail` field of an error body.
    ///
    /// Validation errors carry a list of `{ "msg": ... }` objects instead of a
    /// string; their messages are joined.
    pub fn detail(&self) -> Option<String> {
        let value: Value = serde_json::from_slice(&self.body).ok()?;
        match value.get("detail")? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    /// Turn a non-success response into an [`Error`].
    pub fn error_for_status(self, path: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_status(self.status, path, self.detail()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_retry_marker() {
        let request = ApiRequest::get("/tasks");
        let resent = request.clone();

        assert!(!resent.is_retried());
        assert!(request.mark_retried());
        assert!(resent.is_retried());
        assert!(!resent.mark_retried());

        // A freshly built request to the same path is unrelated.
        assert!(!ApiRequest::get("/tasks").is_retried());
    }

    #[test]
    fn test_auth_endpoint_detection() {
        assert!(ApiRequest::post("/auth/login").is_auth_endpoint());
        assert!(ApiRequest::post("/auth/register/").is_auth_endpoint());
        assert!(ApiRequest::post("/auth/refresh").is_auth_endpoint());
        assert!(!ApiRequest::get("/auth/me").is_auth_endpoint());
        assert!(!ApiRequest::get("/tasks").is_auth_endpoint());
    }

    #[test]
    fn test_query_and_body() {
        let request = ApiRequest::get("/history")
            .query("room_id", "r1")
            .query_opt("user_id", None::<String>)
            .query_opt("since", Some("2025-01-01"));
        assert_eq!(
            request.query_pairs(),
            &[
                ("room_id".to_string(), "r1".to_string()),
                ("since".to_string(), "2025-01-01".to_string())
            ]
        );

        let request = ApiRequest::post("/tags")
            .json(&serde_json::json!({ "nombre": "Urgente" }))
            .unwrap();
        assert_eq!(request.body().unwrap()["nombre"], "Urgente");
    }

    #[test]
    fn test_detail_extraction() {
        let resp = ApiResponse::new(
            400,
            HeaderMap::new(),
            r#"{"detail":"ID inválido"}"#.as_bytes().to_vec(),
        );
        assert_eq!(resp.detail().as_deref(), Some("ID inválido"));

        let resp = ApiResponse::new(
            422,
            HeaderMap::new(),
            br#"{"detail":[{"msg":"field required"},{"msg":"too short"}]}"#.to_vec(),
        );
        assert_eq!(resp.detail().as_deref(), Some("field required; too short"));

        let resp = ApiResponse::new(500, HeaderMap::new(), b"Internal Server Error".to_vec());
        assert_eq!(resp.detail(), None);
    }

    #[test]
    fn test_error_for_status() {
        let ok = ApiResponse::new(204, HeaderMap::new(), Vec::new());
        assert!(ok.error_for_status("/tags/1").is_ok());

        let missing = ApiResponse::new(404, HeaderMap::new(), br#"{"detail":"Tarea no encontrada"}"#.to_vec());
        match missing.error_for_status("/tasks/1") {
            Err(Error::NotFound { path, detail }) => {
                assert_eq!(path, "/tasks/1");
                assert_eq!(detail.as_deref(), Some("Tarea no encontrada"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
