//! HTTP client for the BLT REST API.
//!
//! `ApiClient` builds requests against a configured base URL, attaches the
//! stored bearer token by default, and keeps a small time-limited cache of
//! GET responses. Every request is attempted exactly once: no retries, no
//! timeouts. Response bodies are parsed as JSON unconditionally.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::storage::{Storage, AUTH_TOKEN_KEY};

use super::ApiError;

/// How long a cached GET response stays usable.
/// 5 minutes keeps slow-changing data warm without hiding real updates.
const CACHE_DURATION_SECS: i64 = 5 * 60;

/// Options for a single request.
///
/// `headers`, when present, replaces the default header set wholesale —
/// including the JSON content type and the Authorization header — rather
/// than merging per key. That shallow replacement mirrors the behavior
/// callers of the original client rely on and is deliberate.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Option<header::HeaderMap>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: None,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: header::HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// A cached GET response.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    timestamp: DateTime<Utc>,
}

impl CacheEntry {
    fn new(data: Value) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }

    fn is_fresh(&self) -> bool {
        Utc::now() - self.timestamp < Duration::seconds(CACHE_DURATION_SECS)
    }
}

/// API client for the BLT backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the cache and storage are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    storage: Arc<dyn Storage>,
    cache: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl ApiClient {
    /// Create a client for `base_url`. The token is read from `storage` on
    /// every request, so login/logout take effect without rebuilding.
    pub fn new(base_url: String, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            base_url,
            client,
            storage,
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.storage.get(AUTH_TOKEN_KEY) {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Issue a request and parse the body as JSON.
    ///
    /// The URL is the concatenation of the base URL and `path`. A non-2xx
    /// status becomes `ApiError::Http` carrying the status code and text;
    /// transport failures propagate as `ApiError::Network`.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let headers = match options.headers {
            Some(headers) => headers,
            None => self.default_headers()?,
        };

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(ref body) = options.body {
            builder = builder.body(serde_json::to_string(body)?);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = %status, "Request failed");
            return Err(ApiError::from_status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET `path`, optionally consulting and filling the response cache.
    /// A fresh cached entry short-circuits the network entirely.
    pub async fn get(&self, path: &str, use_cache: bool) -> Result<Value, ApiError> {
        if use_cache {
            let cache = self.cache.lock().expect("cache lock poisoned");
            if let Some(entry) = cache.get(path) {
                if entry.is_fresh() {
                    debug!(path, "Cache hit");
                    return Ok(entry.data.clone());
                }
            }
        }

        let data = self.request(path, RequestOptions::new(Method::GET)).await?;

        if use_cache {
            self.cache
                .lock()
                .expect("cache lock poisoned")
                .insert(path.to_string(), CacheEntry::new(data.clone()));
        }

        Ok(data)
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(path, RequestOptions::new(Method::POST).with_body(body))
            .await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(path, RequestOptions::new(Method::PUT).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    /// Drop every cached entry unconditionally.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    #[cfg(test)]
    fn backdate_cache_entry(&self, path: &str, age_secs: i64) {
        let mut cache = self.cache.lock().unwrap();
        let entry = cache.get_mut(path).expect("no cache entry to backdate");
        entry.timestamp = Utc::now() - Duration::seconds(age_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), Arc::new(MemoryStorage::new())).unwrap()
    }

    fn client_with_token(server: &MockServer, token: &str) -> ApiClient {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, token).unwrap();
        ApiClient::new(server.uri(), storage).unwrap()
    }

    #[tokio::test]
    async fn test_get_parses_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": 7})))
            .mount(&server)
            .await;

        let data = client_for(&server).get("/stats", false).await.unwrap();
        assert_eq!(data["issues"], 7);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer t0ken"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_with_token(&server, "t0ken");
        api.get("/auth/me", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_headers_replace_defaults_wholesale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let api = client_with_token(&server, "t0ken");
        let mut custom = reqwest::header::HeaderMap::new();
        custom.insert("x-custom", reqwest::header::HeaderValue::from_static("1"));
        api.request("/raw", RequestOptions::new(Method::GET).with_headers(custom))
            .await
            .unwrap();

        // The shallow replacement drops the defaults, token included.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("x-custom").is_some());
        assert!(requests[0].headers.get("authorization").is_none());
        assert!(requests[0].headers.get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_becomes_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get("/missing", false).await.unwrap_err();
        match err {
            ApiError::Http { status, ref status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get("/page", false).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_cached_get_skips_network_within_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server);
        let first = api.get("/stats", true).await.unwrap();
        let second = api.get("/stats", true).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_cache_entry_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
            .expect(2)
            .mount(&server)
            .await;

        let api = client_for(&server);
        api.get("/stats", true).await.unwrap();
        api.backdate_cache_entry("/stats", CACHE_DURATION_SECS + 1);
        api.get("/stats", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_uncached_get_always_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
            .expect(2)
            .mount(&server)
            .await;

        let api = client_for(&server);
        api.get("/stats", false).await.unwrap();
        api.get("/stats", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
            .expect(2)
            .mount(&server)
            .await;

        let api = client_for(&server);
        api.get("/stats", true).await.unwrap();
        api.clear_cache();
        api.get("/stats", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_serializes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let data = api
            .post("/auth/login", &json!({"email": "a@b.com", "password": "pw"}))
            .await
            .unwrap();
        assert_eq!(data["ok"], true);

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_delete_sends_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/things/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        client_for(&server).delete("/things/1").await.unwrap();
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }
}
