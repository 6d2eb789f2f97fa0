//! HTTP plumbing shared by every endpoint module.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, extract_message};

/// Where the API listens when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Report responses are reused for this long.
const REPORT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A session bearer token.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for storing in the session.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Client for the REST API.
///
/// Cheap to clone; clones share the connection pool and the report cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    reports: Cache<String, serde_json::Value>,
}

impl ApiClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("jfa-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let reports = Cache::builder()
            .max_capacity(64)
            .time_to_live(REPORT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                reports,
            }),
        })
    }

    /// Handle for calls that need no session (catalog, login, register).
    #[must_use]
    pub const fn anonymous(&self) -> Api<'_> {
        Api {
            client: self,
            token: None,
        }
    }

    /// Handle for the current request. With `None` no `Authorization`
    /// header is sent.
    #[must_use]
    pub const fn with_token<'a>(&'a self, token: Option<&'a BearerToken>) -> Api<'a> {
        Api {
            client: self,
            token,
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Drop cached report responses.
    pub fn invalidate_reports(&self) {
        self.inner.reports.invalidate_all();
    }
}

/// A request-scoped view of [`ApiClient`] carrying the caller's token.
#[derive(Clone, Copy)]
pub struct Api<'a> {
    client: &'a ApiClient,
    token: Option<&'a BearerToken>,
}

impl fmt::Debug for Api<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.client.inner.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl<'a> Api<'a> {
    /// Whether this handle carries a token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) const fn token(&self) -> Option<&'a BearerToken> {
        self.token
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.client.inner.base_url)
    }

    /// Start a request to `path` (relative to the base URL, leading `/`).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.inner.http.request(method, self.url(path));
        match self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    /// Start a request with query parameters appended to the URL.
    pub(crate) fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = Url::parse(&self.url(path))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        let builder = self.client.inner.http.request(method, url);
        Ok(match self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send and read the body as text, mapping non-success statuses.
    async fn send_raw(builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = extract_message(&body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::warn!(status = %status, message = %message, "API rejected credentials");
                Err(ApiError::Unauthorized(message))
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(message)),
            _ => {
                tracing::error!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "API returned non-success status"
                );
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = Self::send_raw(builder).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send and decode a JSON body where an empty or `null` body means
    /// "nothing".
    pub(crate) async fn send_optional_json<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let body = Self::send_raw(builder).await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send and ignore whatever body comes back.
    pub(crate) async fn send_unit(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::send_raw(builder).await.map(|_| ())
    }

    /// GET a report endpoint through the report cache.
    pub(crate) async fn cached_report<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let key = self.request_with_query(Method::GET, path, query)?
            .build()?
            .url()
            .to_string();

        let value = if let Some(hit) = self.client.inner.reports.get(&key).await {
            debug!(key = %key, "Cache hit for report");
            hit
        } else {
            let builder = self.request_with_query(Method::GET, path, query)?;
            let value: serde_json::Value = Self::send_json(builder).await?;
            self.client.inner.reports.insert(key, value.clone()).await;
            value
        };

        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::AUTHORIZATION;

    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://api.test/api/").unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_urls_join_without_double_slash() {
        let client = client();
        assert_eq!(client.anonymous().url("/products"), "http://api.test/api/products");
    }

    #[test]
    fn test_anonymous_requests_carry_no_authorization() {
        let client = client();
        let request = client
            .anonymous()
            .request(Method::GET, "/products")
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        let request = client
            .with_token(None)
            .request(Method::GET, "/products")
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_requests_carry_bearer() {
        let client = client();
        let token = BearerToken::new("abc.def");
        let request = client
            .with_token(Some(&token))
            .request(Method::GET, "/order")
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc.def"
        );
    }

    #[test]
    fn test_query_parameters_are_encoded() {
        let client = client();
        let request = client
            .anonymous()
            .request_with_query(Method::GET, "/reports/clientes-top", &[("limite", "5".into())])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://api.test/api/reports/clientes-top?limite=5"
        );
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("secret-token");
        assert!(!format!("{token:?}").contains("secret-token"));
    }
}
