//! Application state shared across handlers.

use std::sync::Arc;

use jfa_backend::{Api, ApiClient, ApiError};

use crate::config::StorefrontConfig;
use crate::models::CurrentUser;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the REST API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the REST API client.
    #[must_use]
    pub fn api_client(&self) -> &ApiClient {
        &self.inner.api
    }

    /// API handle for the visitor: authenticated when logged in, anonymous
    /// otherwise.
    #[must_use]
    pub fn api<'a>(&'a self, user: Option<&'a CurrentUser>) -> Api<'a> {
        self.inner.api.with_token(user.map(|u| &u.token))
    }
}
