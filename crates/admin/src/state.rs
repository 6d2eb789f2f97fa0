//! Application state shared across handlers.

use std::sync::Arc;

use jfa_backend::{Api, ApiClient, ApiError};

use crate::config::AdminConfig;
use crate::models::CurrentAdmin;

/// Application state shared across all handlers.
///
/// Cheap to clone; holds the configuration and the REST API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api_client(&self) -> &ApiClient {
        &self.inner.api
    }

    /// API handle carrying the admin's token.
    #[must_use]
    pub fn api<'a>(&'a self, admin: &'a CurrentAdmin) -> Api<'a> {
        self.inner.api.with_token(Some(&admin.token))
    }
}
