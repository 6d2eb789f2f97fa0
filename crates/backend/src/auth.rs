//! Login and registration.

use jfa_core::models::{NewUser, SessionUser};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::client::{Api, BearerToken};
use crate::error::ApiError;

/// Successful `POST /auth/login`.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: BearerToken,
    pub user: SessionUser,
}

#[derive(Deserialize)]
struct RawLogin {
    token: String,
    user: SessionUser,
}

impl Api<'_> {
    /// Exchange credentials for a bearer token and the user record.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials, or any transport error.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let raw: RawLogin =
            Self::send_json(self.request(Method::POST, "/auth/login").json(&body)).await?;

        if raw.token.trim().is_empty() {
            return Err(ApiError::Parse("login response has an empty token".to_owned()));
        }

        Ok(LoginResponse {
            token: BearerToken::new(raw.token),
            user: raw.user,
        })
    }

    /// Create an account (`POST /users/create`).
    ///
    /// # Errors
    ///
    /// Returns the API's message when the account is rejected (duplicate
    /// email, DNI or username).
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::POST, "/users/create").json(user)).await
    }
}
