//! User administration and profile updates.

use jfa_core::UserId;
use jfa_core::models::{ProfileUpdate, User};
use reqwest::Method;
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

impl Api<'_> {
    /// `GET /users` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token lacks the role.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Self::send_json(self.request(Method::GET, "/users")).await
    }

    /// `PATCH /users/{id}`. Used for profile edits and password changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> Result<(), ApiError> {
        if self.token().is_none() {
            return Err(ApiError::MissingCredentials);
        }
        Self::send_unit(
            self.request(Method::PATCH, &format!("/users/{id}"))
                .json(update),
        )
        .await
    }

    /// `DELETE /users/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::DELETE, &format!("/users/{id}"))).await
    }
}
