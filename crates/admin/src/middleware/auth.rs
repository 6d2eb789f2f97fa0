//! Authentication middleware and extractors for admin.
//!
//! A session only counts as an admin login when all three keys are present
//! and the stored role is `admin`. The API enforces the role again on every
//! call; this check keeps non-admins from seeing the panel at all.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use jfa_backend::{BearerToken, LoginResponse};
use jfa_core::Role;
use jfa_core::models::SessionUser;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, keys};

/// Extractor that requires admin authentication.
///
/// If no admin is logged in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", admin.display_name())
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but missing.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// No session layer; a wiring bug.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        current_admin(session)
            .await
            .map(Self)
            .ok_or(AdminAuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };
        Ok(Self(admin))
    }
}

/// Read the admin login from the session.
pub async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    let role: Role = session.get(keys::ROLE).await.ok().flatten()?;
    if !role.is_admin() {
        return None;
    }
    let user: SessionUser = session.get(keys::USER).await.ok().flatten()?;
    let token: String = session.get(keys::TOKEN).await.ok().flatten()?;
    Some(CurrentAdmin {
        user,
        token: BearerToken::new(token),
    })
}

/// Store an admin login in the session, cycling the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    login: &LoginResponse,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::USER, &login.user).await?;
    session.insert(keys::TOKEN, login.token.expose()).await?;
    session.insert(keys::ROLE, login.user.role).await
}

/// Remove the admin login (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
