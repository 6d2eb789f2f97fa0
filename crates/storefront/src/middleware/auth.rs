//! Authentication extractors and session helpers.
//!
//! The login is kept under three session keys (`user`, `token`, `role`).
//! They are written together at login and removed together at logout; a
//! session missing any of them counts as logged out.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use jfa_backend::{BearerToken, LoginResponse};
use jfa_core::Role;
use jfa_core::models::SessionUser;
use tower_sessions::Session;

use crate::models::{CurrentUser, keys};

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireAuth(current): RequireAuth) -> impl IntoResponse {
///     format!("Hola, {}!", current.user.first_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// No session layer; a wiring bug.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;

        current_user(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };
        Ok(Self(user))
    }
}

/// Read the login from the session.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    let user: SessionUser = session.get(keys::USER).await.ok().flatten()?;
    let token: String = session.get(keys::TOKEN).await.ok().flatten()?;
    let _role: Role = session.get(keys::ROLE).await.ok().flatten()?;
    Some(CurrentUser {
        user,
        token: BearerToken::new(token),
    })
}

/// Store a successful login in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    login: &LoginResponse,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::USER, &login.user).await?;
    session.insert(keys::TOKEN, login.token.expose()).await?;
    session.insert(keys::ROLE, login.user.role).await
}

/// Remove the login and everything derived from it (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<SessionUser>(keys::USER).await?;
    session.remove::<String>(keys::TOKEN).await?;
    session.remove::<Role>(keys::ROLE).await?;
    session.remove::<serde_json::Value>(keys::CHECKOUT).await?;
    session
        .remove::<serde_json::Value>(keys::CONFIRMATION)
        .await?;
    Ok(())
}

/// Replace the stored user record, e.g. after a profile edit.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn refresh_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::USER, user).await
}
