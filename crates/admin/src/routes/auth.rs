//! Admin login and logout.
//!
//! Credentials go to the same API login as the storefront. Only accounts
//! whose role is `admin` get a session here; anyone else is turned away
//! before anything is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, audit, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::routes::layout::{MessageQuery, Notice};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Display the login page.
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        email: String::new(),
        error: query.error(),
        success: query.success(),
    }
    .into_response()
}

/// Handle the login form.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim().to_owned();
    if email.is_empty() || form.password.is_empty() {
        return Ok(LoginTemplate {
            email,
            error: Some(Notice::Credentials.message()),
            success: None,
        }
        .into_response());
    }

    let password = SecretString::from(form.password);
    let login = match state.api_client().anonymous().login(&email, &password).await {
        Ok(login) => login,
        Err(e) if e.is_unauthorized() => {
            tracing::info!("Admin login rejected");
            return Ok(Notice::Credentials.error_at("/auth/login").into_response());
        }
        Err(e) => {
            tracing::error!(error = %e, "Admin login failed");
            return Ok(Notice::LoginUnavailable
                .error_at("/auth/login")
                .into_response());
        }
    };

    if !login.user.role.is_admin() {
        tracing::warn!(user_id = %login.user.id, "Non-admin account tried to log in");
        return Ok(Notice::NotAdmin.error_at("/auth/login").into_response());
    }

    set_current_admin(&session, &login).await?;
    set_sentry_user(&login.user.id, Some(&login.user.email));
    audit("login", &[("user_id", login.user.id.to_string())]);

    Ok(Redirect::to("/").into_response())
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Notice::LoggedOut.success_at("/auth/login"))
}
