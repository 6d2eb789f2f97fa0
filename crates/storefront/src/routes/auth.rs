//! Authentication route handlers.
//!
//! Login and registration go straight to the API; the login response is kept
//! in the session (see [`crate::middleware::auth`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use jfa_core::validation::{FormErrors, RegistrationForm};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::routes::layout::{Layout, MessageQuery, Notice};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Values echoed back into the registration form. Passwords are never
/// echoed.
#[derive(Debug, Clone, Default)]
pub struct RegisterValues {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl From<&RegistrationForm> for RegisterValues {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            dni: form.dni.clone(),
            email: form.email.clone(),
            username: form.username.clone(),
            phone: form.phone.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            postal_code: form.postal_code.clone(),
        }
    }
}

/// One input of the registration form with its error.
#[derive(Debug, Clone)]
pub struct RegisterField {
    pub label: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
}

impl RegisterValues {
    /// The form's inputs in display order. Password inputs start empty.
    #[must_use]
    pub fn fields(&self, errors: &FormErrors) -> Vec<RegisterField> {
        let field = |label: &'static str, name: &'static str, kind: &'static str, value: &str| {
            RegisterField {
                label,
                name,
                kind,
                value: value.to_owned(),
                error: errors.get(name),
            }
        };
        vec![
            field("Nombre", "nombre", "text", &self.first_name),
            field("Apellido", "apellido", "text", &self.last_name),
            field("DNI", "dni", "text", &self.dni),
            field("Email", "email", "email", &self.email),
            field("Usuario", "username", "text", &self.username),
            field("Contraseña", "password", "password", ""),
            field("Confirmar contraseña", "confirmar_password", "password", ""),
            field("Teléfono", "telefono", "tel", &self.phone),
            field("Dirección", "direccion", "text", &self.address),
            field("Ciudad", "ciudad", "text", &self.city),
            field("Código postal", "codigo_postal", "text", &self.postal_code),
        ]
    }
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub fields: Vec<RegisterField>,
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn new(values: &RegisterValues, errors: &FormErrors, error: Option<String>) -> Self {
        Self {
            layout: Layout::default(),
            fields: values.fields(errors),
            error,
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. A visitor who is already logged in goes home.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        layout: Layout::default(),
        email: String::new(),
        error: query.error(),
        success: query.success(),
    }
    .into_response()
}

/// Exchange the credentials for a token and store the login.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim().to_owned();
    if email.is_empty() || form.password.is_empty() {
        return Ok(LoginTemplate {
            layout: Layout::default(),
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
            tracing::info!("Login rejected");
            return Ok(Notice::Credentials.error_at("/auth/login").into_response());
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return Ok(Notice::LoginUnavailable
                .error_at("/auth/login")
                .into_response());
        }
    };

    set_current_user(&session, &login).await?;
    set_sentry_user(&login.user.id, Some(&login.user.email));
    add_breadcrumb("auth", "User logged in", &[("role", login.user.role.to_string())]);
    tracing::info!(user_id = %login.user.id, "User logged in");

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate::new(&RegisterValues::default(), &FormErrors::default(), None)
        .into_response()
}

/// Validate the form and create the account.
///
/// Field errors re-render the form; an API rejection shows the API's own
/// message (duplicate email, DNI or username).
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let values = RegisterValues::from(&form);
    let new_user = match form.validate() {
        Ok(new_user) => new_user,
        Err(errors) => {
            return RegisterTemplate::new(&values, &errors, None).into_response();
        }
    };

    if let Err(e) = state.api_client().anonymous().register(&new_user).await {
        tracing::warn!(error = %e, "Registration rejected");
        let message = e
            .api_message()
            .map_or_else(|| "No se pudo crear la cuenta. Intenta más tarde.".to_owned(), str::to_owned);
        return RegisterTemplate::new(&values, &FormErrors::default(), Some(message))
            .into_response();
    }

    tracing::info!("Account created");
    Notice::Registered.success_at("/auth/login").into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Forget the login and everything the session held for it.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_values_skip_passwords() {
        let form = RegistrationForm {
            first_name: "Ana".to_owned(),
            email: "ana@correo.com".to_owned(),
            password: "Secreta1".to_owned(),
            password_confirmation: "Secreta1".to_owned(),
            ..RegistrationForm::default()
        };
        let values = RegisterValues::from(&form);
        assert_eq!(values.first_name, "Ana");
        assert_eq!(values.email, "ana@correo.com");

        let fields = values.fields(&FormErrors::default());
        assert_eq!(fields.len(), 11);
        assert!(
            fields
                .iter()
                .filter(|f| f.kind == "password")
                .all(|f| f.value.is_empty())
        );
    }

    #[test]
    fn test_register_fields_carry_errors() {
        let form = RegistrationForm {
            email: "no-es-email".to_owned(),
            ..RegistrationForm::default()
        };
        let errors = form.validate().unwrap_err();
        let fields = RegisterValues::from(&form).fields(&errors);
        let email = fields.iter().find(|f| f.name == "email").unwrap();
        assert!(email.error.is_some());
        assert_eq!(email.value, "no-es-email");
    }
}
