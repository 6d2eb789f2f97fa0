//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use jfa_core::models::{Order, SessionUser};
use jfa_core::validation::{PasswordChangeForm, ProfileForm};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::auth::refresh_user;
use crate::routes::layout::{Layout, MessageQuery, Notice};
use crate::state::AppState;

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub date: String,
    pub total: String,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub item_count: u32,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: order
                .created_at
                .map_or_else(|| "-".to_owned(), |d| d.format("%d/%m/%Y").to_string()),
            total: order.total.to_string(),
            status_label: order.status.label(),
            status_tone: order.status.tone(),
            item_count: order.lines.iter().map(|line| line.quantity).sum(),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRow>,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/settings.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub user: SessionUser,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Display the order history, newest first.
#[instrument(skip(state, current))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let mut orders = state
        .api(Some(&current))
        .user_orders(current.user.id)
        .await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    Ok(OrdersTemplate {
        layout: Layout::load(&state, Some(&current)).await,
        orders: orders.iter().map(OrderRow::from).collect(),
    })
}

/// Display the profile and password forms.
#[instrument(skip(state, current, query))]
pub async fn settings(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let layout = Layout::load(&state, Some(&current)).await;
    let user = current.user;
    SettingsTemplate {
        layout,
        phone: user.phone.clone().unwrap_or_default(),
        address: user.address.clone().unwrap_or_default(),
        city: user.city.clone().unwrap_or_default(),
        postal_code: user.postal_code.clone().unwrap_or_default(),
        user,
        error: query.error(),
        success: query.success(),
    }
}

/// Save profile fields and refresh the session copy of the user.
#[instrument(skip(state, session, current, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect> {
    let Ok(update) = form.into_update() else {
        return Ok(Notice::ProfileFailed.error_at("/account/settings"));
    };

    if let Err(e) = state
        .api(Some(&current))
        .update_user(current.user.id, &update)
        .await
    {
        tracing::warn!(error = %e, "Profile update failed");
        return Ok(Notice::ProfileFailed.error_at("/account/settings"));
    }

    let mut user = current.user;
    user.apply(&update);
    refresh_user(&session, &user).await?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Notice::ProfileUpdated.success_at("/account/settings"))
}

/// Change the password.
#[instrument(skip(state, current, form))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<PasswordChangeForm>,
) -> Redirect {
    let update = match form.validate() {
        Ok(update) => update,
        Err(e) => {
            tracing::debug!(field = e.field, "Password change rejected");
            return Notice::PasswordFailed.error_at("/account/settings");
        }
    };

    match state
        .api(Some(&current))
        .update_user(current.user.id, &update)
        .await
    {
        Ok(()) => Notice::PasswordUpdated.success_at("/account/settings"),
        Err(e) => {
            tracing::warn!(error = %e, "Password change failed");
            Notice::PasswordFailed.error_at("/account/settings")
        }
    }
}
