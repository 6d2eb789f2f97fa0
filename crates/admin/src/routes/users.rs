//! User management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use jfa_core::UserId;
use jfa_core::catalog::{ADMIN_PAGE_SIZE, Page};
use jfa_core::models::User;
use tracing::instrument;

use crate::components::{PageQuery, Pager};
use crate::error::{Result, audit};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::layout::{AdminLayout, MessageQuery, Notice};
use crate::state::AppState;

/// User display data for the table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub city: String,
    pub role: &'static str,
    pub is_self: bool,
}

impl UserRow {
    fn new(user: &User, current: UserId) -> Self {
        Self {
            id: user.id.as_i32(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            dni: user.dni.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            phone: user.phone.clone(),
            city: user.city.clone(),
            role: user.role.as_str(),
            is_self: user.id == current,
        }
    }
}

/// Users list page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub layout: AdminLayout,
    pub users: Vec<UserRow>,
    pub pager: Pager,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Users list page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(messages): Query<MessageQuery>,
) -> Result<UsersIndexTemplate> {
    let users = state.api(&admin).list_users().await?;
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow::new(u, admin.user.id))
        .collect();
    let rows = Page::paginate(rows, page.page(), ADMIN_PAGE_SIZE);

    Ok(UsersIndexTemplate {
        layout: AdminLayout::new(&admin, "/users"),
        pager: Pager::new(&rows, "/users", None),
        users: rows.items,
        error: messages.error(),
        success: messages.success(),
    })
}

/// Delete a user account. An admin cannot delete the account they are
/// logged in with.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let id = UserId::new(id);
    if id == admin.user.id {
        return Ok(Notice::SelfDelete.error_at("/users"));
    }

    match state.api(&admin).delete_user(id).await {
        Ok(()) => {
            state.api_client().invalidate_reports();
            audit("user.delete", &[("user_id", id.to_string())]);
            Ok(Notice::UserDeleted.success_at("/users"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %id, "Failed to delete user");
            Ok(Notice::UserDeleteFailed.error_at("/users"))
        }
    }
}
