//! Sidebar state and one-line notices shared by every admin page.

use axum::response::Redirect;
use serde::Deserialize;

use crate::models::CurrentAdmin;

/// Sidebar data rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct AdminLayout {
    pub admin_name: String,
    pub current_path: &'static str,
}

impl AdminLayout {
    #[must_use]
    pub fn new(admin: &CurrentAdmin, current_path: &'static str) -> Self {
        Self {
            admin_name: admin.display_name(),
            current_path,
        }
    }

    /// Whether the sidebar entry for `section` is the current page.
    #[must_use]
    pub fn is_active(&self, section: &str) -> bool {
        if section == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(section)
        }
    }
}

/// Outcome of an admin action, carried across the redirect as a short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Credentials,
    NotAdmin,
    LoginUnavailable,
    LoggedOut,
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    ProductDeleteFailed,
    UserDeleted,
    UserDeleteFailed,
    SelfDelete,
    StatusUpdated,
    StatusFailed,
    OrderDeleted,
    OrderDeleteFailed,
}

impl Notice {
    const ALL: [Self; 15] = [
        Self::Credentials,
        Self::NotAdmin,
        Self::LoginUnavailable,
        Self::LoggedOut,
        Self::ProductCreated,
        Self::ProductUpdated,
        Self::ProductDeleted,
        Self::ProductDeleteFailed,
        Self::UserDeleted,
        Self::UserDeleteFailed,
        Self::SelfDelete,
        Self::StatusUpdated,
        Self::StatusFailed,
        Self::OrderDeleted,
        Self::OrderDeleteFailed,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::NotAdmin => "not_admin",
            Self::LoginUnavailable => "unavailable",
            Self::LoggedOut => "logged_out",
            Self::ProductCreated => "product_created",
            Self::ProductUpdated => "product_updated",
            Self::ProductDeleted => "product_deleted",
            Self::ProductDeleteFailed => "product_delete_failed",
            Self::UserDeleted => "user_deleted",
            Self::UserDeleteFailed => "user_delete_failed",
            Self::SelfDelete => "self_delete",
            Self::StatusUpdated => "status_updated",
            Self::StatusFailed => "status_failed",
            Self::OrderDeleted => "order_deleted",
            Self::OrderDeleteFailed => "order_delete_failed",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Credentials => "Email o contraseña incorrectos",
            Self::NotAdmin => "Acceso denegado: se requieren permisos de administrador",
            Self::LoginUnavailable => "No se pudo iniciar sesión. Intenta más tarde.",
            Self::LoggedOut => "Sesión cerrada",
            Self::ProductCreated => "Producto creado correctamente",
            Self::ProductUpdated => "Producto actualizado correctamente",
            Self::ProductDeleted => "Producto eliminado",
            Self::ProductDeleteFailed => "Error al eliminar el producto",
            Self::UserDeleted => "Usuario eliminado",
            Self::UserDeleteFailed => "Error eliminando usuario",
            Self::SelfDelete => "No puedes eliminar tu propia cuenta",
            Self::StatusUpdated => "Estado del pedido actualizado",
            Self::StatusFailed => "Error al actualizar estado",
            Self::OrderDeleted => "Pedido eliminado",
            Self::OrderDeleteFailed => "Error al eliminar pedido",
        }
    }

    /// Look up a code from the query string.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    fn redirect(self, path: &str, key: &str) -> Redirect {
        let separator = if path.contains('?') { '&' } else { '?' };
        Redirect::to(&format!("{path}{separator}{key}={}", self.code()))
    }

    /// Redirect with the notice as an error.
    #[must_use]
    pub fn error_at(self, path: &str) -> Redirect {
        self.redirect(path, "error")
    }

    /// Redirect with the notice as a success message.
    #[must_use]
    pub fn success_at(self, path: &str) -> Redirect {
        self.redirect(path, "success")
    }
}

/// `?error=` / `?success=` codes, resolved to messages.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl MessageQuery {
    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        self.error.as_deref().and_then(Notice::from_code).map(Notice::message)
    }

    #[must_use]
    pub fn success(&self) -> Option<&'static str> {
        self.success
            .as_deref()
            .and_then(Notice::from_code)
            .map(Notice::message)
    }
}

/// `dd/mm/yyyy HH:MM`, or a dash when the API sent no usable date.
#[must_use]
pub fn format_timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".to_owned(), |d| d.format("%d/%m/%Y %H:%M").to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_codes_round_trip() {
        for notice in Notice::ALL {
            assert_eq!(Notice::from_code(notice.code()), Some(notice));
        }
    }

    #[test]
    fn test_message_query_ignores_unknown_codes() {
        let query = MessageQuery {
            error: Some("<script>".to_owned()),
            success: Some("product_created".to_owned()),
        };
        assert_eq!(query.error(), None);
        assert_eq!(query.success(), Some("Producto creado correctamente"));
    }

    #[test]
    fn test_redirect_appends_to_existing_query() {
        let response = axum::response::IntoResponse::into_response(
            Notice::StatusUpdated.success_at("/orders/4?pagina=2"),
        );
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/orders/4?pagina=2&success=status_updated"
        );
    }

    #[test]
    fn test_timestamp_format() {
        let date = chrono::DateTime::parse_from_rfc3339("2025-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(format_timestamp(Some(date)), "01/03/2025 12:30");
        assert_eq!(format_timestamp(None), "-");
    }
}
