//! Pieces shared by every page: the header state and one-line notices.

use axum::response::Redirect;
use jfa_core::models::Product;
use serde::Deserialize;

use crate::models::CurrentUser;
use crate::state::AppState;

/// Header data rendered by `base.html`.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user_name: Option<String>,
    pub cart_count: u32,
}

impl Layout {
    /// Header for the visitor. The badge count costs a cart fetch; a failure
    /// there only hides the count.
    pub async fn load(state: &AppState, user: Option<&CurrentUser>) -> Self {
        let Some(current) = user else {
            return Self::default();
        };

        let cart_count = match state.api(user).get_cart(current.user.id).await {
            Ok(cart) => cart.item_count(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart count");
                0
            }
        };

        Self {
            user_name: Some(current.user.first_name.clone()),
            cart_count,
        }
    }
}

/// Outcome of a form action, carried across the redirect as a short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoginRequired,
    OutOfStock,
    AddFailed,
    Added,
    CartFailed,
    Credentials,
    LoginUnavailable,
    Registered,
    ProfileUpdated,
    ProfileFailed,
    PasswordUpdated,
    PasswordFailed,
    OrderFailed,
    EmptyCart,
    PaymentEmail,
}

impl Notice {
    const ALL: [Self; 15] = [
        Self::LoginRequired,
        Self::OutOfStock,
        Self::AddFailed,
        Self::Added,
        Self::CartFailed,
        Self::Credentials,
        Self::LoginUnavailable,
        Self::Registered,
        Self::ProfileUpdated,
        Self::ProfileFailed,
        Self::PasswordUpdated,
        Self::PasswordFailed,
        Self::OrderFailed,
        Self::EmptyCart,
        Self::PaymentEmail,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LoginRequired => "login_required",
            Self::OutOfStock => "out_of_stock",
            Self::AddFailed => "add_failed",
            Self::Added => "added",
            Self::CartFailed => "cart_failed",
            Self::Credentials => "credentials",
            Self::LoginUnavailable => "unavailable",
            Self::Registered => "registered",
            Self::ProfileUpdated => "profile_updated",
            Self::ProfileFailed => "profile_failed",
            Self::PasswordUpdated => "password_updated",
            Self::PasswordFailed => "password_failed",
            Self::OrderFailed => "order_failed",
            Self::EmptyCart => "empty_cart",
            Self::PaymentEmail => "payment_email",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LoginRequired => "Debes iniciar sesión para agregar productos",
            Self::OutOfStock => "No hay stock disponible",
            Self::AddFailed => "No se pudo agregar el producto",
            Self::Added => "Producto agregado al carrito",
            Self::CartFailed => "No se pudo actualizar el carrito. Intenta de nuevo.",
            Self::Credentials => "Email o contraseña incorrectos",
            Self::LoginUnavailable => "No se pudo iniciar sesión. Intenta más tarde.",
            Self::Registered => "¡Cuenta creada! Ya puedes iniciar sesión.",
            Self::ProfileUpdated => "¡Perfil actualizado correctamente!",
            Self::ProfileFailed => "Hubo un error al actualizar el perfil.",
            Self::PasswordUpdated => "¡Contraseña actualizada correctamente!",
            Self::PasswordFailed => "Hubo un error al cambiar la contraseña.",
            Self::OrderFailed => "No se pudo confirmar el pedido. Intenta de nuevo.",
            Self::EmptyCart => "No hay productos en el carrito",
            Self::PaymentEmail => "Ingresa el correo asociado a tu cuenta de Mercado Pago",
        }
    }

    /// Look up a code from the query string.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    /// Redirect to `path` with this notice as `?{key}=code`.
    #[must_use]
    pub fn redirect(self, path: &str, key: &str) -> Redirect {
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

/// Only same-site paths are followed after a form post.
#[must_use]
pub fn local_path(candidate: Option<&str>, fallback: &str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => fallback.to_owned(),
    }
}

/// A product as shown on catalog cards.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: i32,
    pub in_stock: bool,
    pub low_stock: bool,
    pub image_url: Option<String>,
}

/// Card descriptions are cut to this many characters.
const CARD_DESCRIPTION_LENGTH: usize = 50;

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.short_description(CARD_DESCRIPTION_LENGTH),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            in_stock: product.in_stock(),
            low_stock: product.is_low_stock(),
            image_url: product.image_url.clone(),
        }
    }
}
