//! Cart route handlers.
//!
//! The cart lives on the API. Every action is a form post that runs the
//! calls and redirects back, so the page always renders a fresh fetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use jfa_core::ProductId;
use jfa_core::cart::CartAction;
use jfa_core::checkout::CheckoutTotals;
use jfa_core::models::{Cart, CartItem};
use jfa_core::DeliveryMethod;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::routes::layout::{Layout, MessageQuery, Notice, local_path};
use crate::services::cart::{AddToCartError, add_product, adjust_line};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_subtotal: String,
    pub image_url: Option<String>,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i32(),
            name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_subtotal: item.line_subtotal.to_string(),
            image_url: item.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        // Shipping depends on the delivery method chosen at checkout
        let totals = CheckoutTotals::for_cart(cart, DeliveryMethod::StorePickup);
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            subtotal: totals.subtotal.to_string(),
        }
    }
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id_producto: ProductId,
    /// Page to come back to.
    pub volver: Option<String>,
}

/// Form data for the line buttons on the cart page.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub id_producto: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Display the cart page.
#[instrument(skip(state, current, query))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let cart = state.api(Some(&current)).get_cart(current.user.id).await?;
    let view = CartView::from(&cart);

    Ok(CartShowTemplate {
        layout: Layout {
            user_name: Some(current.user.first_name.clone()),
            cart_count: view.item_count,
        },
        cart: view,
        error: query.error(),
        success: query.success(),
    })
}

/// Cart badge count as plain text. Zero for anonymous visitors.
#[instrument(skip(state, user))]
pub async fn count(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> String {
    Layout::load(&state, user.as_ref()).await.cart_count.to_string()
}

/// Add one unit of a product from the catalog.
#[instrument(skip(state, user, form), fields(product_id = %form.id_producto))]
pub async fn add(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let back = local_path(form.volver.as_deref(), "/products");

    let Some(current) = user else {
        return Notice::LoginRequired.error_at(&back).into_response();
    };
    let api = state.api(Some(&current));

    let product = match api.get_product(form.id_producto).await {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load product for add to cart");
            return Notice::AddFailed.error_at(&back).into_response();
        }
    };

    match add_product(api, current.user.id, &product).await {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Added product to cart",
                &[("product_id", product.id.to_string())],
            );
            Notice::Added.success_at(&back).into_response()
        }
        Err(AddToCartError::OutOfStock) => Notice::OutOfStock.error_at(&back).into_response(),
        Err(e @ AddToCartError::Api(_)) => {
            tracing::warn!(error = ?e, "Failed to add product to cart");
            Notice::AddFailed.error_at(&back).into_response()
        }
    }
}

/// One more unit of a line.
#[instrument(skip(state, current, form), fields(product_id = %form.id_producto))]
pub async fn increase(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<LineForm>,
) -> Redirect {
    adjust(&state, &current, form.id_producto, CartAction::Increase).await
}

/// One unit fewer; a line of one is removed.
#[instrument(skip(state, current, form), fields(product_id = %form.id_producto))]
pub async fn decrease(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<LineForm>,
) -> Redirect {
    adjust(&state, &current, form.id_producto, CartAction::Decrease).await
}

/// Drop a line and return its units to stock.
#[instrument(skip(state, current, form), fields(product_id = %form.id_producto))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<LineForm>,
) -> Redirect {
    adjust(&state, &current, form.id_producto, CartAction::Remove).await
}

async fn adjust(
    state: &AppState,
    current: &crate::models::CurrentUser,
    product: ProductId,
    action: CartAction,
) -> Redirect {
    let api = state.api(Some(current));
    let user = current.user.id;

    let result = match api.get_cart(user).await {
        Ok(cart) => adjust_line(api, user, &cart, product, action).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => Redirect::to("/cart"),
        Err(e) => {
            tracing::warn!(error = ?e, ?action, "Cart adjustment failed");
            Notice::CartFailed.error_at("/cart")
        }
    }
}
