//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Health check
//!
//! # Catalog
//! GET  /products                  - Catalog (?categoria, ?buscar, ?pagina)
//! GET  /products/{id}             - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                      - Cart page
//! GET  /cart/count                - Cart badge count (plain text)
//! POST /cart/add                  - Add one unit from the catalog
//! POST /cart/increase             - One more unit of a line
//! POST /cart/decrease             - One unit fewer (removes at 1)
//! POST /cart/remove               - Drop a line
//!
//! # Checkout (requires auth)
//! GET  /checkout                  - Shipping, delivery and payment choice
//! POST /checkout                  - Validate and continue to payment
//! POST /checkout/cancel           - Discard the pending checkout
//! GET  /checkout/payment          - Payment page for the chosen method
//! POST /checkout/payment          - Confirm the order
//! GET  /checkout/confirmation     - Purchase summary
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action (rate limited)
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action (rate limited)
//! POST /auth/logout               - Logout action
//!
//! # Account (requires auth)
//! GET  /account/orders            - Order history
//! GET  /account/settings          - Profile and password forms
//! POST /account/settings          - Update profile
//! POST /account/settings/password - Change password
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod layout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Only the form submissions are rate limited.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).route_layer(auth_rate_limiter())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).route_layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/cancel", post(checkout::cancel))
        .route("/payment", get(checkout::payment).post(checkout::pay))
        .route("/confirmation", get(checkout::confirmation))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route(
            "/settings",
            get(account::settings).post(account::update_profile),
        )
        .route("/settings/password", post(account::change_password))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}
