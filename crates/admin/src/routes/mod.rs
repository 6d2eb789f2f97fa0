//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Dashboard (requires auth)
//! GET  /health                    - Health check
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action (rate limited, admins only)
//! POST /auth/logout               - Logout action
//!
//! # Products (requires auth)
//! GET  /products                  - Product table (?buscar, ?pagina)
//! GET  /products/new              - Create form
//! POST /products                  - Create
//! GET  /products/{id}/edit        - Edit form
//! POST /products/{id}             - Update
//! POST /products/{id}/delete      - Delete
//!
//! # Users (requires auth)
//! GET  /users                     - User table
//! POST /users/{id}/delete         - Delete
//!
//! # Orders (requires auth)
//! GET  /orders                    - Order table
//! GET  /orders/{id}               - Order detail
//! POST /orders/{id}/status        - Change status
//! POST /orders/{id}/delete        - Delete
//!
//! # Payments and reports (requires auth)
//! GET  /payments                  - Payment table
//! GET  /reports                   - Report tables
//! GET  /reports/export.xlsx       - Spreadsheet export
//! GET  /reports/print             - Printable report
//! ```

pub mod auth;
pub mod dashboard;
pub mod layout;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reports;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).route_layer(login_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_page))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/delete", post(products::delete))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/delete", post(users::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/delete", post(orders::delete))
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::index))
        .route("/export.xlsx", get(reports::export_xlsx))
        .route("/print", get(reports::print))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/payments", get(payments::index))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/users", user_routes())
        .nest("/orders", order_routes())
        .nest("/reports", report_routes())
}
