//! JFA Distribuciones storefront library.
//!
//! The router lives here so that it can be exercised by tests without
//! binding a socket; `main.rs` only adds process setup.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full application router.
///
/// Sentry layers are added by the binary so tests do not need a client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the API.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app() -> Router {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_BASE_URL" => Some("http://localhost:8080".to_owned()),
            // Nothing listens here; these tests never reach the API
            "JFA_API_URL" => Some("http://127.0.0.1:9/api".to_owned()),
            _ => None,
        })
        .unwrap();
        app(AppState::new(config).unwrap())
    }

    async fn get(path: &str) -> axum::response::Response {
        test_app()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_login_page_renders_notice() {
        let response = get("/auth/login?error=credentials").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("content-security-policy"));
        let body = body_text(response).await;
        assert!(body.contains("Email o contraseña incorrectos"));
        assert!(body.contains("action=\"/auth/login\""));
    }

    #[tokio::test]
    async fn test_unknown_notice_codes_are_ignored() {
        let body = body_text(get("/auth/login?error=%3Cscript%3E").await).await;
        assert!(!body.contains("<script>"));
        assert!(!body.contains("notice-error"));
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_to_login() {
        for path in [
            "/cart",
            "/checkout",
            "/checkout/payment",
            "/checkout/confirmation",
            "/account/orders",
            "/account/settings",
        ] {
            let response = get(path).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "/auth/login",
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_cart_count_is_zero_when_logged_out() {
        let response = get("/cart/count").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "0");
    }

    #[tokio::test]
    async fn test_register_page_has_every_field() {
        let body = body_text(get("/auth/register").await).await;
        for name in ["nombre", "apellido", "dni", "email", "username", "confirmar_password", "codigo_postal"] {
            assert!(body.contains(&format!("name=\"{name}\"")), "{name}");
        }
    }
}
