//! Correlation ids.
//!
//! Each request runs inside a `request` span tagged with its id. The id comes
//! from the proxy's `x-request-id` when that value is a plausible token,
//! otherwise a fresh UUID v4. It is also set as a Sentry tag, stored in the
//! request extensions as [`RequestId`] and returned on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id we pass through.
const MAX_UPSTREAM_LEN: usize = 64;

/// The id assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// The proxy's id, if it is a short `[A-Za-z0-9._-]` token.
fn upstream_id(request: &Request) -> Option<String> {
    let id = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let plausible = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    plausible.then(|| id.to_owned())
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));
    request.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Extension, Router, body::Body, http, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(RequestId(id)): Extension<RequestId>| async move { id }),
            )
            .layer(from_fn(request_id_middleware))
    }

    async fn send(incoming: Option<&str>) -> (String, String) {
        let mut builder = http::Request::builder().uri("/");
        if let Some(id) = incoming {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_upstream_id_is_kept() {
        let (header, seen_by_handler) = send(Some("edge-7f3a.01_b")).await;
        assert_eq!(header, "edge-7f3a.01_b");
        assert_eq!(seen_by_handler, header);
    }

    #[tokio::test]
    async fn test_missing_id_gets_uuid() {
        let (header, seen_by_handler) = send(None).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(seen_by_handler, header);
    }

    #[tokio::test]
    async fn test_implausible_upstream_ids_are_replaced() {
        let long = "a".repeat(MAX_UPSTREAM_LEN + 1);
        for incoming in ["", "two words", "id;drop", long.as_str()] {
            let (header, _) = send(Some(incoming)).await;
            assert!(Uuid::parse_str(&header).is_ok(), "{incoming:?}");
        }
    }
}
