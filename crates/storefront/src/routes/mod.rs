//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Catalog view
//! GET  /health                        - Health check
//!
//! # Cart view
//! GET  /shop                          - Mount a new cart view
//! GET  /shop/{mount_id}               - Current state of a mounted view
//! POST /shop/{mount_id}/cart/add      - Add product (form: product_id)
//! POST /shop/{mount_id}/cart/remove   - Remove product (form: product_id)
//! POST /shop/{mount_id}/cart/toggle   - Show/hide the cart panel
//! ```

pub mod catalog;
pub mod shop;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the cart view routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/{mount_id}", get(shop::show))
        .route("/{mount_id}/cart/add", post(shop::add))
        .route("/{mount_id}/cart/remove", post(shop::remove))
        .route("/{mount_id}/cart/toggle", post(shop::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog view
        .route("/", get(catalog::index))
        // Cart view
        .nest("/shop", shop_routes())
}

/// Build the full application: routes, health check, static files and the
/// middleware stack (everything except the Sentry layers).
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the remote APIs.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::to_bytes,
        http::{StatusCode, header::LOCATION},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, DEFAULT_CATALOG_SOURCE, LogFormat, StorefrontConfig};

    // The default catalog source cannot be resolved and the shop URL points
    // at a closed port, so none of these tests leave the machine.
    fn test_state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            api: ApiConfig::new(DEFAULT_CATALOG_SOURCE, "http://127.0.0.1:9/api/v1").unwrap(),
            view_idle_timeout: Duration::from_secs(60),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state()).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_catalog_with_unresolvable_source_renders_error() {
        let response = app(test_state()).oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Error: Failed to fetch data from the API"));
        assert!(!html.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_shop_with_unreachable_api_renders_error() {
        let response = app(test_state()).oneshot(get_request("/shop")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Error: Failed to fetch data from the API"));
    }

    #[tokio::test]
    async fn test_unknown_mount_redirects_to_fresh_view() {
        let uri = format!("/shop/{}", crate::views::MountId::new());
        let response = app(test_state()).oneshot(get_request(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/shop");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app(test_state()).oneshot(get_request("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
