//! Integration tests for Shopview.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopview-integration-tests
//! ```
//!
//! Every test starts its own [`TestContext`]: a fake shop API and the
//! storefront, both bound to ephemeral localhost ports. The fake upstream
//! serves
//!
//! - `GET /catalog.json` - catalog source for the `/` view
//! - `GET /api/v1/products` - product list for the `/shop` view
//! - `POST /api/v1/cart` - cart write (`{"productId": id}`)
//! - `DELETE /api/v1/cart/{id}` - cart delete
//!
//! and can be told to fail reads or writes with a 500.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use shopview_storefront::config::{ApiConfig, LogFormat, StorefrontConfig};
use shopview_storefront::routes;
use shopview_storefront::state::AppState;
use tokio::net::TcpListener;

/// Recorded state of the fake shop API.
#[derive(Debug, Default)]
pub struct Upstream {
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: Mutex<Vec<String>>,
}

impl Upstream {
    /// Make product and catalog reads answer 500.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make cart writes answer 500.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Cart writes received so far, as `POST {id}` / `DELETE {id}`.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the log.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("write log poisoned").clone()
    }

    fn record(&self, entry: String) {
        self.writes.lock().expect("write log poisoned").push(entry);
    }
}

type Shared = Arc<Upstream>;

async fn catalog(State(upstream): State<Shared>) -> Response {
    if upstream.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "products": [
            { "id": 1, "name": "Shirt", "price": 20, "description": "d" },
            { "id": 2, "name": "Mug", "title": "Stoneware mug", "price": 12, "description": null },
        ]
    }))
    .into_response()
}

async fn products(State(upstream): State<Shared>) -> Response {
    if upstream.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([
        { "id": 1, "title": "Shirt", "price": 20, "description": "d" },
        { "id": 2, "title": "Mug", "name": "mug-02", "price": 12, "description": null },
        { "id": 18_446_744_073_709_551_615_u64, "title": "Poster", "price": 8 },
    ]))
    .into_response()
}

async fn add_to_cart(State(upstream): State<Shared>, Json(body): Json<Value>) -> Response {
    if upstream.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    upstream.record(format!("POST {}", body["productId"]));
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn remove_from_cart(State(upstream): State<Shared>, Path(id): Path<String>) -> Response {
    if upstream.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    upstream.record(format!("DELETE {id}"));
    StatusCode::OK.into_response()
}

fn upstream_router(upstream: Shared) -> Router {
    Router::new()
        .route("/catalog.json", get(catalog))
        .route("/api/v1/products", get(products))
        .route("/api/v1/cart", post(add_to_cart))
        .route("/api/v1/cart/{id}", delete(remove_from_cart))
        .with_state(upstream)
}

/// Bind `app` to an ephemeral localhost port and serve it in the background.
async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A running storefront wired to a fake shop API.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub upstream: Shared,
}

impl TestContext {
    /// Start the fake upstream and a storefront reading from it.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    pub async fn start() -> Self {
        Self::start_with(|upstream| format!("http://{upstream}/catalog.json")).await
    }

    /// Start with a custom catalog source, built from the upstream address.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    pub async fn start_with(catalog_source: impl FnOnce(SocketAddr) -> String) -> Self {
        let upstream = Shared::default();
        let upstream_addr = serve(upstream_router(Arc::clone(&upstream))).await;

        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            api: ApiConfig::new(
                catalog_source(upstream_addr),
                &format!("http://{upstream_addr}/api/v1"),
            )
            .expect("Invalid test API config"),
            view_idle_timeout: Duration::from_secs(60),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build storefront state");
        let addr = serve(routes::app(state)).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            upstream,
        }
    }

    /// GET a storefront path and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// POST a form to a storefront path and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// Mount a cart view and return its id and the first page.
    ///
    /// # Panics
    ///
    /// Panics if the page carries no mount id.
    pub async fn mount_shop(&self) -> (String, String) {
        let (status, body) = self.get("/shop").await;
        assert_eq!(status, reqwest::StatusCode::OK);
        let mount_id = mount_id_from(&body).expect("page has no mount id");
        (mount_id, body)
    }
}

/// Pull the mount id out of the first `/shop/{mount_id}/...` form action.
#[must_use]
pub fn mount_id_from(html: &str) -> Option<String> {
    let (_, rest) = html.split_once("action=\"/shop/")?;
    let (id, _) = rest.split_once('/')?;
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_id_from_form_action() {
        let html = r#"<form method="post" action="/shop/abc-123/cart/toggle">"#;
        assert_eq!(mount_id_from(html).as_deref(), Some("abc-123"));
        assert_eq!(mount_id_from("<p>Error</p>"), None);
    }
}
