//! Helpers for driving the full router in tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use tower::ServiceExt;
use url::Url;

use crate::catalog::load_catalog;
use crate::config::{CheckoutConfig, RelayConfig, StorefrontConfig};
use crate::state::AppState;

/// Configuration with rate limiting off and no processing delay.
pub(crate) fn config(relay: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        rate_limit: false,
        catalog_path: None,
        relay: RelayConfig {
            url: relay,
            timeout: Duration::from_secs(5),
        },
        checkout: CheckoutConfig {
            processing_delay: Duration::ZERO,
        },
        sentry_dsn: None,
    }
}

/// Start a relay endpoint answering every order with `status`.
///
/// Returns its URL and a counter of received orders.
pub(crate) async fn relay(status: StatusCode) -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().route(
        "/orders",
        axum::routing::post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                status
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/orders")).unwrap(), hits)
}

/// The storefront over the bundled catalog, relaying to an endpoint that
/// answers with `relay_status`.
pub(crate) async fn storefront(relay_status: StatusCode) -> (Router, Arc<AtomicUsize>) {
    let (url, hits) = relay(relay_status).await;
    let state = AppState::new(config(url), load_catalog(None).unwrap()).unwrap();
    (crate::app(state), hits)
}

/// A response with its body collected.
pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn bag_count(&self) -> Option<&str> {
        self.headers
            .get(crate::routes::BAG_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
    }
}

/// A browser session: keeps the session cookie between requests.
pub(crate) struct Visitor {
    app: Router,
    cookie: Option<String>,
}

impl Visitor {
    pub fn new(app: &Router) -> Self {
        Self {
            app: app.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Option<serde_json::Value>) -> TestResponse {
        self.send(Method::POST, uri, body).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
