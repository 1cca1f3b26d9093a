//! Integration tests for TechStore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techstore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Shop state machine driven through the public core API
//! - `storefront_http` - Full router with sessions, forms and middleware
//!
//! The HTTP tests drive the router in-process with `tower::ServiceExt::oneshot`,
//! carrying the session cookie between requests like a browser would.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

use techstore_core::Catalog;
use techstore_storefront::{config::StorefrontConfig, state::AppState};

/// Build a storefront router over the built-in catalog.
///
/// Every call gets its own in-memory session store.
#[must_use]
pub fn test_app() -> Router {
    test_app_with(Catalog::builtin())
}

/// Build a storefront router over `catalog`.
#[must_use]
pub fn test_app_with(catalog: Catalog) -> Router {
    techstore_storefront::router(AppState::new(StorefrontConfig::default(), catalog))
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Redirect target of a 303 response.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }
}

/// One browser: sends requests to a shared app and keeps its session cookie.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A client with no session yet.
    #[must_use]
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// The session cookie pair (`name=value`) this client holds.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    /// `POST path` with a urlencoded form body such as `product_id=1`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, path: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// Send a prepared request, attaching and updating the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }
}
