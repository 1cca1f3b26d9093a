//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! The storefront serves no scripts and posts only to itself, so the policy is
//! locked down except for the image hosts the catalog points at.

use std::collections::BTreeSet;

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use techstore_core::Catalog;
use url::Url;

use crate::state::AppState;

/// Build the CSP for a catalog.
///
/// `img-src` allows `'self'` plus the origin of every product image:
/// ```text
/// default-src 'none';
/// script-src 'none';
/// style-src 'self';
/// img-src 'self' https://images.unsplash.com;
/// form-action 'self';
/// base-uri 'self';
/// frame-ancestors 'none'
/// ```
#[must_use]
pub fn content_security_policy(catalog: &Catalog) -> String {
    let image_origins: BTreeSet<String> = catalog
        .products()
        .iter()
        .filter_map(|product| Url::parse(&product.image).ok())
        .filter(|url| matches!(url.scheme(), "https" | "http"))
        .map(|url| url.origin().ascii_serialization())
        .collect();

    let mut img_src = String::from("'self'");
    for origin in &image_origins {
        img_src.push(' ');
        img_src.push_str(origin);
    }

    format!(
        "default-src 'none'; \
         script-src 'none'; \
         style-src 'self'; \
         img-src {img_src}; \
         form-action 'self'; \
         base-uri 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - See [`content_security_policy`]
/// - `Cache-Control: no-store` - Cart contents are per visitor
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CONTENT_SECURITY_POLICY, state.content_security_policy().clone());
    headers.insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store, max-age=0"),
    );

    response
}
