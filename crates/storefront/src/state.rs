//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderValue;
use techstore_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::middleware::{SessionLocks, content_security_policy};

/// Policy used if the catalog-derived one is not a valid header value.
const FALLBACK_CSP: &str = "default-src 'none'; style-src 'self'; img-src 'self'; \
                            form-action 'self'; base-uri 'self'; frame-ancestors 'none'";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor state lives in the
/// session; the only shared mutable data is the per-session request locks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    csp: HeaderValue,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog served by this instance
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let csp = HeaderValue::from_str(&content_security_policy(&catalog)).unwrap_or_else(|e| {
            tracing::warn!("Catalog image origins produce an invalid CSP header: {e}");
            HeaderValue::from_static(FALLBACK_CSP)
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                csp,
                session_locks: SessionLocks::default(),
            }),
        }
    }

    /// Create the application state, loading the catalog named by the
    /// configuration or falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog file cannot be read or is
    /// invalid.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::builtin(),
        };
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the `Content-Security-Policy` header for this catalog.
    #[must_use]
    pub fn content_security_policy(&self) -> &HeaderValue {
        &self.inner.csp
    }

    /// Get the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }
}
