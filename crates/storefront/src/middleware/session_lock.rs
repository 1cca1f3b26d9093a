//! Per-session serialization of mutating requests.
//!
//! The session layer reads a visitor's record from the store on first access
//! and writes it back after the response. Two posts carrying the same session
//! cookie would both start from the same record, and the later write would
//! drop the earlier one's action. This middleware sits outside the session
//! layer and admits one mutating request per session cookie at a time, so the
//! load, the action and the write-back happen under a single lock.
//!
//! Requests without a session cookie belong to distinct new sessions and are
//! not serialized.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header::COOKIE},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Async locks keyed by session cookie value.
///
/// Entries are dropped once no request holds or waits on them.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    /// Run `fut` while holding the lock for `key`.
    pub async fn serialize<F: Future>(&self, key: String, fut: F) -> F::Output {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        let output = {
            let _guard = lock.lock().await;
            fut.await
        };

        let mut locks = self.locks.lock().await;
        // The map and this call hold the only references: nobody is waiting.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&key);
        }
        output
    }

    /// Whether no session has a request in flight.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Serialize non-GET requests that share a session cookie.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    match session_cookie(request.headers()) {
        Some(session_id) => {
            state
                .session_locks()
                .serialize(session_id, next.run(request))
                .await
        }
        None => next.run(request).await,
    }
}
