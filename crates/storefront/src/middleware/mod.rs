//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing, span carries the request ID)
//! 3. Request ID (add unique ID to each request)
//! 4. Session lock (one mutating request per session at a time)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Security headers (CSP, frame denial, etc.)

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_lock;

pub use request_id::{RequestId, make_request_span, request_id_middleware};
pub use security_headers::{content_security_policy, security_headers_middleware};
pub use session::create_session_layer;
pub use session_lock::{SessionLocks, session_lock_middleware};
