//! # http-assert
//!
//! Assertions for axum request handlers, with a recovery middleware that
//! turns a failed assertion anywhere in the call stack into a JSON error
//! response, and response helpers emitting a consistent `{ok, message}`
//! envelope.
//!
//! A handler written against this crate reads as straight-line success
//! logic: each precondition is a single [`ensure`](assert::ensure) call, and
//! the first failing check abandons the handler. The
//! [`RecoveryLayer`](middleware::RecoveryLayer) wrapping the router catches
//! the abandonment and writes exactly one response with the right status
//! code. Server-error detail (status >= 500) goes to the log only; client
//! errors (< 500) send their message verbatim.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{extract::Path, response::Response, routing::get, Router};
//! use http_assert::prelude::*;
//!
//! async fn get_user(Path(id): Path<u64>) -> Response {
//!     ensure_with_status(id != 0, StatusCode::BAD_REQUEST, "id must be positive");
//!     let user = serde_json::json!({ "id": id, "name": "Alice" });
//!     respond::json(user)
//! }
//!
//! let app: Router = Router::new()
//!     .route("/users/{id}", get(get_user))
//!     .layer(RecoveryLayer::new());
//! ```
//!
//! Panics that did not come from the assertion API are logged and re-raised
//! unmodified by default; see
//! [`UnclassifiedPolicy`](middleware::UnclassifiedPolicy) to convert them
//! into a generic 500 instead.
//!
//! This crate requires `panic = "unwind"` (the default); with
//! `panic = "abort"` a failed assertion terminates the process instead of
//! producing a response.

pub mod assert;
pub mod error;
pub mod middleware;
pub mod respond;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assert::{abort, ensure, ensure_ok, ensure_ok_with_status, ensure_with_status};
    pub use crate::error::{BoxError, ErrorLike, HttpStatusError, MissingErrorDetails};
    pub use crate::middleware::{RecoveryLayer, RecoveryService, UnclassifiedPolicy};
    pub use crate::respond::{self, Envelope};

    pub use http::StatusCode;
}
