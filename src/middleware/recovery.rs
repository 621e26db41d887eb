//! Recovery middleware for handler assertions
//!
//! [`RecoveryLayer`] wraps a handler and intercepts any unwind that escapes
//! it before the response is finalized. An unwind carrying an
//! [`HttpStatusError`] is classified by status: server errors (>= 500) get
//! the generic internal-error body with full detail going only to the log,
//! client errors (< 500) send the normalized message verbatim. Anything
//! else is logged and, by default, re-raised unmodified so the process's own
//! panic policy can decide.
//!
//! Each wrapped request carries a [`CancellationToken`] in its extensions;
//! the scope is released exactly once on every exit path, including a
//! re-raise.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use http_assert::middleware::RecoveryLayer;
//!
//! let app: Router = Router::new()
//!     .route("/users/{id}", get(get_user))
//!     .layer(RecoveryLayer::new());
//! ```

use axum::{body::Body, http::Request, response::Response};
use futures::FutureExt;
use std::any::Any;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

use crate::error::HttpStatusError;
use crate::respond;

/// What to do with an unwind that did not originate from the assertion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclassifiedPolicy {
    /// Log the panic and resume the unwind unmodified. An outer layer (or
    /// the runtime's panic policy) owns failures this middleware cannot
    /// classify. This is the default.
    #[default]
    Rethrow,
    /// Log the panic and respond with a generic 500 instead of re-raising.
    Absorb,
}

/// Layer that applies [`RecoveryService`] to an inner handler.
#[derive(Debug, Clone, Default)]
pub struct RecoveryLayer {
    policy: UnclassifiedPolicy,
}

impl RecoveryLayer {
    /// Create a recovery layer with the default [`UnclassifiedPolicy::Rethrow`]
    /// policy for panics the middleware cannot classify.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recovery layer that converts unclassified panics into a
    /// generic 500 response instead of re-raising them.
    #[must_use]
    pub fn absorb_unclassified() -> Self {
        Self {
            policy: UnclassifiedPolicy::Absorb,
        }
    }

    /// The policy in effect for unclassified panics.
    #[must_use]
    pub fn policy(&self) -> UnclassifiedPolicy {
        self.policy
    }
}

impl<S> tower::Layer<S> for RecoveryLayer {
    type Service = RecoveryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RecoveryService {
            inner,
            policy: self.policy,
        }
    }
}

/// Middleware service that catches handler unwinds and converts classified
/// ones into JSON error responses.
#[derive(Debug, Clone)]
pub struct RecoveryService<S> {
    inner: S,
    policy: UnclassifiedPolicy,
}

impl<S> tower::Service<Request<Body>> for RecoveryService<S>
where
    S: tower::Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let policy = self.policy;

        Box::pin(async move {
            // Per-request cancellation scope. The guard releases it exactly
            // once on every exit path: on return for success and classified
            // failures, during the unwind for a re-raise.
            let scope = CancellationToken::new();
            request.extensions_mut().insert(scope.child_token());
            let _guard = scope.drop_guard();

            // Both the synchronous part of the inner call and every poll of
            // its future run under catch_unwind, so an assertion at any
            // depth is intercepted here.
            let outcome = AssertUnwindSafe(async move { inner.call(request).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(result) => result,
                Err(payload) => Ok(classify(payload, policy)),
            }
        })
    }
}

/// Convert a caught unwind payload into a response, or resume the unwind if
/// the payload is not ours and the policy says to re-raise.
fn classify(payload: Box<dyn Any + Send>, policy: UnclassifiedPolicy) -> Response {
    match payload.downcast::<HttpStatusError>() {
        Ok(error) => {
            let status = error.status();
            if status.is_server_error() {
                respond::internal_error_with_status(status, &*error)
            } else {
                respond::error_with_status(status, *error)
            }
        }
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            tracing::error!(panic = %detail, "unexpected panic escaped a handler");
            match policy {
                UnclassifiedPolicy::Rethrow => resume_unwind(payload),
                UnclassifiedPolicy::Absorb => {
                    let error =
                        HttpStatusError::new(http::StatusCode::INTERNAL_SERVER_ERROR, detail);
                    respond::internal_error_with_status(error.status(), &error)
                }
            }
        }
    }
}

/// Best-effort description of a panic payload for logging.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    }
}
