//! Handler assertions with non-local exit on failure
//!
//! Each function here checks a precondition inside request-handling code
//! and, when the check fails, abandons the handler by unwinding with an
//! [`HttpStatusError`] payload. The unwind must be caught by
//! [`RecoveryLayer`](crate::middleware::RecoveryLayer), which turns it into
//! the JSON error response for the request; handler code after a failed
//! assertion never runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use http_assert::prelude::*;
//!
//! async fn get_user(Path(id): Path<u64>) -> Response {
//!     let user = lookup_user(id).await;
//!     ensure_with_status(user.is_some(), StatusCode::NOT_FOUND, "user not found");
//!     respond::json(user)
//! }
//! ```

use http::StatusCode;
use std::panic::panic_any;

use crate::error::{ErrorLike, HttpStatusError};

/// Assert that `condition` holds, abandoning the request with status 500
/// otherwise.
///
/// # Panics
///
/// Unwinds with an [`HttpStatusError`] when `condition` is false. Does not
/// return to the caller on failure; run handlers under
/// [`RecoveryLayer`](crate::middleware::RecoveryLayer).
pub fn ensure(condition: bool, err: impl Into<ErrorLike>) {
    ensure_with_status(condition, StatusCode::INTERNAL_SERVER_ERROR, err);
}

/// Assert that `condition` holds, abandoning the request with the given
/// status otherwise.
///
/// # Panics
///
/// Unwinds with an [`HttpStatusError`] when `condition` is false. Does not
/// return to the caller on failure.
pub fn ensure_with_status(condition: bool, status: StatusCode, err: impl Into<ErrorLike>) {
    if !condition {
        abort(status, err);
    }
}

/// Assert that `result` is `Ok`, returning the success value and abandoning
/// the request with status 500 otherwise.
///
/// # Panics
///
/// Unwinds with an [`HttpStatusError`] wrapping the `Err` value. Does not
/// return to the caller on failure.
pub fn ensure_ok<T, E>(result: Result<T, E>) -> T
where
    E: std::error::Error + Send + Sync + 'static,
{
    ensure_ok_with_status(StatusCode::INTERNAL_SERVER_ERROR, result)
}

/// Assert that `result` is `Ok`, returning the success value and abandoning
/// the request with the given status otherwise.
///
/// # Panics
///
/// Unwinds with an [`HttpStatusError`] wrapping the `Err` value. Does not
/// return to the caller on failure.
pub fn ensure_ok_with_status<T, E>(status: StatusCode, result: Result<T, E>) -> T
where
    E: std::error::Error + Send + Sync + 'static,
{
    match result {
        Ok(value) => value,
        Err(err) => abort(status, ErrorLike::wrap(err)),
    }
}

/// Unconditionally abandon the request with the given status and error.
///
/// For failure paths that are not a boolean check, such as an unreachable
/// match arm or a lookup that has already been determined to have failed.
///
/// # Panics
///
/// Always. Unwinds with an [`HttpStatusError`]; never returns.
pub fn abort(status: StatusCode, err: impl Into<ErrorLike>) -> ! {
    let error = HttpStatusError::new(status, err);
    tracing::error!(
        status = status.as_u16(),
        error = %error.message(),
        "handler assertion failed"
    );
    panic_any(error)
}
