//! Error types carried by failed assertions
//!
//! [`HttpStatusError`] pairs an HTTP status code with the underlying error
//! that caused a handler to abandon the request. [`ErrorLike`] is the closed
//! set of inputs accepted wherever a caller supplies failure details; its
//! normalization is total, so a malformed or missing input can never itself
//! fail a request.

use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Boxed error carried as the cause of an [`HttpStatusError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sentinel cause used when a caller supplies no usable error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing error details")]
pub struct MissingErrorDetails;

/// Error-like input accepted by the assertion and response APIs.
///
/// Construction is explicit rather than reflective: callers pick the variant
/// (or rely on the `From` impls for strings and boxed errors), and
/// [`normalize`](ErrorLike::normalize) turns any variant into a concrete
/// error value without ever failing.
#[derive(Debug)]
pub enum ErrorLike {
    /// A plain message, wrapped into a generic error.
    Text(String),
    /// An existing error value, used as-is.
    Wrapped(BoxError),
    /// No details supplied; normalizes to [`MissingErrorDetails`].
    Unspecified,
}

impl ErrorLike {
    /// Wrap a concrete error value.
    pub fn wrap<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Wrapped(Box::new(err))
    }

    /// Normalize into a concrete error. Total: every variant yields a
    /// non-null error, with [`ErrorLike::Unspecified`] falling back to the
    /// fixed sentinel message.
    pub fn normalize(self) -> BoxError {
        match self {
            Self::Text(msg) => msg.into(),
            Self::Wrapped(err) => err,
            Self::Unspecified => Box::new(MissingErrorDetails),
        }
    }
}

impl From<&str> for ErrorLike {
    fn from(msg: &str) -> Self {
        Self::Text(msg.to_string())
    }
}

impl From<String> for ErrorLike {
    fn from(msg: String) -> Self {
        Self::Text(msg)
    }
}

impl From<BoxError> for ErrorLike {
    fn from(err: BoxError) -> Self {
        Self::Wrapped(err)
    }
}

impl From<HttpStatusError> for ErrorLike {
    // An HttpStatusError used as error input contributes its underlying
    // cause, not a re-wrapped copy of itself.
    fn from(err: HttpStatusError) -> Self {
        Self::Wrapped(err.into_cause())
    }
}

/// An HTTP status code paired with the error that produced it.
///
/// Created by the assertion API at the moment a check fails, or directly by
/// handler code via [`HttpStatusError::new`]. Immutable once constructed;
/// consumed by the recovery middleware on the failure path of a single
/// request.
#[derive(Debug)]
pub struct HttpStatusError {
    status: StatusCode,
    cause: BoxError,
}

impl HttpStatusError {
    /// Create a new error with the given status and error-like input.
    ///
    /// The input is normalized exactly as everywhere else in the crate: a
    /// string becomes a generic error, an error value is used as-is, and
    /// [`ErrorLike::Unspecified`] falls back to the sentinel
    /// `"missing error details"`.
    pub fn new(status: StatusCode, err: impl Into<ErrorLike>) -> Self {
        Self {
            status,
            cause: err.into().normalize(),
        }
    }

    /// The HTTP status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.cause.to_string()
    }

    /// The underlying error that produced this one.
    #[must_use]
    pub fn cause(&self) -> &(dyn std::error::Error + 'static) {
        self.cause.as_ref()
    }

    /// Consume the error, returning its cause.
    #[must_use]
    pub fn into_cause(self) -> BoxError {
        self.cause
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl std::error::Error for HttpStatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}
