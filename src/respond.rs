//! JSON response helpers with a consistent envelope
//!
//! Non-raw responses share the fixed `{ok, message}` envelope; `json` and
//! `json_with_status` send the caller's payload as-is. Error helpers
//! normalize their input exactly like [`HttpStatusError::new`], so a string,
//! an error value, or missing details all produce a well-formed body.
//!
//! Server-error detail never reaches the client: [`internal_error`] and
//! [`internal_error_with_status`] log the error and its cause chain at full
//! detail but respond with a generic message.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ErrorLike;

/// Body sent to the client for server-side failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// The fixed `{ok, message}` response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Optional human-readable message; omitted from the body when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Bare success envelope: `{"ok":true}`.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    /// Success envelope with a message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
        }
    }

    /// Failure envelope with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Serialize `payload` as the response body at the given status.
///
/// No envelope wrapping; the payload is sent as-is with
/// `Content-Type: application/json` and `X-Content-Type-Options: nosniff`.
pub fn json_with_status<T: Serialize>(status: StatusCode, payload: T) -> Response {
    let mut response = (status, Json(payload)).into_response();
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

/// Serialize `payload` as the response body with status 200 OK.
pub fn json<T: Serialize>(payload: T) -> Response {
    json_with_status(StatusCode::OK, payload)
}

/// Respond `{"ok":true}` with status 200 OK.
pub fn ok() -> Response {
    json_with_status(StatusCode::OK, Envelope::ok())
}

/// Respond `{"ok":true,"message":...}` at the given status.
pub fn message_with_status(status: StatusCode, text: impl Into<String>) -> Response {
    json_with_status(status, Envelope::success(text))
}

/// Respond `{"ok":true,"message":...}` with status 200 OK.
pub fn message(text: impl Into<String>) -> Response {
    message_with_status(StatusCode::OK, text)
}

/// Respond `{"ok":false,"message":...}` at the given status.
///
/// The normalized message is sent to the client verbatim, so this is the
/// client-error path: callers are trusted to put only safe text in it. Use
/// [`internal_error_with_status`] for failures whose detail must stay in
/// the logs.
pub fn error_with_status(status: StatusCode, err: impl Into<ErrorLike>) -> Response {
    let error = err.into().normalize();
    tracing::error!(status = status.as_u16(), error = %error, "request failed");
    (status, Json(Envelope::failure(error.to_string()))).into_response()
}

/// Respond `{"ok":false,"message":...}` with status 500.
pub fn error(err: impl Into<ErrorLike>) -> Response {
    error_with_status(StatusCode::INTERNAL_SERVER_ERROR, err)
}

/// Respond with the generic internal-error envelope at the given status.
///
/// The error and its cause chain are logged at full detail; the client only
/// ever sees `{"ok":false,"message":"internal server error"}`.
pub fn internal_error_with_status(
    status: StatusCode,
    err: &(dyn std::error::Error + 'static),
) -> Response {
    match err.source() {
        Some(cause) => {
            tracing::error!(status = status.as_u16(), error = %err, cause = %cause, "internal error");
        }
        None => {
            tracing::error!(status = status.as_u16(), error = %err, "internal error");
        }
    }
    (status, Json(Envelope::failure(INTERNAL_ERROR_MESSAGE))).into_response()
}

/// Respond with the generic internal-error envelope at status 500.
pub fn internal_error(err: &(dyn std::error::Error + 'static)) -> Response {
    internal_error_with_status(StatusCode::INTERNAL_SERVER_ERROR, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpStatusError;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("valid json body")
    }

    #[tokio::test]
    async fn test_ok_envelope() {
        let response = ok();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(response).await, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_json_with_status_sets_nosniff() {
        let response = json_with_status(StatusCode::CREATED, json!({"id": 7}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response
                .headers()
                .get(header::X_CONTENT_TYPE_OPTIONS)
                .unwrap(),
            "nosniff"
        );
        assert_eq!(body_json(response).await, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_json_defaults_to_200_without_envelope() {
        let response = json(json!(["a", "b"]));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_message_envelope() {
        let response = message("done");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"ok": true, "message": "done"})
        );
    }

    #[tokio::test]
    async fn test_message_with_status() {
        let response = message_with_status(StatusCode::CREATED, "created");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"ok": true, "message": "created"})
        );
    }

    #[tokio::test]
    async fn test_error_with_status_sends_message_verbatim() {
        let response = error_with_status(StatusCode::NOT_FOUND, "user not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "message": "user not found"})
        );
    }

    #[tokio::test]
    async fn test_error_defaults_to_500() {
        let response = error("boom");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "message": "boom"})
        );
    }

    #[tokio::test]
    async fn test_error_normalizes_unspecified_input() {
        let response = error(ErrorLike::Unspecified);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "message": "missing error details"})
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = HttpStatusError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "db password rejected for user admin",
        );
        let response = internal_error(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({"ok": false, "message": "internal server error"}));
    }

    #[tokio::test]
    async fn test_internal_error_with_status_keeps_status() {
        let err = HttpStatusError::new(StatusCode::BAD_GATEWAY, "upstream hung up");
        let response = internal_error_with_status(StatusCode::BAD_GATEWAY, &err);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "message": "internal server error"})
        );
    }
}
