//! Response Helpers
//!
//! JSON response construction and the error-to-status mapping used by every
//! gateway route.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::Error;

/// JSON response with the given status.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => {
            error!("Failed to encode response body: {}", e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Response encoding failed",
            )
        }
    }
}

/// Bodyless response with the given status.
pub fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// `{"error": ...}` response with the given status.
pub fn error_body(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&json!({ "error": message })).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

pub fn unauthorized() -> Response<Full<Bytes>> {
    error_body(StatusCode::UNAUTHORIZED, "Missing user-email header")
}

pub fn not_found(message: &str) -> Response<Full<Bytes>> {
    error_body(StatusCode::NOT_FOUND, message)
}

/// Temporary redirect to the given location.
pub fn redirect(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Map a domain error onto its response.
///
/// Pool exhaustion is the caller-visible form of total outage (503);
/// a failed node delete is an upstream failure the caller may retry (502).
pub fn from_error(err: &Error) -> Response<Full<Bytes>> {
    let status = match err {
        Error::NoHealthyNodes => StatusCode::SERVICE_UNAVAILABLE,
        Error::DeleteFailed { .. } => StatusCode::BAD_GATEWAY,
        Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
        Error::ConfigLoad(_) | Error::Upload { .. } | Error::Io(_) | Error::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_body(status, &err.to_string())
}
