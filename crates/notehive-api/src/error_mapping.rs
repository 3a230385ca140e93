// SPDX-License-Identifier: Apache-2.0

use notehive_core::{Error, ErrorCode};
use serde_json::json;

use crate::errors::{ApiError, ApiErrorCode};

#[must_use]
pub const fn status_for_code(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::AuthenticationRequired => 401,
        ApiErrorCode::AccessDenied => 403,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::Conflict => 409,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::AssistUnavailable => 503,
        ApiErrorCode::Internal => 500,
    }
}

/// Domain error → HTTP status + wire payload. Storage failures are masked
/// with a generic message; everything else surfaces its own text.
#[must_use]
pub fn map_error(error: &Error, request_id: &str) -> (u16, ApiError) {
    let (code, message) = match error.code() {
        ErrorCode::NotFound => (ApiErrorCode::NotFound, error.to_string()),
        ErrorCode::AccessDenied => (ApiErrorCode::AccessDenied, error.to_string()),
        ErrorCode::InvalidArgument => (ApiErrorCode::ValidationFailed, error.to_string()),
        ErrorCode::Unauthenticated => (ApiErrorCode::AuthenticationRequired, error.to_string()),
        ErrorCode::Conflict => (ApiErrorCode::Conflict, error.to_string()),
        ErrorCode::Unavailable => (ApiErrorCode::AssistUnavailable, error.to_string()),
        ErrorCode::Storage => (ApiErrorCode::Internal, "internal server error".to_string()),
        // `ErrorCode` is `#[non_exhaustive]`; all current variants are
        // handled above, so this arm only fires for future additions.
        _ => (ApiErrorCode::Internal, "internal server error".to_string()),
    };
    (
        status_for_code(code),
        ApiError::new(code, message, json!({}), request_id),
    )
}
