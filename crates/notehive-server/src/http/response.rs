// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notehive_api::{map_error, ApiError, ErrorBody};
use notehive_core::Error;
use serde_json::json;
use tracing::warn;

pub fn api_error_response(status: StatusCode, error: ApiError) -> Response {
    (status, Json(ErrorBody::from(error))).into_response()
}

/// Domain error into the wire envelope, with the request id stamped in.
pub fn error_response(error: &Error, request_id: &str) -> Response {
    let (status, api) = map_error(error, request_id);
    if status >= 500 {
        warn!(request_id = %request_id, error = %error, "request failed");
    }
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    api_error_response(status, api)
}

/// Body extraction failures keep the same envelope as domain errors: 413 for
/// oversized payloads, 400 for everything else.
pub fn rejection_response(rejection: &JsonRejection, request_id: &str) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return api_error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::new(
                notehive_api::ApiErrorCode::PayloadTooLarge,
                "request body is too large",
                json!({}),
                request_id,
            ),
        );
    }
    // Parse and type failures alike report as 400, not axum's default 422.
    api_error_response(
        StatusCode::BAD_REQUEST,
        ApiError::validation(rejection.body_text()).with_request_id(request_id),
    )
}
