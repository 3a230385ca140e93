// SPDX-License-Identifier: Apache-2.0

pub mod assist;
pub mod auth;
pub mod health;
pub mod pages;
pub mod response;
pub mod workspaces;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use notehive_api::{ApiError, ApiErrorCode};
use serde_json::json;

use crate::middleware::RequestId;

/// Router fallback: unknown routes answer with the standard envelope.
pub async fn not_found_handler(Extension(request_id): Extension<RequestId>) -> Response {
    response::api_error_response(
        StatusCode::NOT_FOUND,
        ApiError::new(
            ApiErrorCode::NotFound,
            "route not found",
            json!({}),
            request_id.0,
        ),
    )
}
