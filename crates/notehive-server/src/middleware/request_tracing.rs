// SPDX-License-Identifier: Apache-2.0

//! Per-request tracing: every request gets an id that shows up in the span,
//! the error envelope, and the `x-request-id` response header.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::HeaderValue;
use axum::http::{Extensions, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("req-{}", Uuid::new_v4()))
    }
}

/// Request id from the extensions, or a placeholder when the tracing layer
/// did not run (direct handler tests).
#[must_use]
pub fn request_id_of(extensions: &Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map_or_else(|| "req-unknown".to_string(), |id| id.0.clone())
}

pub async fn request_tracing_middleware(
    State(_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = RequestId::generate();
    let span = info_span!(
        "http.request",
        request_id = %request_id.0,
        method = %request.method(),
        path = %request.uri().path(),
    );

    request.extensions_mut().insert(request_id.clone());
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
