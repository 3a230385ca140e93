// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notehive_api::HealthResponse;
use tracing::warn;

use crate::AppState;

pub async fn healthz_handler(State(state): State<AppState>) -> Response {
    match state.store.probe().await {
        Ok(()) => Json(HealthResponse {
            status: "OK".to_string(),
            database: "connected".to_string(),
        })
        .into_response(),
        Err(err) => {
            warn!(error = %err, "health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    database: "unreachable".to_string(),
                }),
            )
                .into_response()
        }
    }
}
