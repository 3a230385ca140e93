// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use notehive_api::{AssistQueryRequest, AssistRequest, AssistRewriteRequest};

use crate::http::response::{error_response, rejection_response};
use crate::middleware::RequestId;
use crate::{service, AppState};

pub async fn summarize_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AssistRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::assist::summarize(&state, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn rewrite_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AssistRewriteRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::assist::rewrite(&state, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn query_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AssistQueryRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::assist::query(&state, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn suggestions_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AssistRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::assist::suggestions(&state, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}
