// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use notehive_api::{LoginRequest, RegisterRequest};

use crate::auth::Caller;
use crate::http::response::{error_response, rejection_response};
use crate::middleware::RequestId;
use crate::{service, AppState};

pub async fn register_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::users::register(&state, req).await {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::users::login(&state, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn me_handler(Extension(caller): Extension<Caller>) -> Response {
    Json(service::users::current_user(&caller.user)).into_response()
}
