// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use notehive_api::{CreatePageRequest, ReorderPageRequest, UpdatePageRequest};

use crate::auth::Caller;
use crate::http::response::{error_response, rejection_response};
use crate::middleware::RequestId;
use crate::{service, AppState};

pub async fn list_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(workspace_id): Path<String>,
) -> Response {
    match service::pages::list(&state, &caller.user, &workspace_id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn tree_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(workspace_id): Path<String>,
) -> Response {
    match service::pages::tree(&state, &caller.user, &workspace_id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn get_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    match service::pages::get(&state, &caller.user, &id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreatePageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::pages::create(&state, &caller.user, req).await {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn update_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::pages::update(&state, &caller.user, &id, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    match service::pages::delete(&state, &caller.user, &id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn reorder_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<ReorderPageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::pages::reorder(&state, &caller.user, &id, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}
