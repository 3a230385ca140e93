// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use notehive_api::{AddMemberRequest, CreateWorkspaceRequest, UpdateWorkspaceRequest};

use crate::auth::Caller;
use crate::http::response::{error_response, rejection_response};
use crate::middleware::RequestId;
use crate::{service, AppState};

pub async fn list_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
) -> Response {
    match service::workspaces::list(&state, &caller.user).await {
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
    match service::workspaces::get(&state, &caller.user, &id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateWorkspaceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::workspaces::create(&state, &caller.user, req).await {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn update_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWorkspaceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::workspaces::update(&state, &caller.user, &id, req).await {
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
    match service::workspaces::delete(&state, &caller.user, &id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn add_member_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejection_response(&rejection, &request_id.0),
    };
    match service::workspaces::add_member(&state, &caller.user, &id, req).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}

pub async fn remove_member_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    Path((id, member_id)): Path<(String, String)>,
) -> Response {
    match service::workspaces::remove_member(&state, &caller.user, &id, &member_id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(&err, &request_id.0),
    }
}
