// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "notehive-api";

mod convert;
mod dto;
mod error_mapping;
mod errors;
pub mod serde_helpers;

pub use convert::{page_dto, page_tree_dto, user_summary, workspace_dto};
pub use dto::{
    AddMemberRequest, AssistAnswerResponse, AssistQueryRequest, AssistRequest,
    AssistRewriteRequest, AssistRewriteResponse, AssistSuggestionsResponse,
    AssistSummaryResponse, AuthResponse, CreatePageRequest, CreateWorkspaceRequest,
    DeletePageResponse, DeleteWorkspaceResponse, HealthResponse, LoginRequest, PageDto,
    PageListResponse, PageRefDto, PageResponse, PageTreeDto, PageTreeResponse, RegisterRequest,
    ReorderPageRequest, UpdatePageRequest, UpdateWorkspaceRequest, UserDto, UserResponse,
    UserSummaryDto, WorkspaceDto, WorkspaceListResponse, WorkspaceRefDto, WorkspaceResponse,
    ASSIST_CONTENT_MAX_LEN,
};
pub use error_mapping::{map_error, status_for_code};
pub use errors::{ApiError, ApiErrorCode, ErrorBody};
