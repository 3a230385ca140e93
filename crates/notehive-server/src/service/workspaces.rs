use std::collections::HashMap;

use notehive_api::{
    workspace_dto, AddMemberRequest, CreateWorkspaceRequest, DeleteWorkspaceResponse,
    UpdateWorkspaceRequest, WorkspaceListResponse, WorkspaceResponse,
};
use notehive_core::{time, Error, Result, UserId, WorkspaceId};
use notehive_model::{can_access, is_owner, normalize_email, User, Workspace};
use tracing::info;

use crate::AppState;

async fn load_workspace(state: &AppState, id: &str) -> Result<Workspace> {
    let id = WorkspaceId::new(id)?;
    state
        .store
        .workspace_by_id(&id)
        .await?
        .ok_or_else(|| Error::not_found("workspace", id.as_str()))
}

fn require_owner(workspace: &Workspace, caller: &UserId, action: &str) -> Result<()> {
    if !is_owner(workspace, caller) {
        return Err(Error::access_denied(format!(
            "only the workspace owner can {action}"
        )));
    }
    Ok(())
}

/// Owner + members resolved in one batch for the response summaries.
async fn member_users(state: &AppState, workspace: &Workspace) -> Result<HashMap<UserId, User>> {
    let mut ids = vec![workspace.owner.clone()];
    ids.extend(workspace.members.iter().cloned());
    state.store.users_by_ids(&ids).await
}

pub async fn list(state: &AppState, caller: &User) -> Result<WorkspaceListResponse> {
    let workspaces = state.store.workspaces_for_user(&caller.id).await?;
    let mut ids = Vec::new();
    for ws in &workspaces {
        ids.push(ws.owner.clone());
        ids.extend(ws.members.iter().cloned());
    }
    let users = state.store.users_by_ids(&ids).await?;
    Ok(WorkspaceListResponse {
        count: workspaces.len(),
        workspaces: workspaces.iter().map(|w| workspace_dto(w, &users)).collect(),
    })
}

pub async fn get(state: &AppState, caller: &User, id: &str) -> Result<WorkspaceResponse> {
    let workspace = load_workspace(state, id).await?;
    if !can_access(&workspace, &caller.id) {
        return Err(Error::access_denied("you do not have access to this workspace"));
    }
    let users = member_users(state, &workspace).await?;
    Ok(WorkspaceResponse {
        workspace: workspace_dto(&workspace, &users),
        message: None,
    })
}

pub async fn create(
    state: &AppState,
    caller: &User,
    req: CreateWorkspaceRequest,
) -> Result<WorkspaceResponse> {
    let workspace = Workspace::new(&req.title, req.description.as_deref(), caller.id.clone())?;
    state.store.insert_workspace(&workspace).await?;
    info!(workspace_id = %workspace.id, owner = %caller.id, "workspace created");
    let users = member_users(state, &workspace).await?;
    Ok(WorkspaceResponse {
        workspace: workspace_dto(&workspace, &users),
        message: None,
    })
}

pub async fn update(
    state: &AppState,
    caller: &User,
    id: &str,
    req: UpdateWorkspaceRequest,
) -> Result<WorkspaceResponse> {
    let mut workspace = load_workspace(state, id).await?;
    require_owner(&workspace, &caller.id, "update it")?;
    if let Some(title) = &req.title {
        workspace.set_title(title)?;
    }
    if let Some(description) = &req.description {
        workspace.set_description(description)?;
    }
    workspace.updated_at = time::unix_millis();
    state
        .store
        .update_workspace_fields(
            &workspace.id,
            &workspace.title,
            &workspace.description,
            workspace.updated_at,
        )
        .await?;
    let users = member_users(state, &workspace).await?;
    Ok(WorkspaceResponse {
        workspace: workspace_dto(&workspace, &users),
        message: None,
    })
}

pub async fn delete(state: &AppState, caller: &User, id: &str) -> Result<DeleteWorkspaceResponse> {
    let workspace = load_workspace(state, id).await?;
    require_owner(&workspace, &caller.id, "delete it")?;
    let deleted_pages = state.store.delete_workspace(&workspace.id).await?;
    info!(workspace_id = %workspace.id, deleted_pages, "workspace deleted");
    Ok(DeleteWorkspaceResponse {
        message: "workspace deleted".to_string(),
        deleted_pages,
    })
}

pub async fn add_member(
    state: &AppState,
    caller: &User,
    id: &str,
    req: AddMemberRequest,
) -> Result<WorkspaceResponse> {
    let mut workspace = load_workspace(state, id).await?;
    require_owner(&workspace, &caller.id, "manage members")?;

    let email = normalize_email(&req.email)?;
    let candidate = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| Error::not_found("user", email.clone()))?;
    if candidate.id == workspace.owner {
        return Err(Error::invalid_argument("the owner is already a member"));
    }
    if workspace.members.contains(&candidate.id) {
        return Err(Error::invalid_argument(
            "user is already a member of this workspace",
        ));
    }

    let now = time::unix_millis();
    state.store.add_member(&workspace.id, &candidate.id, now).await?;
    workspace.members.push(candidate.id.clone());
    workspace.updated_at = now;

    let users = member_users(state, &workspace).await?;
    Ok(WorkspaceResponse {
        workspace: workspace_dto(&workspace, &users),
        message: Some("member added".to_string()),
    })
}

pub async fn remove_member(
    state: &AppState,
    caller: &User,
    id: &str,
    member_id: &str,
) -> Result<WorkspaceResponse> {
    let mut workspace = load_workspace(state, id).await?;
    let member = UserId::new(member_id)?;
    if !is_owner(&workspace, &caller.id) && caller.id != member {
        return Err(Error::access_denied(
            "only the workspace owner or the member themself can remove a member",
        ));
    }
    if member == workspace.owner {
        return Err(Error::invalid_argument(
            "the workspace owner cannot be removed",
        ));
    }

    let now = time::unix_millis();
    state.store.remove_member(&workspace.id, &member, now).await?;
    workspace.members.retain(|m| m != &member);
    workspace.updated_at = now;

    let users = member_users(state, &workspace).await?;
    Ok(WorkspaceResponse {
        workspace: workspace_dto(&workspace, &users),
        message: Some("member removed".to_string()),
    })
}
