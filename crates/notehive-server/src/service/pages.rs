use std::collections::HashMap;

use notehive_api::{
    page_dto, page_tree_dto, CreatePageRequest, DeletePageResponse, PageListResponse,
    PageResponse, PageTreeResponse, ReorderPageRequest, UpdatePageRequest,
};
use notehive_core::{time, Error, PageId, Result, UserId, WorkspaceId};
use notehive_model::{build_tree, can_access, Page, User, Workspace};
use tracing::info;

use crate::AppState;

/// Resolution order fixed by the API contract: a missing workspace reports
/// NotFound, an inaccessible one AccessDenied, strictly before any mutation.
async fn accessible_workspace(
    state: &AppState,
    caller: &UserId,
    workspace_id: &WorkspaceId,
) -> Result<Workspace> {
    let workspace = state
        .store
        .workspace_by_id(workspace_id)
        .await?
        .ok_or_else(|| Error::not_found("workspace", workspace_id.as_str()))?;
    if !can_access(&workspace, caller) {
        return Err(Error::access_denied("you do not have access to this workspace"));
    }
    Ok(workspace)
}

async fn accessible_page(state: &AppState, caller: &UserId, id: &str) -> Result<(Page, Workspace)> {
    let id = PageId::new(id)?;
    let page = state
        .store
        .page_by_id(&id)
        .await?
        .ok_or_else(|| Error::not_found("page", id.as_str()))?;
    let workspace = accessible_workspace(state, caller, &page.workspace_id).await?;
    Ok((page, workspace))
}

/// Resolves `updatedBy` summaries for a batch of pages.
async fn updater_users(state: &AppState, pages: &[Page]) -> Result<HashMap<UserId, User>> {
    let ids: Vec<UserId> = pages.iter().map(|p| p.updated_by.clone()).collect();
    state.store.users_by_ids(&ids).await
}

/// Title lookup for the parent reference on a single-page response.
async fn parent_titles(state: &AppState, page: &Page) -> Result<HashMap<PageId, String>> {
    let mut titles = HashMap::new();
    if let Some(parent_id) = &page.parent_id {
        if let Some(parent) = state.store.page_by_id(parent_id).await? {
            titles.insert(parent.id.clone(), parent.title);
        }
    }
    Ok(titles)
}

/// Title lookup for a whole workspace listing, built from the pages already
/// loaded so sibling references resolve without further queries.
fn collection_titles(pages: &[Page]) -> HashMap<PageId, String> {
    pages
        .iter()
        .map(|p| (p.id.clone(), p.title.clone()))
        .collect()
}

/// Validates a proposed parent for `page`: must exist, share the workspace,
/// differ from the page, and not sit below it (no cycles).
async fn validated_parent(state: &AppState, page: &Page, raw: String) -> Result<PageId> {
    let parent_id = PageId::new(raw)?;
    if parent_id == page.id {
        return Err(Error::invalid_argument("a page cannot be its own parent"));
    }
    let parent = state
        .store
        .page_by_id(&parent_id)
        .await?
        .ok_or_else(|| Error::not_found("page", parent_id.as_str()))?;
    if parent.workspace_id != page.workspace_id {
        return Err(Error::invalid_argument(
            "parent page belongs to a different workspace",
        ));
    }
    if state.store.ancestor_chain_contains(&parent_id, &page.id).await? {
        return Err(Error::invalid_argument(
            "moving a page under its own descendant would create a cycle",
        ));
    }
    Ok(parent_id)
}

pub async fn list(state: &AppState, caller: &User, workspace_id: &str) -> Result<PageListResponse> {
    let workspace_id = WorkspaceId::new(workspace_id)?;
    let workspace = accessible_workspace(state, &caller.id, &workspace_id).await?;
    let pages = state.store.pages_for_workspace(&workspace_id).await?;
    let users = updater_users(state, &pages).await?;
    let titles = collection_titles(&pages);
    Ok(PageListResponse {
        count: pages.len(),
        pages: pages
            .iter()
            .map(|p| page_dto(p, &workspace, &titles, &users))
            .collect(),
    })
}

pub async fn tree(state: &AppState, caller: &User, workspace_id: &str) -> Result<PageTreeResponse> {
    let workspace_id = WorkspaceId::new(workspace_id)?;
    let workspace = accessible_workspace(state, &caller.id, &workspace_id).await?;
    let pages = state.store.pages_for_workspace(&workspace_id).await?;
    let users = updater_users(state, &pages).await?;
    let titles = collection_titles(&pages);
    let nodes = build_tree(&pages);
    Ok(PageTreeResponse {
        count: pages.len(),
        pages: nodes
            .iter()
            .map(|n| page_tree_dto(n, &workspace, &titles, &users))
            .collect(),
    })
}

pub async fn get(state: &AppState, caller: &User, id: &str) -> Result<PageResponse> {
    let (page, workspace) = accessible_page(state, &caller.id, id).await?;
    let users = updater_users(state, std::slice::from_ref(&page)).await?;
    let titles = parent_titles(state, &page).await?;
    Ok(PageResponse {
        page: page_dto(&page, &workspace, &titles, &users),
        message: None,
    })
}

pub async fn create(
    state: &AppState,
    caller: &User,
    req: CreatePageRequest,
) -> Result<PageResponse> {
    let workspace_id = WorkspaceId::new(req.workspace_id)?;
    let workspace = accessible_workspace(state, &caller.id, &workspace_id).await?;

    let parent_id = match req.parent_id {
        Some(raw) => {
            let parent_id = PageId::new(raw)?;
            let parent = state
                .store
                .page_by_id(&parent_id)
                .await?
                .ok_or_else(|| Error::not_found("page", parent_id.as_str()))?;
            if parent.workspace_id != workspace_id {
                return Err(Error::invalid_argument(
                    "parent page belongs to a different workspace",
                ));
            }
            Some(parent_id)
        }
        None => None,
    };

    let order = state
        .store
        .max_sibling_order(&workspace_id, parent_id.as_ref())
        .await?
        + 1;
    let page = Page::new(
        &req.title,
        req.content.as_deref(),
        workspace_id,
        parent_id,
        order,
        caller.id.clone(),
    )?;
    state.store.insert_page(&page).await?;
    info!(page_id = %page.id, workspace_id = %page.workspace_id, "page created");

    let users = updater_users(state, std::slice::from_ref(&page)).await?;
    let titles = parent_titles(state, &page).await?;
    Ok(PageResponse {
        page: page_dto(&page, &workspace, &titles, &users),
        message: None,
    })
}

pub async fn update(
    state: &AppState,
    caller: &User,
    id: &str,
    req: UpdatePageRequest,
) -> Result<PageResponse> {
    let (mut page, workspace) = accessible_page(state, &caller.id, id).await?;

    if let Some(parent_patch) = req.parent_id {
        page.parent_id = match parent_patch {
            Some(raw) => Some(validated_parent(state, &page, raw).await?),
            // Explicit null detaches the page to the workspace root.
            None => None,
        };
    }
    if let Some(title) = &req.title {
        page.set_title(title)?;
    }
    if let Some(content) = req.content {
        page.content = content;
    }
    if let Some(order) = req.order {
        page.order = order;
    }
    page.updated_by = caller.id.clone();
    page.updated_at = time::unix_millis();
    state.store.update_page(&page).await?;

    let users = updater_users(state, std::slice::from_ref(&page)).await?;
    let titles = parent_titles(state, &page).await?;
    Ok(PageResponse {
        page: page_dto(&page, &workspace, &titles, &users),
        message: None,
    })
}

pub async fn delete(state: &AppState, caller: &User, id: &str) -> Result<DeletePageResponse> {
    let (page, _) = accessible_page(state, &caller.id, id).await?;
    let deleted_count = state.store.delete_page_subtree(&page.id).await?;
    info!(page_id = %page.id, deleted_count, "page subtree deleted");
    Ok(DeletePageResponse {
        message: "page deleted".to_string(),
        deleted_count,
    })
}

pub async fn reorder(
    state: &AppState,
    caller: &User,
    id: &str,
    req: ReorderPageRequest,
) -> Result<PageResponse> {
    let (mut page, workspace) = accessible_page(state, &caller.id, id).await?;

    // Null and omitted both detach to root; only a concrete id re-parents.
    page.parent_id = match req.new_parent_id.flatten() {
        Some(raw) => Some(validated_parent(state, &page, raw).await?),
        None => None,
    };
    if let Some(index) = req.new_index {
        page.order = index;
    }
    page.updated_by = caller.id.clone();
    page.updated_at = time::unix_millis();
    state.store.update_page(&page).await?;

    let users = updater_users(state, std::slice::from_ref(&page)).await?;
    let titles = parent_titles(state, &page).await?;
    Ok(PageResponse {
        page: page_dto(&page, &workspace, &titles, &users),
        message: None,
    })
}
