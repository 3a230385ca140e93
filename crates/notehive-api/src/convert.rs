// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use notehive_core::{PageId, UserId};
use notehive_model::{Page, PageNode, User, Workspace};

use crate::dto::{PageDto, PageRefDto, PageTreeDto, UserSummaryDto, WorkspaceDto, WorkspaceRefDto};

#[must_use]
pub fn user_summary(user: &User) -> UserSummaryDto {
    UserSummaryDto {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn resolve_summary(users: &HashMap<UserId, User>, id: &UserId) -> UserSummaryDto {
    users.get(id).map_or_else(
        // Referential integrity is enforced at write time; an unknown id
        // here still renders rather than failing the whole response.
        || UserSummaryDto {
            id: id.to_string(),
            name: String::new(),
            email: String::new(),
        },
        user_summary,
    )
}

#[must_use]
pub fn workspace_dto(workspace: &Workspace, users: &HashMap<UserId, User>) -> WorkspaceDto {
    WorkspaceDto {
        id: workspace.id.to_string(),
        title: workspace.title.clone(),
        description: workspace.description.clone(),
        owner: resolve_summary(users, &workspace.owner),
        members: workspace
            .members
            .iter()
            .map(|m| resolve_summary(users, m))
            .collect(),
        member_count: workspace.member_count(),
        created_at: workspace.created_at,
        updated_at: workspace.updated_at,
    }
}

/// Render a page with its relations resolved: the owning workspace and,
/// when set, the parent page appear as compact references. Parent titles
/// come from `parent_titles`; a missing entry renders with an empty title,
/// like an unknown updater.
#[must_use]
pub fn page_dto(
    page: &Page,
    workspace: &Workspace,
    parent_titles: &HashMap<PageId, String>,
    users: &HashMap<UserId, User>,
) -> PageDto {
    PageDto {
        id: page.id.to_string(),
        title: page.title.clone(),
        content: page.content.clone(),
        workspace: WorkspaceRefDto {
            id: page.workspace_id.to_string(),
            title: workspace.title.clone(),
        },
        parent: page.parent_id.as_ref().map(|pid| PageRefDto {
            id: pid.to_string(),
            title: parent_titles.get(pid).cloned().unwrap_or_default(),
        }),
        order: page.order,
        updated_by: resolve_summary(users, &page.updated_by),
        created_at: page.created_at,
        updated_at: page.updated_at,
    }
}

#[must_use]
pub fn page_tree_dto(
    node: &PageNode,
    workspace: &Workspace,
    parent_titles: &HashMap<PageId, String>,
    users: &HashMap<UserId, User>,
) -> PageTreeDto {
    // Preorder index pass, then a leaf-first fold. Explicit worklists keep
    // arbitrarily deep trees off the call stack.
    let mut order: Vec<(&PageNode, usize)> = Vec::new();
    let mut stack: Vec<(&PageNode, usize)> = vec![(node, 0)];
    while let Some((current, parent)) = stack.pop() {
        let index = order.len();
        order.push((current, parent));
        for child in current.children.iter().rev() {
            stack.push((child, index));
        }
    }

    let mut children_acc: Vec<Vec<PageTreeDto>> = order.iter().map(|_| Vec::new()).collect();
    for index in (1..order.len()).rev() {
        let (current, parent) = order[index];
        let mut children = std::mem::take(&mut children_acc[index]);
        // The reverse fold visits later siblings first; restore sort order.
        children.reverse();
        children_acc[parent].push(PageTreeDto {
            page: page_dto(&current.page, workspace, parent_titles, users),
            children,
        });
    }
    let mut children = std::mem::take(&mut children_acc[0]);
    children.reverse();
    PageTreeDto {
        page: page_dto(&node.page, workspace, parent_titles, users),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_dto_resolves_member_summaries() {
        let owner = User::new("Ada", "ada@example.com", "h").expect("user");
        let member = User::new("Brian", "brian@example.com", "h").expect("user");
        let mut ws =
            Workspace::new("Docs", Some("shared notes"), owner.id.clone()).expect("workspace");
        ws.members.push(member.id.clone());

        let mut users = HashMap::new();
        users.insert(owner.id.clone(), owner.clone());
        users.insert(member.id.clone(), member.clone());

        let dto = workspace_dto(&ws, &users);
        assert_eq!(dto.owner.name, "Ada");
        assert_eq!(dto.member_count, 2);
        assert_eq!(dto.members[1].email, "brian@example.com");
    }

    #[test]
    fn page_dto_resolves_workspace_and_parent_references() {
        let user = User::new("Ada", "ada@example.com", "h").expect("user");
        let ws = Workspace::new("Docs", None, user.id.clone()).expect("workspace");
        let parent = Page::new("parent", None, ws.id.clone(), None, 0, user.id.clone())
            .expect("parent page");
        let child = Page::new(
            "child",
            Some("body"),
            ws.id.clone(),
            Some(parent.id.clone()),
            3,
            user.id.clone(),
        )
        .expect("child page");

        let mut users = HashMap::new();
        users.insert(user.id.clone(), user);
        let mut titles = HashMap::new();
        titles.insert(parent.id.clone(), parent.title.clone());

        let dto = page_dto(&child, &ws, &titles, &users);
        assert_eq!(dto.workspace.title, "Docs");
        let parent_ref = dto.parent.expect("parent reference");
        assert_eq!(parent_ref.id, parent.id.as_str());
        assert_eq!(parent_ref.title, "parent");
        assert_eq!(dto.order, 3);
        assert_eq!(dto.updated_by.name, "Ada");
    }

    #[test]
    fn root_page_renders_without_a_parent_reference() {
        let user = User::new("Ada", "ada@example.com", "h").expect("user");
        let ws = Workspace::new("Docs", None, user.id.clone()).expect("workspace");
        let root = Page::new("root", None, ws.id.clone(), None, 0, user.id.clone())
            .expect("root page");

        let mut users = HashMap::new();
        users.insert(user.id.clone(), user);

        let dto = page_dto(&root, &ws, &HashMap::new(), &users);
        assert_eq!(dto.parent, None);
        assert_eq!(dto.workspace.id, ws.id.as_str());
    }

    #[test]
    fn deep_trees_convert_without_overflowing() {
        let user = User::new("Ada", "ada@example.com", "h").expect("user");
        let ws = Workspace::new("Docs", None, user.id.clone()).expect("workspace");

        let mut pages = Vec::new();
        let mut parent: Option<PageId> = None;
        for _ in 0..50_000 {
            let p = Page::new("n", None, ws.id.clone(), parent.clone(), 0, user.id.clone())
                .expect("page");
            parent = Some(p.id.clone());
            pages.push(p);
        }
        let depth = pages.len();
        let mut node = PageNode {
            page: pages.pop().expect("leaf"),
            children: Vec::new(),
        };
        while let Some(page) = pages.pop() {
            node = PageNode {
                page,
                children: vec![node],
            };
        }

        let mut users = HashMap::new();
        users.insert(user.id.clone(), user);
        let dto = page_tree_dto(&node, &ws, &HashMap::new(), &users);

        let mut seen = 0;
        let mut current = &dto;
        loop {
            seen += 1;
            match current.children.first() {
                Some(child) => current = child,
                None => break,
            }
        }
        assert_eq!(seen, depth);

        // Dismantle both chains with worklists so the drop glue stays flat.
        let mut dto_stack = vec![dto];
        while let Some(mut d) = dto_stack.pop() {
            dto_stack.append(&mut d.children);
        }
        let mut node_stack = vec![node];
        while let Some(mut n) = node_stack.pop() {
            node_stack.append(&mut n.children);
        }
    }
}
