//! Page-tree materializer: nested view of the flat, parent-pointer page
//! collection and its inverse.

use std::collections::{HashMap, HashSet};

use notehive_core::PageId;
use serde::{Deserialize, Serialize};

use crate::page::Page;

/// A page with its children attached, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    #[serde(flatten)]
    pub page: Page,
    pub children: Vec<PageNode>,
}

/// Nest a flat per-workspace collection into a tree.
///
/// Roots are pages with no parent, plus orphans whose parent is absent from
/// the collection (cross-workspace corruption renders rather than erroring).
/// Sibling order is ascending `order`, ties broken by `created_at`; the sort
/// is stable, so the result is deterministic for a given input order.
#[must_use]
pub fn build_tree(pages: &[Page]) -> Vec<PageNode> {
    let present: HashSet<&PageId> = pages.iter().map(|p| &p.id).collect();

    let mut sorted: Vec<Page> = pages.to_vec();
    sorted.sort_by_key(|p| (p.order, p.created_at));

    let mut ordered: Vec<Page> = Vec::new();
    let mut children_of: HashMap<PageId, Vec<Page>> = HashMap::new();
    for page in sorted {
        match page.parent_id.as_ref().filter(|pid| present.contains(pid)) {
            Some(parent) => children_of.entry(parent.clone()).or_default().push(page),
            None => ordered.push(page),
        }
    }
    let root_count = ordered.len();

    // Expand breadth-first, then fold leaf-first. Both passes are explicit
    // worklists, so tree depth never touches the call stack.
    let mut next = 0;
    while next < ordered.len() {
        let id = ordered[next].id.clone();
        if let Some(children) = children_of.remove(&id) {
            ordered.extend(children);
        }
        next += 1;
    }

    let mut built: HashMap<PageId, Vec<PageNode>> = HashMap::new();
    let mut roots: Vec<PageNode> = Vec::with_capacity(root_count);
    for page in ordered.into_iter().rev() {
        let mut children = built.remove(&page.id).unwrap_or_default();
        // The reverse fold visits later siblings first; restore sort order.
        children.reverse();
        let parent = page
            .parent_id
            .as_ref()
            .filter(|pid| present.contains(pid))
            .cloned();
        let node = PageNode { page, children };
        match parent {
            Some(parent) => built.entry(parent).or_default().push(node),
            None => roots.push(node),
        }
    }
    roots.reverse();
    roots
}

/// Inverse of [`build_tree`]: preorder walk back to the flat collection.
/// The `(id, parent_id)` pairing of the input pages is preserved exactly;
/// no page is duplicated or dropped.
#[must_use]
pub fn flatten(nodes: &[PageNode]) -> Vec<Page> {
    let mut out = Vec::new();
    let mut stack: Vec<&PageNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.page.clone());
        for child in node.children.iter().rev() {
            stack.push(child);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehive_core::{UserId, WorkspaceId};
    use std::collections::BTreeSet;

    fn page(
        ws: &WorkspaceId,
        user: &UserId,
        title: &str,
        parent: Option<&Page>,
        order: i64,
        created_at: i64,
    ) -> Page {
        let mut p = Page::new(
            title,
            None,
            ws.clone(),
            parent.map(|p| p.id.clone()),
            order,
            user.clone(),
        )
        .expect("valid page");
        p.created_at = created_at;
        p
    }

    fn pairs(pages: &[Page]) -> BTreeSet<(String, Option<String>)> {
        pages
            .iter()
            .map(|p| {
                (
                    p.id.to_string(),
                    p.parent_id.as_ref().map(ToString::to_string),
                )
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_parent_pairs() {
        let ws = WorkspaceId::generate();
        let user = UserId::generate();
        let root_a = page(&ws, &user, "A", None, 0, 1);
        let root_b = page(&ws, &user, "B", None, 1, 2);
        let child_a1 = page(&ws, &user, "A1", Some(&root_a), 0, 3);
        let child_a2 = page(&ws, &user, "A2", Some(&root_a), 1, 4);
        let grandchild = page(&ws, &user, "A1a", Some(&child_a1), 0, 5);
        let flat = vec![grandchild, child_a2, root_b, child_a1, root_a];

        let tree = build_tree(&flat);
        let flattened = flatten(&tree);

        assert_eq!(flattened.len(), flat.len());
        assert_eq!(pairs(&flattened), pairs(&flat));
    }

    #[test]
    fn siblings_sort_by_order_then_created_at() {
        let ws = WorkspaceId::generate();
        let user = UserId::generate();
        let third = page(&ws, &user, "third", None, 5, 10);
        let first = page(&ws, &user, "first", None, 0, 20);
        // Equal order: the earlier creation wins.
        let second_late = page(&ws, &user, "second-late", None, 3, 30);
        let second_early = page(&ws, &user, "second-early", None, 3, 25);

        let tree = build_tree(&[third, first, second_late, second_early]);
        let titles: Vec<&str> = tree.iter().map(|n| n.page.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second-early", "second-late", "third"]);
    }

    #[test]
    fn orphan_renders_as_root() {
        let ws = WorkspaceId::generate();
        let user = UserId::generate();
        let root = page(&ws, &user, "root", None, 0, 1);
        let missing_parent = page(&ws, &user, "elsewhere", None, 0, 2);
        let orphan = page(&ws, &user, "orphan", Some(&missing_parent), 1, 3);

        let tree = build_tree(&[root.clone(), orphan.clone()]);
        assert_eq!(tree.len(), 2);
        let flattened = flatten(&tree);
        // The orphan keeps its dangling parent pointer in the flat form.
        assert_eq!(
            pairs(&flattened),
            pairs(&[root, orphan]),
            "no page dropped or rewritten"
        );
    }

    #[test]
    fn empty_collection_builds_an_empty_tree() {
        assert!(build_tree(&[]).is_empty());
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn deep_parent_chains_build_without_overflowing() {
        let ws = WorkspaceId::generate();
        let user = UserId::generate();
        let mut pages = Vec::new();
        let mut parent: Option<Page> = None;
        for i in 0..50_000 {
            let p = page(&ws, &user, "n", parent.as_ref(), 0, i);
            pages.push(p.clone());
            parent = Some(p);
        }

        let tree = build_tree(&pages);
        assert_eq!(tree.len(), 1);
        assert_eq!(flatten(&tree).len(), pages.len());

        let mut depth = 0;
        let mut node = &tree[0];
        loop {
            depth += 1;
            match node.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
        assert_eq!(depth, pages.len());

        // Dismantle the chain with a worklist so the drop glue stays flat.
        let mut stack = tree;
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }

    #[test]
    fn children_serialize_nested() {
        let ws = WorkspaceId::generate();
        let user = UserId::generate();
        let root = page(&ws, &user, "root", None, 0, 1);
        let child = page(&ws, &user, "child", Some(&root), 0, 2);
        let tree = build_tree(&[root, child]);
        let json = serde_json::to_value(&tree).expect("serialize tree");
        assert_eq!(json[0]["children"][0]["title"], "child");
        assert!(json[0]["children"][0]["children"]
            .as_array()
            .expect("children array")
            .is_empty());
    }
}
