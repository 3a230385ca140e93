use std::collections::HashSet;

use notehive_core::{Error, PageId, Result, UserId, WorkspaceId};
use notehive_model::Page;
use rusqlite::{params, OptionalExtension, Row};

use crate::{storage_err, Store};

struct PageRow {
    id: String,
    title: String,
    content: String,
    workspace_id: String,
    parent_id: Option<String>,
    sort_order: i64,
    updated_by: String,
    created_at: i64,
    updated_at: i64,
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageRow> {
    Ok(PageRow {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        workspace_id: row.get("workspace_id")?,
        parent_id: row.get("parent_id")?,
        sort_order: row.get("sort_order")?,
        updated_by: row.get("updated_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn finish_page(raw: PageRow) -> Result<Page> {
    let corrupt = |e: Error| Error::storage(format!("corrupt page row: {e}"));
    Ok(Page {
        id: PageId::new(raw.id).map_err(corrupt)?,
        title: raw.title,
        content: raw.content,
        workspace_id: WorkspaceId::new(raw.workspace_id).map_err(corrupt)?,
        parent_id: raw
            .parent_id
            .map(PageId::new)
            .transpose()
            .map_err(corrupt)?,
        order: raw.sort_order,
        updated_by: UserId::new(raw.updated_by).map_err(corrupt)?,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

const SELECT_PAGE: &str = "SELECT id, title, content, workspace_id, parent_id, sort_order, \
                           updated_by, created_at, updated_at FROM pages";

impl Store {
    pub async fn insert_page(&self, page: &Page) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO pages (id, title, content, workspace_id, parent_id, sort_order,
                                updated_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                page.id.as_str(),
                page.title,
                page.content,
                page.workspace_id.as_str(),
                page.parent_id.as_ref().map(PageId::as_str),
                page.order,
                page.updated_by.as_str(),
                page.created_at,
                page.updated_at,
            ],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    pub async fn page_by_id(&self, id: &PageId) -> Result<Option<Page>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("{SELECT_PAGE} WHERE id = ?1"),
            params![id.as_str()],
            page_from_row,
        )
        .optional()
        .map_err(storage_err)?
        .map(finish_page)
        .transpose()
    }

    /// Flat workspace listing sorted by (order, createdAt); the rowid
    /// tiebreak keeps the result deterministic when both collide.
    pub async fn pages_for_workspace(&self, workspace_id: &WorkspaceId) -> Result<Vec<Page>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_PAGE} WHERE workspace_id = ?1
                 ORDER BY sort_order ASC, created_at ASC, rowid ASC"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![workspace_id.as_str()], page_from_row)
            .map_err(storage_err)?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(finish_page(raw.map_err(storage_err)?)?);
        }
        Ok(out)
    }

    /// Highest `order` among pages sharing `(workspace_id, parent_id)`, or
    /// -1 when the sibling group is empty. Read-then-write with the insert:
    /// concurrent creations may tie, which display ordering tolerates.
    pub async fn max_sibling_order(
        &self,
        workspace_id: &WorkspaceId,
        parent_id: Option<&PageId>,
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) FROM pages
             WHERE workspace_id = ?1 AND parent_id IS ?2",
            params![workspace_id.as_str(), parent_id.map(PageId::as_str)],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }

    pub async fn update_page(&self, page: &Page) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE pages SET title = ?2, content = ?3, parent_id = ?4, sort_order = ?5,
                                  updated_by = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    page.id.as_str(),
                    page.title,
                    page.content,
                    page.parent_id.as_ref().map(PageId::as_str),
                    page.order,
                    page.updated_by.as_str(),
                    page.updated_at,
                ],
            )
            .map_err(storage_err)?;
        if changed == 0 {
            return Err(Error::not_found("page", page.id.as_str()));
        }
        Ok(())
    }

    /// Deletes the page and every transitive descendant in one transaction.
    ///
    /// Descendants are collected with an explicit worklist of indexed child
    /// queries, so arbitrarily deep trees never recurse. Returns the number
    /// of pages removed (target included); the transaction guarantees
    /// all-or-nothing.
    pub async fn delete_page_subtree(&self, id: &PageId) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_err)?;

        let exists: Option<String> = tx
            .query_row(
                "SELECT id FROM pages WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        if exists.is_none() {
            return Err(Error::not_found("page", id.as_str()));
        }

        let mut to_delete: Vec<String> = vec![id.to_string()];
        let mut seen: HashSet<String> = to_delete.iter().cloned().collect();
        let mut frontier: Vec<String> = vec![id.to_string()];
        {
            let mut children_stmt = tx
                .prepare("SELECT id FROM pages WHERE parent_id = ?1")
                .map_err(storage_err)?;
            while let Some(current) = frontier.pop() {
                let rows = children_stmt
                    .query_map(params![current], |row| row.get::<_, String>(0))
                    .map_err(storage_err)?;
                for child in rows {
                    let child = child.map_err(storage_err)?;
                    // `seen` guards against corrupt cyclic rows.
                    if seen.insert(child.clone()) {
                        to_delete.push(child.clone());
                        frontier.push(child);
                    }
                }
            }
        }

        {
            let mut delete_stmt = tx
                .prepare("DELETE FROM pages WHERE id = ?1")
                .map_err(storage_err)?;
            for page_id in &to_delete {
                delete_stmt.execute(params![page_id]).map_err(storage_err)?;
            }
        }

        tx.commit().map_err(storage_err)?;
        Ok(to_delete.len())
    }

    /// True when `needle` appears on the ancestor chain starting at `start`
    /// (inclusive). Used to reject re-parenting that would create a cycle.
    pub async fn ancestor_chain_contains(&self, start: &PageId, needle: &PageId) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut current = Some(start.to_string());
        let mut visited: HashSet<String> = HashSet::new();
        while let Some(id) = current {
            if id == needle.as_str() {
                return Ok(true);
            }
            if !visited.insert(id.clone()) {
                // Existing corruption; treat as a cycle and refuse.
                return Ok(true);
            }
            current = conn
                .query_row(
                    "SELECT parent_id FROM pages WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
                .map_err(storage_err)?
                .flatten();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehive_core::ErrorCode;
    use notehive_model::{User, Workspace};

    async fn seeded() -> (Store, Workspace, UserId) {
        let store = Store::open_in_memory().expect("open store");
        let owner = User::new("Ada", "ada@example.com", "h").expect("user");
        store.insert_user(&owner).await.expect("insert user");
        let ws = Workspace::new("Docs", None, owner.id.clone()).expect("workspace");
        store.insert_workspace(&ws).await.expect("insert workspace");
        (store, ws, owner.id)
    }

    async fn make_page(
        store: &Store,
        ws: &Workspace,
        user: &UserId,
        title: &str,
        parent: Option<&Page>,
    ) -> Page {
        let order = store
            .max_sibling_order(&ws.id, parent.map(|p| &p.id))
            .await
            .expect("max order")
            + 1;
        let page = Page::new(
            title,
            None,
            ws.id.clone(),
            parent.map(|p| p.id.clone()),
            order,
            user.clone(),
        )
        .expect("page");
        store.insert_page(&page).await.expect("insert page");
        page
    }

    #[tokio::test]
    async fn sibling_order_appends_0_1_2() {
        let (store, ws, user) = seeded().await;
        let a = make_page(&store, &ws, &user, "a", None).await;
        let b = make_page(&store, &ws, &user, "b", None).await;
        let c = make_page(&store, &ws, &user, "c", None).await;
        assert_eq!((a.order, b.order, c.order), (0, 1, 2));

        // A separate parent starts its own sibling group at zero.
        let child = make_page(&store, &ws, &user, "child", Some(&a)).await;
        assert_eq!(child.order, 0);
    }

    #[tokio::test]
    async fn cascade_removes_exactly_the_subtree() {
        let (store, ws, user) = seeded().await;
        let a = make_page(&store, &ws, &user, "A", None).await;
        let b = make_page(&store, &ws, &user, "B", Some(&a)).await;
        let _c = make_page(&store, &ws, &user, "C", Some(&b)).await;
        let untouched = make_page(&store, &ws, &user, "other", None).await;

        let removed = store.delete_page_subtree(&a.id).await.expect("delete");
        assert_eq!(removed, 3, "A, B, C");

        let remaining = store
            .pages_for_workspace(&ws.id)
            .await
            .expect("list pages");
        let ids: Vec<&str> = remaining.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![untouched.id.as_str()]);
    }

    #[tokio::test]
    async fn deleting_a_leaf_removes_exactly_one() {
        let (store, ws, user) = seeded().await;
        let leaf = make_page(&store, &ws, &user, "leaf", None).await;
        let removed = store.delete_page_subtree(&leaf.id).await.expect("delete");
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_page_is_not_found() {
        let (store, _, _) = seeded().await;
        let err = store
            .delete_page_subtree(&PageId::generate())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn listing_sorts_by_order_then_created_at() {
        let (store, ws, user) = seeded().await;
        let mut late = Page::new("late", None, ws.id.clone(), None, 1, user.clone())
            .expect("page");
        late.created_at = 200;
        let mut early = Page::new("early", None, ws.id.clone(), None, 1, user.clone())
            .expect("page");
        early.created_at = 100;
        let mut first = Page::new("first", None, ws.id.clone(), None, 0, user.clone())
            .expect("page");
        first.created_at = 300;
        for p in [&late, &early, &first] {
            store.insert_page(p).await.expect("insert page");
        }

        let listed = store
            .pages_for_workspace(&ws.id)
            .await
            .expect("list pages");
        let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "early", "late"]);
    }

    #[tokio::test]
    async fn ancestor_chain_walks_to_the_root() {
        let (store, ws, user) = seeded().await;
        let a = make_page(&store, &ws, &user, "A", None).await;
        let b = make_page(&store, &ws, &user, "B", Some(&a)).await;
        let c = make_page(&store, &ws, &user, "C", Some(&b)).await;

        assert!(store
            .ancestor_chain_contains(&c.id, &a.id)
            .await
            .expect("walk"));
        assert!(!store
            .ancestor_chain_contains(&a.id, &c.id)
            .await
            .expect("walk"));
    }
}
