use notehive_core::{Error, Result, UserId, WorkspaceId};
use notehive_model::Workspace;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::{storage_err, Store};

struct WorkspaceRow {
    id: String,
    title: String,
    description: String,
    owner_id: String,
    created_at: i64,
    updated_at: i64,
}

fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<WorkspaceRow> {
    Ok(WorkspaceRow {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_members(conn: &Connection, workspace_id: &str) -> Result<Vec<UserId>> {
    let mut stmt = conn
        .prepare("SELECT user_id FROM workspace_members WHERE workspace_id = ?1 ORDER BY rowid")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map(params![workspace_id], |row| row.get::<_, String>(0))
        .map_err(storage_err)?;
    let mut members = Vec::new();
    for raw in rows {
        let raw = raw.map_err(storage_err)?;
        members.push(
            UserId::new(raw).map_err(|e| Error::storage(format!("corrupt member row: {e}")))?,
        );
    }
    Ok(members)
}

fn finish_workspace(conn: &Connection, raw: WorkspaceRow) -> Result<Workspace> {
    let members = load_members(conn, &raw.id)?;
    Ok(Workspace {
        id: WorkspaceId::new(raw.id)
            .map_err(|e| Error::storage(format!("corrupt workspace row: {e}")))?,
        title: raw.title,
        description: raw.description,
        owner: UserId::new(raw.owner_id)
            .map_err(|e| Error::storage(format!("corrupt workspace row: {e}")))?,
        members,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

const SELECT_WORKSPACE: &str =
    "SELECT id, title, description, owner_id, created_at, updated_at FROM workspaces";

impl Store {
    pub async fn insert_workspace(&self, workspace: &Workspace) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_err)?;
        tx.execute(
            "INSERT INTO workspaces (id, title, description, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                workspace.id.as_str(),
                workspace.title,
                workspace.description,
                workspace.owner.as_str(),
                workspace.created_at,
                workspace.updated_at,
            ],
        )
        .map_err(storage_err)?;
        for member in &workspace.members {
            tx.execute(
                "INSERT INTO workspace_members (workspace_id, user_id) VALUES (?1, ?2)",
                params![workspace.id.as_str(), member.as_str()],
            )
            .map_err(storage_err)?;
        }
        tx.commit().map_err(storage_err)
    }

    pub async fn workspace_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>> {
        let conn = self.conn.lock().await;
        let raw = conn
            .query_row(
                &format!("{SELECT_WORKSPACE} WHERE id = ?1"),
                params![id.as_str()],
                workspace_from_row,
            )
            .optional()
            .map_err(storage_err)?;
        raw.map(|r| finish_workspace(&conn, r)).transpose()
    }

    /// Workspaces where the user is owner or member, most recently updated
    /// first.
    pub async fn workspaces_for_user(&self, user_id: &UserId) -> Result<Vec<Workspace>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_WORKSPACE} WHERE owner_id = ?1
                    OR id IN (SELECT workspace_id FROM workspace_members WHERE user_id = ?1)
                 ORDER BY updated_at DESC, rowid DESC"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![user_id.as_str()], workspace_from_row)
            .map_err(storage_err)?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(finish_workspace(&conn, raw.map_err(storage_err)?)?);
        }
        Ok(out)
    }

    pub async fn update_workspace_fields(
        &self,
        id: &WorkspaceId,
        title: &str,
        description: &str,
        updated_at: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE workspaces SET title = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
                params![id.as_str(), title, description, updated_at],
            )
            .map_err(storage_err)?;
        if changed == 0 {
            return Err(Error::not_found("workspace", id.as_str()));
        }
        Ok(())
    }

    /// Removes the workspace, its membership rows, and every page it owns in
    /// one transaction. Returns the number of pages that went with it.
    pub async fn delete_workspace(&self, id: &WorkspaceId) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_err)?;
        let pages_removed = tx
            .execute(
                "DELETE FROM pages WHERE workspace_id = ?1",
                params![id.as_str()],
            )
            .map_err(storage_err)?;
        tx.execute(
            "DELETE FROM workspace_members WHERE workspace_id = ?1",
            params![id.as_str()],
        )
        .map_err(storage_err)?;
        let changed = tx
            .execute("DELETE FROM workspaces WHERE id = ?1", params![id.as_str()])
            .map_err(storage_err)?;
        if changed == 0 {
            return Err(Error::not_found("workspace", id.as_str()));
        }
        tx.commit().map_err(storage_err)?;
        Ok(pages_removed)
    }

    pub async fn add_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        now: i64,
    ) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_err)?;
        tx.execute(
            "INSERT INTO workspace_members (workspace_id, user_id) VALUES (?1, ?2)",
            params![workspace_id.as_str(), user_id.as_str()],
        )
        .map_err(storage_err)?;
        tx.execute(
            "UPDATE workspaces SET updated_at = ?2 WHERE id = ?1",
            params![workspace_id.as_str(), now],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)
    }

    pub async fn remove_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        now: i64,
    ) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_err)?;
        let removed = tx
            .execute(
                "DELETE FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
                params![workspace_id.as_str(), user_id.as_str()],
            )
            .map_err(storage_err)?;
        if removed == 0 {
            return Err(Error::not_found("member", user_id.as_str()));
        }
        tx.execute(
            "UPDATE workspaces SET updated_at = ?2 WHERE id = ?1",
            params![workspace_id.as_str(), now],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehive_core::time;
    use notehive_model::{Page, User};

    async fn seeded_store() -> (Store, User) {
        let store = Store::open_in_memory().expect("open store");
        let owner = User::new("Ada", "ada@example.com", "h").expect("user");
        store.insert_user(&owner).await.expect("insert user");
        (store, owner)
    }

    #[tokio::test]
    async fn insert_stores_owner_as_member() {
        let (store, owner) = seeded_store().await;
        let ws = Workspace::new("Docs", None, owner.id.clone()).expect("workspace");
        store.insert_workspace(&ws).await.expect("insert");

        let loaded = store
            .workspace_by_id(&ws.id)
            .await
            .expect("query")
            .expect("present");
        assert_eq!(loaded.members, vec![owner.id.clone()]);
        assert_eq!(loaded.owner, owner.id);
    }

    #[tokio::test]
    async fn listing_covers_owned_and_joined() {
        let (store, owner) = seeded_store().await;
        let friend = User::new("Brian", "brian@example.com", "h").expect("user");
        store.insert_user(&friend).await.expect("insert user");

        let mut owned = Workspace::new("Mine", None, owner.id.clone()).expect("workspace");
        owned.updated_at = 10;
        store.insert_workspace(&owned).await.expect("insert");

        let mut joined = Workspace::new("Theirs", None, friend.id.clone()).expect("workspace");
        joined.updated_at = 20;
        store.insert_workspace(&joined).await.expect("insert");
        store
            .add_member(&joined.id, &owner.id, 20)
            .await
            .expect("add member");

        let listed = store
            .workspaces_for_user(&owner.id)
            .await
            .expect("list");
        let titles: Vec<&str> = listed.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Theirs", "Mine"], "updated_at descending");
    }

    #[tokio::test]
    async fn stranger_sees_nothing() {
        let (store, owner) = seeded_store().await;
        let ws = Workspace::new("Docs", None, owner.id.clone()).expect("workspace");
        store.insert_workspace(&ws).await.expect("insert");

        let stranger = UserId::generate();
        assert!(store
            .workspaces_for_user(&stranger)
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_to_pages() {
        let (store, owner) = seeded_store().await;
        let ws = Workspace::new("Docs", None, owner.id.clone()).expect("workspace");
        store.insert_workspace(&ws).await.expect("insert");
        let page = Page::new("note", None, ws.id.clone(), None, 0, owner.id.clone())
            .expect("page");
        store.insert_page(&page).await.expect("insert page");

        let removed = store.delete_workspace(&ws.id).await.expect("delete");
        assert_eq!(removed, 1);
        assert!(store
            .workspace_by_id(&ws.id)
            .await
            .expect("query")
            .is_none());
        assert!(store.page_by_id(&page.id).await.expect("query").is_none());
    }

    #[tokio::test]
    async fn remove_member_requires_membership() {
        let (store, owner) = seeded_store().await;
        let ws = Workspace::new("Docs", None, owner.id.clone()).expect("workspace");
        store.insert_workspace(&ws).await.expect("insert");

        let outsider = UserId::generate();
        let err = store
            .remove_member(&ws.id, &outsider, time::unix_millis())
            .await
            .unwrap_err();
        assert_eq!(err.code(), notehive_core::ErrorCode::NotFound);
    }
}
