use std::collections::HashMap;

use notehive_core::{Error, Result, UserId};
use notehive_model::User;
use rusqlite::{params, OptionalExtension, Row};

use crate::{storage_err, Store};

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: i64,
    updated_at: i64,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn finish_user(raw: UserRow) -> Result<User> {
    Ok(User {
        id: UserId::new(raw.id).map_err(|e| Error::storage(format!("corrupt user row: {e}")))?,
        name: raw.name,
        email: raw.email,
        password_hash: raw.password_hash,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

const SELECT_USER: &str =
    "SELECT id, name, email, password_hash, created_at, updated_at FROM users";

impl Store {
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.as_str(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at,
                user.updated_at,
            ],
        )
        .map_err(|err| match storage_err(err) {
            Error::Conflict { .. } => Error::conflict("a user with this email already exists"),
            other => other,
        })?;
        Ok(())
    }

    pub async fn user_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("{SELECT_USER} WHERE id = ?1"),
            params![id.as_str()],
            user_from_row,
        )
        .optional()
        .map_err(storage_err)?
        .map(finish_user)
        .transpose()
    }

    /// Lookup by normalized (lowercased) email.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("{SELECT_USER} WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(storage_err)?
        .map(finish_user)
        .transpose()
    }

    /// Batch lookup used to resolve owner/member/updater summaries.
    pub async fn users_by_ids(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>> {
        let conn = self.conn.lock().await;
        let mut out = HashMap::with_capacity(ids.len());
        let mut stmt = conn
            .prepare(&format!("{SELECT_USER} WHERE id = ?1"))
            .map_err(storage_err)?;
        for id in ids {
            if out.contains_key(id) {
                continue;
            }
            let row = stmt
                .query_row(params![id.as_str()], user_from_row)
                .optional()
                .map_err(storage_err)?;
            if let Some(raw) = row {
                out.insert(id.clone(), finish_user(raw)?);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehive_core::ErrorCode;

    #[tokio::test]
    async fn insert_and_fetch_round_trip() {
        let store = Store::open_in_memory().expect("open store");
        let user = User::new("Ada", "ada@example.com", "salt$hash").expect("user");
        store.insert_user(&user).await.expect("insert");

        let by_id = store
            .user_by_id(&user.id)
            .await
            .expect("query")
            .expect("present");
        assert_eq!(by_id, user);

        let by_email = store
            .user_by_email("ada@example.com")
            .await
            .expect("query")
            .expect("present");
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = Store::open_in_memory().expect("open store");
        let first = User::new("Ada", "ada@example.com", "h1").expect("user");
        let second = User::new("Imposter", "ada@example.com", "h2").expect("user");
        store.insert_user(&first).await.expect("insert");
        let err = store.insert_user(&second).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let store = Store::open_in_memory().expect("open store");
        assert!(store
            .user_by_email("nobody@example.com")
            .await
            .expect("query")
            .is_none());
    }
}
