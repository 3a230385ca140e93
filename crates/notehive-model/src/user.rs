use notehive_core::{time, Error, Result, UserId};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Registered account. `password_hash` carries the salted digest, never the
/// plaintext, and is excluded from every wire representation by the API
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: impl Into<String>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument("name is required"));
        }
        let email = normalize_email(email)?;
        let now = time::unix_millis();
        Ok(Self {
            id: UserId::generate(),
            name: name.to_string(),
            email,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Lowercased, trimmed email with a minimal shape check.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(Error::invalid_argument("email is required"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::invalid_argument("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(Error::invalid_argument(format!("invalid email: {email}")));
    }
    Ok(email)
}
