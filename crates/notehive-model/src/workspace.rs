use notehive_core::{time, Error, Result, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

pub const WORKSPACE_TITLE_MAX_LEN: usize = 100;
pub const WORKSPACE_DESCRIPTION_MAX_LEN: usize = 500;

/// A shared collection of pages. The owner is fixed at creation and is
/// always present in `members`; the member list itself is an ordered,
/// non-unique-checked list (duplicate prevention happens in the add path,
/// not in storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub title: String,
    pub description: String,
    pub owner: UserId,
    pub members: Vec<UserId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Workspace {
    pub fn new(title: &str, description: Option<&str>, owner: UserId) -> Result<Self> {
        let title = validate_title(title)?;
        let description = validate_description(description.unwrap_or_default())?;
        let now = time::unix_millis();
        Ok(Self {
            id: WorkspaceId::generate(),
            title,
            description,
            members: vec![owner.clone()],
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = validate_title(title)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.description = validate_description(description)?;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::invalid_argument("title is required"));
    }
    if title.chars().count() > WORKSPACE_TITLE_MAX_LEN {
        return Err(Error::invalid_argument(format!(
            "title cannot exceed {WORKSPACE_TITLE_MAX_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<String> {
    let description = description.trim();
    if description.chars().count() > WORKSPACE_DESCRIPTION_MAX_LEN {
        return Err(Error::invalid_argument(format!(
            "description cannot exceed {WORKSPACE_DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(description.to_string())
}
