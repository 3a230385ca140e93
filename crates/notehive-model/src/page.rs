use notehive_core::{time, Error, PageId, Result, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

pub const PAGE_TITLE_MAX_LEN: usize = 200;

/// A markdown note inside a workspace. `parent_id` points at another page
/// of the same workspace (`None` = top level); `order` sorts siblings and
/// is not unique; display ties break on `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub content: String,
    pub workspace_id: WorkspaceId,
    pub parent_id: Option<PageId>,
    pub order: i64,
    pub updated_by: UserId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Page {
    pub fn new(
        title: &str,
        content: Option<&str>,
        workspace_id: WorkspaceId,
        parent_id: Option<PageId>,
        order: i64,
        updated_by: UserId,
    ) -> Result<Self> {
        let title = validate_title(title)?;
        let now = time::unix_millis();
        Ok(Self {
            id: PageId::generate(),
            title,
            content: content.unwrap_or_default().to_string(),
            workspace_id,
            parent_id,
            order,
            updated_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = validate_title(title)?;
        Ok(())
    }
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::invalid_argument("title is required"));
    }
    if title.chars().count() > PAGE_TITLE_MAX_LEN {
        return Err(Error::invalid_argument(format!(
            "title cannot exceed {PAGE_TITLE_MAX_LEN} characters"
        )));
    }
    Ok(title.to_string())
}
