#![forbid(unsafe_code)]
//! notehive entity model: users, workspaces, hierarchical pages, the
//! workspace access policy, and the page-tree materializer.

mod page;
mod policy;
mod tree;
mod user;
mod workspace;

pub use page::{Page, PAGE_TITLE_MAX_LEN};
pub use policy::{can_access, is_owner};
pub use tree::{build_tree, flatten, PageNode};
pub use user::{normalize_email, User, MIN_PASSWORD_LEN};
pub use workspace::{Workspace, WORKSPACE_DESCRIPTION_MAX_LEN, WORKSPACE_TITLE_MAX_LEN};
