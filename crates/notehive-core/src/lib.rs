#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "notehive-core";

pub const ENV_NOTEHIVE_LOG: &str = "NOTEHIVE_LOG";

mod error;
pub mod time;
mod types;

pub use error::{Error, ErrorCode, Result};
pub use types::ids::{PageId, UserId, WorkspaceId};
