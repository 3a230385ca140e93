//! Domain operations behind the handlers. Every function takes the caller
//! explicitly and runs its policy checks before any mutation.

pub mod assist;
pub mod pages;
pub mod users;
pub mod workspaces;
