//! Workspace access policy.
//!
//! Both predicates are pure over `(&Workspace, &UserId)`; the caller
//! identity is always passed explicitly so the checks stay independently
//! testable. Every read/write of a workspace or one of its pages requires
//! `can_access`; title/description edits, delete, and membership management
//! require the stricter `is_owner`. Checks must run before any mutation.

use notehive_core::UserId;

use crate::workspace::Workspace;

/// Owner or member.
#[must_use]
pub fn can_access(workspace: &Workspace, user_id: &UserId) -> bool {
    is_owner(workspace, user_id) || workspace.members.contains(user_id)
}

/// Owner only.
#[must_use]
pub fn is_owner(workspace: &Workspace, user_id: &UserId) -> bool {
    workspace.owner == *user_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_with_member() -> (Workspace, UserId, UserId) {
        let owner = UserId::generate();
        let member = UserId::generate();
        let mut ws = Workspace::new("Docs", None, owner.clone()).expect("valid workspace");
        ws.members.push(member.clone());
        (ws, owner, member)
    }

    #[test]
    fn owner_passes_both_predicates() {
        let (ws, owner, _) = workspace_with_member();
        assert!(can_access(&ws, &owner));
        assert!(is_owner(&ws, &owner));
    }

    #[test]
    fn member_can_access_but_does_not_own() {
        let (ws, _, member) = workspace_with_member();
        assert!(can_access(&ws, &member));
        assert!(!is_owner(&ws, &member));
    }

    #[test]
    fn stranger_fails_both_predicates() {
        let (ws, _, _) = workspace_with_member();
        let stranger = UserId::generate();
        assert!(!can_access(&ws, &stranger));
        assert!(!is_owner(&ws, &stranger));
    }
}
