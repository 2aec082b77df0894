//! Workspace membership types.

use chrono::{DateTime, Utc};

use super::{Role, UserId, WorkspaceId};

/// Workspace membership record. The pair (workspace_id, user_id) is unique.
#[derive(Clone, Debug)]
pub struct WorkspaceMember {
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Parameters for creating a membership
#[derive(Clone, Debug)]
pub struct CreateMemberParams {
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub role: Role,
}
