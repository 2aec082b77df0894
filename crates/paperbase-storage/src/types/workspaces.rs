//! Workspace types.

use chrono::{DateTime, Utc};

use super::{Plan, UserId, WorkspaceId};

/// Workspace record
#[derive(Clone, Debug)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub slug: String, // Unique across all workspaces; human-facing routing key
    pub icon: Option<String>,
    pub owner_id: UserId,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a workspace
#[derive(Clone, Debug)]
pub struct CreateWorkspaceParams {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub owner_id: UserId,
    pub plan: Plan,
}

/// Partial update for a workspace. `None` leaves the field untouched;
/// `updated_at` is bumped on every patch.
#[derive(Clone, Debug, Default)]
pub struct WorkspacePatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub slug: Option<String>,
}
