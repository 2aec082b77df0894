//! Workspace invite types.

use chrono::{DateTime, Utc};

use super::{InviteId, Role, UserId, WorkspaceId};

/// Workspace invite record.
///
/// `accepted_at` is set at most once; the conditional patch that sets it is
/// the single-writer gate for concurrent redemptions.
#[derive(Clone, Debug)]
pub struct WorkspaceInvite {
    pub id: InviteId,
    pub workspace_id: WorkspaceId,
    pub invited_by: UserId,
    pub email: String, // Lowercased
    pub role: Role,    // Role granted on redemption
    pub token: String, // Globally unique opaque token
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceInvite {
    /// An invite is pending while it has not been accepted.
    pub fn is_pending(&self) -> bool {
        self.accepted_at.is_none()
    }
}

/// Parameters for creating (or refreshing) an invite
#[derive(Clone, Debug)]
pub struct CreateInviteParams {
    pub workspace_id: WorkspaceId,
    pub invited_by: UserId,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
