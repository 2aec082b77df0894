//! Workspace error types and multi-step sequence markers.

use paperbase_storage::StoreError;
use thiserror::Error;

/// Completion markers for the multi-row sequences in this crate (workspace
/// creation, cascade deletion, invite redemption). Each marker is recorded
/// as the corresponding row lands, so a mid-sequence failure names exactly
/// what was applied and the caller can retry the remainder or reconcile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SagaStep {
    WorkspaceInserted,
    OwnerMembershipInserted,
    MembersDeleted,
    InvitesDeleted,
    WorkspaceDeleted,
    InviteAccepted,
    MembershipCreated,
}

/// Errors surfaced by the tenancy services.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("expired")]
    Expired,

    #[error("invite already accepted")]
    AlreadyAccepted,

    #[error("role not grantable by invite")]
    InvalidRole,

    /// A multi-row sequence failed after some rows landed. Never silently
    /// swallowed: the caller decides whether to retry the remaining steps
    /// or reconcile manually.
    #[error("partially applied (completed: {applied:?}): {source}")]
    PartiallyApplied {
        applied: Vec<SagaStep>,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
