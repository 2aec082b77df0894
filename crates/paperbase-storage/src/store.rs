//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait the service crates depend on.
///
/// Every method is a single round trip and atomic on its own; multi-row
/// sequences (workspace creation, cascade deletion, invite redemption) are
/// composed in the service layer and are **not** atomic as a whole.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Upsert a user keyed by email: an existing user gets `last_login_at`
    /// bumped, otherwise a fresh row is inserted. Returns the resulting row.
    async fn create_or_update_user(&self, email: &str) -> Result<User, StoreError>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError>;

    /// Patch profile fields (name, avatar, default workspace). Only provided
    /// fields are touched.
    async fn update_user_profile(
        &self,
        user_id: &UserId,
        patch: &UserPatch,
    ) -> Result<User, StoreError>;

    // ───────────────────────────────────── One-time codes ─────────────────────────────────

    /// Insert-or-replace the code for an email in a single write. Any prior
    /// row for the address is superseded and `attempts` restarts at 0.
    async fn put_otp(&self, params: &PutOtpParams) -> Result<Otp, StoreError>;

    /// Get the active code for an email.
    async fn get_otp(&self, email: &str) -> Result<Otp, StoreError>;

    /// Increment the failed attempts counter. Returns the new count.
    async fn increment_otp_attempts(&self, email: &str) -> Result<i32, StoreError>;

    /// Delete the code for an email. Idempotent.
    async fn delete_otp(&self, email: &str) -> Result<(), StoreError>;

    /// Delete all codes whose expiry is strictly in the past.
    /// Returns the number of deleted rows.
    async fn clear_expired_otps(&self) -> Result<u64, StoreError>;

    // ───────────────────────────────────── Sessions ───────────────────────────────────────

    /// Insert a new session row.
    async fn insert_session(&self, params: &CreateSessionParams) -> Result<Session, StoreError>;

    /// Get session by token.
    async fn get_session_by_token(&self, token: &str) -> Result<Session, StoreError>;

    /// Delete a session by token. Idempotent.
    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;

    // ───────────────────────────────────── Refresh tokens ─────────────────────────────────

    /// Insert a new, unrevoked refresh token row.
    async fn insert_refresh_token(
        &self,
        params: &CreateRefreshTokenParams,
    ) -> Result<RefreshToken, StoreError>;

    /// Get refresh token by token string.
    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StoreError>;

    /// Set `revoked = true` on the row. Idempotent, including for unknown
    /// tokens; never deletes.
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError>;

    /// Mark every non-revoked token for the user as revoked, one row at a
    /// time. Returns the number of rows flipped.
    async fn revoke_all_refresh_tokens(&self, user_id: &UserId) -> Result<u64, StoreError>;

    /// Physically remove a refresh token row. Idempotent.
    async fn delete_refresh_token(&self, token: &str) -> Result<(), StoreError>;

    /// Delete all refresh tokens whose expiry is strictly in the past.
    /// Returns the number of deleted rows.
    async fn clear_expired_refresh_tokens(&self) -> Result<u64, StoreError>;

    // ───────────────────────────────────── Workspaces ─────────────────────────────────────

    /// Insert a workspace row. Fails with `AlreadyExists` on a duplicate
    /// slug.
    async fn insert_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<Workspace, StoreError>;

    /// Get workspace by ID.
    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<Workspace, StoreError>;

    /// Get workspace by slug.
    async fn get_workspace_by_slug(&self, slug: &str) -> Result<Workspace, StoreError>;

    /// Patch workspace fields; always bumps `updated_at`.
    async fn update_workspace(
        &self,
        workspace_id: &WorkspaceId,
        patch: &WorkspacePatch,
    ) -> Result<Workspace, StoreError>;

    /// Delete the workspace row only (no cascade). Idempotent.
    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Members ────────────────────────────────────────

    /// Insert a membership row. Fails with `AlreadyExists` if the
    /// (workspace, user) pair is already present.
    async fn insert_member(
        &self,
        params: &CreateMemberParams,
    ) -> Result<WorkspaceMember, StoreError>;

    /// Get a membership by (workspace, user).
    async fn get_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<WorkspaceMember, StoreError>;

    /// Overwrite the role of an existing membership.
    async fn update_member_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: Role,
    ) -> Result<WorkspaceMember, StoreError>;

    /// Delete a membership. Idempotent.
    async fn delete_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<(), StoreError>;

    /// List memberships of a workspace in insertion order.
    async fn list_members(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, StoreError>;

    /// List all memberships of a user.
    async fn list_memberships_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WorkspaceMember>, StoreError>;

    /// Count memberships of a workspace.
    async fn count_members(&self, workspace_id: &WorkspaceId) -> Result<u64, StoreError>;

    /// Delete every membership of a workspace (cascade step).
    /// Returns the number of deleted rows.
    async fn delete_members_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<u64, StoreError>;

    // ───────────────────────────────────── Invites ────────────────────────────────────────

    /// Insert an invite, or refresh the pending invite for the same
    /// (workspace, email) pair in place (new token, expiry, inviter, role).
    async fn upsert_invite(
        &self,
        params: &CreateInviteParams,
    ) -> Result<WorkspaceInvite, StoreError>;

    /// Get invite by token.
    async fn get_invite_by_token(&self, token: &str) -> Result<WorkspaceInvite, StoreError>;

    /// Conditionally set `accepted_at = now`. Fails with `Conflict` if it is
    /// already set — the single-writer gate for concurrent redemptions.
    async fn mark_invite_accepted(&self, token: &str) -> Result<WorkspaceInvite, StoreError>;

    /// Delete an invite by ID. Idempotent.
    async fn delete_invite(&self, invite_id: &InviteId) -> Result<(), StoreError>;

    /// List pending invites for a workspace.
    async fn list_invites_by_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceInvite>, StoreError>;

    /// List pending, unexpired invites for an email.
    async fn list_invites_by_email(&self, email: &str)
        -> Result<Vec<WorkspaceInvite>, StoreError>;

    /// Delete every invite of a workspace (cascade step).
    /// Returns the number of deleted rows.
    async fn delete_invites_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<u64, StoreError>;

    /// Delete all unaccepted invites whose expiry is strictly in the past.
    /// Returns the number of deleted rows.
    async fn clear_expired_invites(&self) -> Result<u64, StoreError>;
}
