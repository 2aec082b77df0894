//! Time-boxed, single-use workspace invitations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;

use paperbase_storage::{
    CreateInviteParams, InviteId, Role, Store, StoreError, UserId, WorkspaceId, WorkspaceInvite,
    WorkspaceMember,
};

use crate::config::WorkspaceConfig;
use crate::error::{SagaStep, WorkspaceError};
use crate::membership::MembershipManager;

/// Issues and redeems invitation tokens that, on redemption, create a
/// membership. Authorization of the inviter happens upstream.
pub struct InviteManager<S> {
    store: Arc<S>,
    members: MembershipManager<S>,
    config: WorkspaceConfig,
}

impl<S: Store> InviteManager<S> {
    pub fn new(store: Arc<S>, config: WorkspaceConfig) -> Self {
        Self {
            members: MembershipManager::new(store.clone()),
            store,
            config,
        }
    }

    /// Issue an invite for an email, granting `role` on redemption.
    ///
    /// A pending invite for the same (workspace, email) pair is refreshed in
    /// place rather than duplicated. Ownership can only originate from
    /// workspace creation, so `Role::Owner` is rejected here.
    pub async fn invite(
        &self,
        workspace_id: &WorkspaceId,
        invited_by: &UserId,
        email: &str,
        role: Role,
    ) -> Result<WorkspaceInvite, WorkspaceError> {
        if role == Role::Owner {
            return Err(WorkspaceError::InvalidRole);
        }

        let email = email.trim().to_lowercase();
        let token = paperbase_token::opaque_token();
        let expires_at = Utc::now() + Duration::seconds(self.config.invite_lifetime_secs as i64);

        let invite = self
            .store
            .upsert_invite(&CreateInviteParams {
                workspace_id: workspace_id.clone(),
                invited_by: invited_by.clone(),
                email,
                role,
                token,
                expires_at,
            })
            .await?;

        debug!(workspace = %workspace_id.0, invite = %invite.id.0, "invite issued");
        Ok(invite)
    }

    /// Look up an invite by its token.
    pub async fn get_by_token(&self, token: &str) -> Result<WorkspaceInvite, WorkspaceError> {
        match self.store.get_invite_by_token(token).await {
            Ok(invite) => Ok(invite),
            Err(StoreError::NotFound) => Err(WorkspaceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Redeem an invite for a user, creating (or updating) their
    /// membership with the invited role.
    ///
    /// The conditional accept is the single-writer gate: of two concurrent
    /// redemptions of the same token exactly one passes, the other observes
    /// `AlreadyAccepted`. A membership write failure after the accept
    /// surfaces as `PartiallyApplied`.
    pub async fn redeem(
        &self,
        token: &str,
        user_id: &UserId,
    ) -> Result<WorkspaceMember, WorkspaceError> {
        let invite = match self.store.get_invite_by_token(token).await {
            Ok(invite) => invite,
            Err(StoreError::NotFound) => return Err(WorkspaceError::NotFound),
            Err(e) => return Err(e.into()),
        };

        if invite.accepted_at.is_some() {
            return Err(WorkspaceError::AlreadyAccepted);
        }
        if invite.expires_at < Utc::now() {
            return Err(WorkspaceError::Expired);
        }

        let accepted = match self.store.mark_invite_accepted(token).await {
            Ok(invite) => invite,
            Err(StoreError::Conflict) => return Err(WorkspaceError::AlreadyAccepted),
            // Swept or revoked between the read and the patch.
            Err(StoreError::NotFound) => return Err(WorkspaceError::NotFound),
            Err(e) => return Err(e.into()),
        };

        match self
            .members
            .add(&accepted.workspace_id, user_id, accepted.role)
            .await
        {
            Ok(upsert) => {
                debug!(workspace = %accepted.workspace_id.0, invite = %accepted.id.0, "invite redeemed");
                Ok(upsert.into_member())
            }
            Err(WorkspaceError::Store(e)) => Err(WorkspaceError::PartiallyApplied {
                applied: vec![SagaStep::InviteAccepted],
                source: e,
            }),
            Err(e) => Err(e),
        }
    }

    /// Withdraw an invite. Idempotent.
    pub async fn revoke(&self, invite_id: &InviteId) -> Result<(), WorkspaceError> {
        Ok(self.store.delete_invite(invite_id).await?)
    }

    /// Pending invites of a workspace.
    pub async fn list_by_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceInvite>, WorkspaceError> {
        Ok(self.store.list_invites_by_workspace(workspace_id).await?)
    }

    /// Pending, unexpired invites addressed to an email.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<WorkspaceInvite>, WorkspaceError> {
        let email = email.trim().to_lowercase();
        Ok(self.store.list_invites_by_email(&email).await?)
    }

    /// Remove unaccepted invites past their expiry. Returns the number
    /// removed.
    pub async fn clear_expired(&self) -> Result<u64, WorkspaceError> {
        Ok(self.store.clear_expired_invites().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperbase_storage::{CreateWorkspaceParams, Plan, User};
    use paperbase_store_memory::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, WorkspaceId, User) {
        let store = Arc::new(MemoryStore::new());
        let owner = store.create_or_update_user("owner@x.com").await.unwrap();
        let ws = store
            .insert_workspace(&CreateWorkspaceParams {
                name: "Acme".into(),
                slug: "acme".into(),
                icon: None,
                owner_id: owner.id.clone(),
                plan: Plan::Free,
            })
            .await
            .unwrap();
        (store, ws.id, owner)
    }

    fn manager(store: Arc<MemoryStore>) -> InviteManager<MemoryStore> {
        InviteManager::new(store, WorkspaceConfig::default())
    }

    #[tokio::test]
    async fn redeem_creates_membership_with_invited_role() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store.clone());
        let invited = store.create_or_update_user("new@x.com").await.unwrap();

        let invite = invites
            .invite(&ws, &owner.id, "New@X.com", Role::Admin)
            .await
            .unwrap();
        assert_eq!(invite.email, "new@x.com");

        let member = invites.redeem(&invite.token, &invited.id).await.unwrap();
        assert_eq!(member.role, Role::Admin);
        assert_eq!(member.workspace_id, ws);

        // acceptedAt is recorded on the invite.
        let redeemed = invites.get_by_token(&invite.token).await.unwrap();
        assert!(redeemed.accepted_at.is_some());
    }

    #[tokio::test]
    async fn second_redemption_is_already_accepted() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store.clone());
        let a = store.create_or_update_user("a@x.com").await.unwrap();
        let b = store.create_or_update_user("b@x.com").await.unwrap();

        let invite = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();
        invites.redeem(&invite.token, &a.id).await.unwrap();

        assert!(matches!(
            invites.redeem(&invite.token, &b.id).await,
            Err(WorkspaceError::AlreadyAccepted)
        ));
        // Exactly one membership resulted.
        assert_eq!(store.count_members(&ws).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn expired_invite_is_rejected() {
        let (store, ws, owner) = setup().await;
        let invites = InviteManager::new(
            store.clone(),
            WorkspaceConfig {
                invite_lifetime_secs: 0,
            },
        );
        let user = store.create_or_update_user("a@x.com").await.unwrap();

        let invite = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();
        assert!(matches!(
            invites.redeem(&invite.token, &user.id).await,
            Err(WorkspaceError::Expired)
        ));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (store, _ws, owner) = setup().await;
        let invites = manager(store);

        assert!(matches!(
            invites.redeem("ghost", &owner.id).await,
            Err(WorkspaceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn owner_role_is_not_grantable() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store);

        assert!(matches!(
            invites.invite(&ws, &owner.id, "a@x.com", Role::Owner).await,
            Err(WorkspaceError::InvalidRole)
        ));
    }

    #[tokio::test]
    async fn reinvite_refreshes_the_pending_row() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store);

        let first = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();
        let second = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Guest)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_ne!(first.token, second.token);
        assert_eq!(second.role, Role::Guest);
        assert_eq!(invites.list_by_workspace(&ws).await.unwrap().len(), 1);
        assert!(matches!(
            invites.get_by_token(&first.token).await,
            Err(WorkspaceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_by_email_filters_pending_unexpired() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store.clone());
        let user = store.create_or_update_user("a@x.com").await.unwrap();

        let other_ws = store
            .insert_workspace(&CreateWorkspaceParams {
                name: "Beta".into(),
                slug: "beta".into(),
                icon: None,
                owner_id: owner.id.clone(),
                plan: Plan::Free,
            })
            .await
            .unwrap();

        let redeemed = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();
        invites.redeem(&redeemed.token, &user.id).await.unwrap();
        invites
            .invite(&other_ws.id, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();

        // Only the unredeemed invite is pending for the address.
        let pending = invites.list_by_email("A@X.com").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].workspace_id, other_ws.id);
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let (store, ws, owner) = setup().await;
        let invites = manager(store);

        let invite = invites
            .invite(&ws, &owner.id, "a@x.com", Role::Member)
            .await
            .unwrap();
        invites.revoke(&invite.id).await.unwrap();
        invites.revoke(&invite.id).await.unwrap();
        assert!(matches!(
            invites.get_by_token(&invite.token).await,
            Err(WorkspaceError::NotFound)
        ));
    }
}
