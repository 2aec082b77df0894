//! Workspace membership management.
//!
//! The (workspace, user) pair is unique; `add` enforces it with a
//! read-before-write upsert so the caller learns whether the member was
//! newly created or had their role overwritten.

use std::sync::Arc;

use paperbase_storage::{
    CreateMemberParams, Role, Store, StoreError, UserId, UserSummary, WorkspaceId, WorkspaceMember,
};

use crate::error::WorkspaceError;

/// Result of an `add`: distinguishes a first join from a role change.
#[derive(Clone, Debug)]
pub enum MemberUpsert {
    Created(WorkspaceMember),
    Updated(WorkspaceMember),
}

impl MemberUpsert {
    pub fn member(&self) -> &WorkspaceMember {
        match self {
            MemberUpsert::Created(m) | MemberUpsert::Updated(m) => m,
        }
    }

    pub fn into_member(self) -> WorkspaceMember {
        match self {
            MemberUpsert::Created(m) | MemberUpsert::Updated(m) => m,
        }
    }
}

/// A membership joined with a denormalized user projection.
#[derive(Clone, Debug)]
pub struct MemberWithUser {
    pub member: WorkspaceMember,
    pub user: UserSummary,
}

/// Maintains the many-to-many user↔workspace relation with roles.
pub struct MembershipManager<S> {
    store: Arc<S>,
}

impl<S: Store> MembershipManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Upsert a membership: a new pair is inserted with `joined_at = now`,
    /// an existing pair has its role overwritten.
    pub async fn add(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: Role,
    ) -> Result<MemberUpsert, WorkspaceError> {
        match self.store.get_member(workspace_id, user_id).await {
            Ok(_) => {
                let member = self
                    .store
                    .update_member_role(workspace_id, user_id, role)
                    .await?;
                return Ok(MemberUpsert::Updated(member));
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        match self
            .store
            .insert_member(&CreateMemberParams {
                workspace_id: workspace_id.clone(),
                user_id: user_id.clone(),
                role,
            })
            .await
        {
            Ok(member) => Ok(MemberUpsert::Created(member)),
            // Lost a race with a concurrent add: fall back to the update arm.
            Err(StoreError::AlreadyExists) => {
                let member = self
                    .store
                    .update_member_role(workspace_id, user_id, role)
                    .await?;
                Ok(MemberUpsert::Updated(member))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a membership. Succeeds even if no row existed.
    pub async fn remove(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<(), WorkspaceError> {
        Ok(self.store.delete_member(workspace_id, user_id).await?)
    }

    /// Change an existing member's role. Unlike `add`, a missing member is
    /// an error.
    pub async fn update_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: Role,
    ) -> Result<WorkspaceMember, WorkspaceError> {
        match self
            .store
            .update_member_role(workspace_id, user_id, role)
            .await
        {
            Ok(member) => Ok(member),
            Err(StoreError::NotFound) => Err(WorkspaceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Members of a workspace in insertion order, each joined to a user
    /// summary. Members whose user record is missing are skipped
    /// (defensive against referential drift).
    pub async fn list_by_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<MemberWithUser>, WorkspaceError> {
        let members = self.store.list_members(workspace_id).await?;

        let mut out = Vec::with_capacity(members.len());
        for member in members {
            match self.store.get_user_by_id(&member.user_id).await {
                Ok(user) => out.push(MemberWithUser {
                    user: UserSummary::from(&user),
                    member,
                }),
                Err(StoreError::NotFound) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(out)
    }

    pub async fn get_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Option<Role>, WorkspaceError> {
        match self.store.get_member(workspace_id, user_id).await {
            Ok(member) => Ok(Some(member.role)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn is_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<bool, WorkspaceError> {
        Ok(self.get_role(workspace_id, user_id).await?.is_some())
    }

    pub async fn count(&self, workspace_id: &WorkspaceId) -> Result<u64, WorkspaceError> {
        Ok(self.store.count_members(workspace_id).await?)
    }
}
