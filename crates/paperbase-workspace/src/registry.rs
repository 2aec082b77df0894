//! Workspace registry: creation, lookup, update, cascade deletion.

use std::sync::Arc;

use tracing::info;

use paperbase_storage::{
    CreateMemberParams, CreateWorkspaceParams, Plan, Role, Store, StoreError, UserId, Workspace,
    WorkspaceId, WorkspacePatch,
};

use crate::error::{SagaStep, WorkspaceError};

/// A workspace joined with the caller's membership in it.
#[derive(Clone, Debug)]
pub struct WorkspaceWithRole {
    pub workspace: Workspace,
    pub role: Role,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// Creates workspaces, owns slug uniqueness, tracks workspace metadata.
pub struct WorkspaceRegistry<S> {
    store: Arc<S>,
}

impl<S: Store> WorkspaceRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a workspace and its owner membership.
    ///
    /// The slug must already be validated (see [`crate::slug`]); uniqueness
    /// is checked here before the first write. The two inserts are atomic
    /// individually but not as a pair — if the owner membership fails to
    /// land, the error names the workspace insert as applied.
    pub async fn create(
        &self,
        name: &str,
        owner_id: &UserId,
        icon: Option<String>,
        slug: &str,
    ) -> Result<Workspace, WorkspaceError> {
        // Caller-side uniqueness check before write.
        match self.store.get_workspace_by_slug(slug).await {
            Ok(_) => return Err(WorkspaceError::Conflict),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let workspace = match self
            .store
            .insert_workspace(&CreateWorkspaceParams {
                name: name.to_string(),
                slug: slug.to_string(),
                icon,
                owner_id: owner_id.clone(),
                plan: Plan::Free,
            })
            .await
        {
            Ok(ws) => ws,
            // Lost a race with a concurrent create on the same slug.
            Err(StoreError::AlreadyExists) => return Err(WorkspaceError::Conflict),
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self
            .store
            .insert_member(&CreateMemberParams {
                workspace_id: workspace.id.clone(),
                user_id: owner_id.clone(),
                role: Role::Owner,
            })
            .await
        {
            return Err(WorkspaceError::PartiallyApplied {
                applied: vec![SagaStep::WorkspaceInserted],
                source: e,
            });
        }

        info!(workspace = %workspace.id.0, slug, "workspace created");
        Ok(workspace)
    }

    pub async fn get_by_id(&self, workspace_id: &WorkspaceId) -> Result<Workspace, WorkspaceError> {
        match self.store.get_workspace(workspace_id).await {
            Ok(ws) => Ok(ws),
            Err(StoreError::NotFound) => Err(WorkspaceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Point lookup by slug, used for human-facing routing.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Workspace, WorkspaceError> {
        match self.store.get_workspace_by_slug(slug).await {
            Ok(ws) => Ok(ws),
            Err(StoreError::NotFound) => Err(WorkspaceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Patch the provided fields; `updated_at` is always bumped.
    pub async fn update(
        &self,
        workspace_id: &WorkspaceId,
        patch: &WorkspacePatch,
    ) -> Result<Workspace, WorkspaceError> {
        match self.store.update_workspace(workspace_id, patch).await {
            Ok(ws) => Ok(ws),
            Err(StoreError::NotFound) => Err(WorkspaceError::NotFound),
            Err(StoreError::Conflict) => Err(WorkspaceError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a workspace with its memberships and invites.
    ///
    /// Members and invites go first so no reader can observe a dangling
    /// reference to a missing workspace between steps. A failure after the
    /// first completed step surfaces as `PartiallyApplied`.
    pub async fn remove(&self, workspace_id: &WorkspaceId) -> Result<(), WorkspaceError> {
        let mut applied = Vec::new();

        if let Err(e) = self.store.delete_members_for_workspace(workspace_id).await {
            return Err(e.into());
        }
        applied.push(SagaStep::MembersDeleted);

        if let Err(e) = self.store.delete_invites_for_workspace(workspace_id).await {
            return Err(WorkspaceError::PartiallyApplied { applied, source: e });
        }
        applied.push(SagaStep::InvitesDeleted);

        if let Err(e) = self.store.delete_workspace(workspace_id).await {
            return Err(WorkspaceError::PartiallyApplied { applied, source: e });
        }

        info!(workspace = %workspace_id.0, "workspace deleted");
        Ok(())
    }

    /// All workspaces a user belongs to, with their role, most recently
    /// joined first. Memberships pointing at a missing workspace are
    /// skipped.
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WorkspaceWithRole>, WorkspaceError> {
        let memberships = self.store.list_memberships_for_user(user_id).await?;

        let mut out = Vec::with_capacity(memberships.len());
        for membership in memberships {
            match self.store.get_workspace(&membership.workspace_id).await {
                Ok(workspace) => out.push(WorkspaceWithRole {
                    workspace,
                    role: membership.role,
                    joined_at: membership.joined_at,
                }),
                Err(StoreError::NotFound) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        out.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(out)
    }
}
