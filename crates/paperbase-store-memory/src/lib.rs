//! In-memory reference backend for the paperbase [`Store`] trait.
//!
//! All tables live behind a single mutex; each trait method takes the lock
//! once, mutates, and releases before returning, which gives exactly the
//! per-row atomicity the storage contract promises — and nothing more.
//! Cross-row sequences composed in the service layer see the same narrow
//! inconsistency windows they would see against a real backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use paperbase_storage::*;

/// In-memory store. Cheap to create; every test gets a fresh one.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    otps: HashMap<String, Otp>,                    // keyed by email
    sessions: HashMap<String, Session>,            // keyed by token
    refresh_tokens: HashMap<String, RefreshToken>, // keyed by token
    workspaces: HashMap<Uuid, Workspace>,
    members: Vec<WorkspaceMember>, // insertion order is the listing order
    invites: Vec<WorkspaceInvite>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    async fn create_or_update_user(&self, email: &str) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        let now = Utc::now();
        if let Some(user) = t.users.iter_mut().find(|u| u.email == email) {
            user.last_login_at = now;
            return Ok(user.clone());
        }
        let user = User {
            id: UserId(Uuid::now_v7()),
            email: email.to_string(),
            name: None,
            avatar: None,
            default_workspace_id: None,
            created_at: now,
            last_login_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let t = self.lock()?;
        t.users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError> {
        let t = self.lock()?;
        t.users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user_profile(
        &self,
        user_id: &UserId,
        patch: &UserPatch,
    ) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        let user = t
            .users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = &patch.name {
            user.name = Some(name.clone());
        }
        if let Some(avatar) = &patch.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(ws) = &patch.default_workspace_id {
            user.default_workspace_id = Some(ws.clone());
        }
        Ok(user.clone())
    }

    // ───────────────────────────────────── One-time codes ─────────────────────────────────

    async fn put_otp(&self, params: &PutOtpParams) -> Result<Otp, StoreError> {
        let mut t = self.lock()?;
        let otp = Otp {
            id: OtpId(Uuid::now_v7()),
            email: params.email.clone(),
            code: params.code.clone(),
            expires_at: params.expires_at,
            attempts: 0,
            created_at: Utc::now(),
        };
        // Single write replaces any prior row for the address.
        t.otps.insert(params.email.clone(), otp.clone());
        Ok(otp)
    }

    async fn get_otp(&self, email: &str) -> Result<Otp, StoreError> {
        let t = self.lock()?;
        t.otps.get(email).cloned().ok_or(StoreError::NotFound)
    }

    async fn increment_otp_attempts(&self, email: &str) -> Result<i32, StoreError> {
        let mut t = self.lock()?;
        let otp = t.otps.get_mut(email).ok_or(StoreError::NotFound)?;
        otp.attempts += 1;
        Ok(otp.attempts)
    }

    async fn delete_otp(&self, email: &str) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.otps.remove(email);
        Ok(())
    }

    async fn clear_expired_otps(&self) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let now = Utc::now();
        let before = t.otps.len();
        t.otps.retain(|_, otp| otp.expires_at >= now);
        Ok((before - t.otps.len()) as u64)
    }

    // ───────────────────────────────────── Sessions ───────────────────────────────────────

    async fn insert_session(&self, params: &CreateSessionParams) -> Result<Session, StoreError> {
        let mut t = self.lock()?;
        if t.sessions.contains_key(&params.token) {
            return Err(StoreError::AlreadyExists);
        }
        let session = Session {
            id: SessionId(Uuid::now_v7()),
            user_id: params.user_id.clone(),
            token: params.token.clone(),
            expires_at: params.expires_at,
            created_at: Utc::now(),
        };
        t.sessions.insert(params.token.clone(), session.clone());
        Ok(session)
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Session, StoreError> {
        let t = self.lock()?;
        t.sessions.get(token).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.sessions.remove(token);
        Ok(())
    }

    // ───────────────────────────────────── Refresh tokens ─────────────────────────────────

    async fn insert_refresh_token(
        &self,
        params: &CreateRefreshTokenParams,
    ) -> Result<RefreshToken, StoreError> {
        let mut t = self.lock()?;
        if t.refresh_tokens.contains_key(&params.token) {
            return Err(StoreError::AlreadyExists);
        }
        let token = RefreshToken {
            id: RefreshTokenId(Uuid::now_v7()),
            user_id: params.user_id.clone(),
            token: params.token.clone(),
            expires_at: params.expires_at,
            created_at: Utc::now(),
            revoked: false,
        };
        t.refresh_tokens.insert(params.token.clone(), token.clone());
        Ok(token)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StoreError> {
        let t = self.lock()?;
        t.refresh_tokens
            .get(token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        if let Some(row) = t.refresh_tokens.get_mut(token) {
            row.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all_refresh_tokens(&self, user_id: &UserId) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let mut flipped = 0u64;
        for row in t.refresh_tokens.values_mut() {
            if &row.user_id == user_id && !row.revoked {
                row.revoked = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.refresh_tokens.remove(token);
        Ok(())
    }

    async fn clear_expired_refresh_tokens(&self) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let now = Utc::now();
        let before = t.refresh_tokens.len();
        t.refresh_tokens.retain(|_, row| row.expires_at >= now);
        Ok((before - t.refresh_tokens.len()) as u64)
    }

    // ───────────────────────────────────── Workspaces ─────────────────────────────────────

    async fn insert_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<Workspace, StoreError> {
        let mut t = self.lock()?;
        if t.workspaces.values().any(|w| w.slug == params.slug) {
            return Err(StoreError::AlreadyExists);
        }
        let now = Utc::now();
        let workspace = Workspace {
            id: WorkspaceId(Uuid::now_v7()),
            name: params.name.clone(),
            slug: params.slug.clone(),
            icon: params.icon.clone(),
            owner_id: params.owner_id.clone(),
            plan: params.plan,
            created_at: now,
            updated_at: now,
        };
        t.workspaces.insert(workspace.id.0, workspace.clone());
        Ok(workspace)
    }

    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<Workspace, StoreError> {
        let t = self.lock()?;
        t.workspaces
            .get(&workspace_id.0)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_workspace_by_slug(&self, slug: &str) -> Result<Workspace, StoreError> {
        let t = self.lock()?;
        t.workspaces
            .values()
            .find(|w| w.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_workspace(
        &self,
        workspace_id: &WorkspaceId,
        patch: &WorkspacePatch,
    ) -> Result<Workspace, StoreError> {
        let mut t = self.lock()?;
        if let Some(slug) = &patch.slug {
            // Slug stays unique across all workspaces.
            if t.workspaces
                .values()
                .any(|w| &w.slug == slug && &w.id != workspace_id)
            {
                return Err(StoreError::Conflict);
            }
        }
        let ws = t
            .workspaces
            .get_mut(&workspace_id.0)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = &patch.name {
            ws.name = name.clone();
        }
        if let Some(icon) = &patch.icon {
            ws.icon = Some(icon.clone());
        }
        if let Some(slug) = &patch.slug {
            ws.slug = slug.clone();
        }
        ws.updated_at = Utc::now();
        Ok(ws.clone())
    }

    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.workspaces.remove(&workspace_id.0);
        Ok(())
    }

    // ───────────────────────────────────── Members ────────────────────────────────────────

    async fn insert_member(
        &self,
        params: &CreateMemberParams,
    ) -> Result<WorkspaceMember, StoreError> {
        let mut t = self.lock()?;
        if t.members
            .iter()
            .any(|m| m.workspace_id == params.workspace_id && m.user_id == params.user_id)
        {
            return Err(StoreError::AlreadyExists);
        }
        let member = WorkspaceMember {
            workspace_id: params.workspace_id.clone(),
            user_id: params.user_id.clone(),
            role: params.role,
            joined_at: Utc::now(),
        };
        t.members.push(member.clone());
        Ok(member)
    }

    async fn get_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<WorkspaceMember, StoreError> {
        let t = self.lock()?;
        t.members
            .iter()
            .find(|m| &m.workspace_id == workspace_id && &m.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_member_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: Role,
    ) -> Result<WorkspaceMember, StoreError> {
        let mut t = self.lock()?;
        let member = t
            .members
            .iter_mut()
            .find(|m| &m.workspace_id == workspace_id && &m.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        member.role = role;
        Ok(member.clone())
    }

    async fn delete_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.members
            .retain(|m| !(&m.workspace_id == workspace_id && &m.user_id == user_id));
        Ok(())
    }

    async fn list_members(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, StoreError> {
        let t = self.lock()?;
        Ok(t.members
            .iter()
            .filter(|m| &m.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn list_memberships_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WorkspaceMember>, StoreError> {
        let t = self.lock()?;
        Ok(t.members
            .iter()
            .filter(|m| &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_members(&self, workspace_id: &WorkspaceId) -> Result<u64, StoreError> {
        let t = self.lock()?;
        Ok(t.members
            .iter()
            .filter(|m| &m.workspace_id == workspace_id)
            .count() as u64)
    }

    async fn delete_members_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let before = t.members.len();
        t.members.retain(|m| &m.workspace_id != workspace_id);
        Ok((before - t.members.len()) as u64)
    }

    // ───────────────────────────────────── Invites ────────────────────────────────────────

    async fn upsert_invite(
        &self,
        params: &CreateInviteParams,
    ) -> Result<WorkspaceInvite, StoreError> {
        let mut t = self.lock()?;
        let now = Utc::now();
        // Refresh a pending invite for the same (workspace, email) in place.
        if let Some(invite) = t.invites.iter_mut().find(|i| {
            i.workspace_id == params.workspace_id
                && i.email == params.email
                && i.accepted_at.is_none()
        }) {
            invite.token = params.token.clone();
            invite.expires_at = params.expires_at;
            invite.invited_by = params.invited_by.clone();
            invite.role = params.role;
            return Ok(invite.clone());
        }
        let invite = WorkspaceInvite {
            id: InviteId(Uuid::now_v7()),
            workspace_id: params.workspace_id.clone(),
            invited_by: params.invited_by.clone(),
            email: params.email.clone(),
            role: params.role,
            token: params.token.clone(),
            expires_at: params.expires_at,
            accepted_at: None,
            created_at: now,
        };
        t.invites.push(invite.clone());
        Ok(invite)
    }

    async fn get_invite_by_token(&self, token: &str) -> Result<WorkspaceInvite, StoreError> {
        let t = self.lock()?;
        t.invites
            .iter()
            .find(|i| i.token == token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn mark_invite_accepted(&self, token: &str) -> Result<WorkspaceInvite, StoreError> {
        let mut t = self.lock()?;
        let invite = t
            .invites
            .iter_mut()
            .find(|i| i.token == token)
            .ok_or(StoreError::NotFound)?;
        // accepted_at is set at most once; losers of a race see Conflict.
        if invite.accepted_at.is_some() {
            return Err(StoreError::Conflict);
        }
        invite.accepted_at = Some(Utc::now());
        Ok(invite.clone())
    }

    async fn delete_invite(&self, invite_id: &InviteId) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.invites.retain(|i| &i.id != invite_id);
        Ok(())
    }

    async fn list_invites_by_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceInvite>, StoreError> {
        let t = self.lock()?;
        Ok(t.invites
            .iter()
            .filter(|i| &i.workspace_id == workspace_id && i.accepted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list_invites_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<WorkspaceInvite>, StoreError> {
        let t = self.lock()?;
        let now = Utc::now();
        Ok(t.invites
            .iter()
            .filter(|i| i.email == email && i.accepted_at.is_none() && i.expires_at > now)
            .cloned()
            .collect())
    }

    async fn delete_invites_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let before = t.invites.len();
        t.invites.retain(|i| &i.workspace_id != workspace_id);
        Ok((before - t.invites.len()) as u64)
    }

    async fn clear_expired_invites(&self) -> Result<u64, StoreError> {
        let mut t = self.lock()?;
        let now = Utc::now();
        let before = t.invites.len();
        t.invites
            .retain(|i| i.accepted_at.is_some() || i.expires_at >= now);
        Ok((before - t.invites.len()) as u64)
    }
}
