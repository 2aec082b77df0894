//! User types.

use chrono::{DateTime, Utc};

use super::{UserId, WorkspaceId};

/// User record
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub default_workspace_id: Option<WorkspaceId>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// Partial update for a user's profile fields. `None` leaves the field
/// untouched.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub default_workspace_id: Option<WorkspaceId>,
}

/// Denormalized user projection joined into member listings.
#[derive(Clone, Debug)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
