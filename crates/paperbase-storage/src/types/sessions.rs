//! Session types.

use chrono::{DateTime, Utc};

use super::{SessionId, UserId};

/// Session record. Multiple live sessions per user are permitted
/// (multi-device); each issuance gets its own row and token.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String, // Globally unique opaque token
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a session
#[derive(Clone, Debug)]
pub struct CreateSessionParams {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
