//! Refresh token types.

use chrono::{DateTime, Utc};

use super::{RefreshTokenId, UserId};

/// Refresh token record.
///
/// Revocation is a patch, not a delete: a revoked row stays visible (audit
/// trail) until the sweep or an explicit delete removes it, and once
/// `revoked` is set it never becomes valid again.
#[derive(Clone, Debug)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token: String, // Globally unique opaque token
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Parameters for creating a refresh token
#[derive(Clone, Debug)]
pub struct CreateRefreshTokenParams {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
