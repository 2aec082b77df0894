//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

/// One-time code identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OtpId(pub Uuid);

/// Refresh token identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

/// Workspace identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkspaceId(pub Uuid);

/// Workspace invite identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InviteId(pub Uuid);
