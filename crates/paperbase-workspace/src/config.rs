//! Workspace configuration.

/// Configuration for the tenancy services.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Invite lifetime in seconds (default: 604_800 = 7 days).
    pub invite_lifetime_secs: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            invite_lifetime_secs: 604_800,
        }
    }
}
