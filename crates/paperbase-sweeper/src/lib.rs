//! Periodic purge of expired one-time codes, refresh tokens, and invites.
//!
//! Each sweep target is independent and idempotent; a failing target is
//! logged and reported but never blocks the others. The sweep only removes
//! rows whose expiry has strictly passed at the moment of its own read, so
//! it is safe to run concurrently with any request-path operation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use paperbase_auth::{AuthConfig, OtpVerifier, RefreshTokenRotator};
use paperbase_storage::Store;
use paperbase_workspace::{InviteManager, WorkspaceConfig};

/// Sweeper configuration.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Seconds between sweeps (default: 300).
    pub interval_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

/// Per-target removal counts for one sweep pass. `None` means that target's
/// sweep failed; the failure was logged and the other targets still ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub otps: Option<u64>,
    pub refresh_tokens: Option<u64>,
    pub invites: Option<u64>,
}

/// Periodic process that keeps the store free of expired rows.
pub struct ExpirySweeper<S> {
    otps: OtpVerifier<S>,
    refresh_tokens: RefreshTokenRotator<S>,
    invites: InviteManager<S>,
    config: SweeperConfig,
}

impl<S: Store> ExpirySweeper<S> {
    pub fn new(
        store: Arc<S>,
        auth_config: AuthConfig,
        workspace_config: WorkspaceConfig,
        config: SweeperConfig,
    ) -> Self {
        Self {
            otps: OtpVerifier::new(store.clone(), auth_config.clone()),
            refresh_tokens: RefreshTokenRotator::new(store.clone(), auth_config),
            invites: InviteManager::new(store, workspace_config),
            config,
        }
    }

    /// Run a single sweep over all targets.
    pub async fn sweep_once(&self) -> SweepReport {
        let mut report = SweepReport::default();

        match self.otps.clear_expired().await {
            Ok(removed) => report.otps = Some(removed),
            Err(e) => warn!(error = %e, "otp sweep failed"),
        }
        match self.refresh_tokens.clear_expired().await {
            Ok(removed) => report.refresh_tokens = Some(removed),
            Err(e) => warn!(error = %e, "refresh token sweep failed"),
        }
        match self.invites.clear_expired().await {
            Ok(removed) => report.invites = Some(removed),
            Err(e) => warn!(error = %e, "invite sweep failed"),
        }

        debug!(
            otps = ?report.otps,
            refresh_tokens = ?report.refresh_tokens,
            invites = ?report.invites,
            "sweep complete"
        );
        report
    }

    /// Sweep on the configured interval, forever. The first pass runs
    /// immediately.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        loop {
            interval.tick().await;
            self.sweep_once().await;
        }
    }
}
