//! Refresh token lifecycle: issue, lookup, revoke, sweep.
//!
//! Revocation is a patch, never a delete, so a revoked token stays visible
//! until swept. `revoke_all_for_user` patches rows independently — it is a
//! best-effort bulk operation, not a serializable transaction; a token
//! issued after it completes is unaffected.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use paperbase_storage::{CreateRefreshTokenParams, RefreshToken, Store, StoreError, UserId};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Issues, validates, and revokes refresh tokens used to mint new sessions
/// without re-authentication.
pub struct RefreshTokenRotator<S> {
    store: Arc<S>,
    config: AuthConfig,
}

impl<S: Store> RefreshTokenRotator<S> {
    pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Store a new, unrevoked token for the user.
    pub async fn issue(&self, user_id: &UserId) -> Result<RefreshToken, AuthError> {
        let token = paperbase_token::opaque_token();
        let expires_at =
            Utc::now() + Duration::seconds(self.config.refresh_token_lifetime_secs as i64);

        Ok(self
            .store
            .insert_refresh_token(&CreateRefreshTokenParams {
                user_id: user_id.clone(),
                token,
                expires_at,
            })
            .await?)
    }

    /// Look up a token. The caller inspects `revoked` and `expires_at`.
    pub async fn lookup(&self, token: &str) -> Result<RefreshToken, AuthError> {
        match self.store.get_refresh_token(token).await {
            Ok(row) => Ok(row),
            Err(StoreError::NotFound) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a token revoked. Idempotent; the row is preserved until swept.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        Ok(self.store.revoke_refresh_token(token).await?)
    }

    /// Revoke every outstanding token for the user ("sign out everywhere").
    /// Returns the number of tokens revoked.
    pub async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, AuthError> {
        let revoked = self.store.revoke_all_refresh_tokens(user_id).await?;
        info!(user = %user_id.0, revoked, "revoked all refresh tokens");
        Ok(revoked)
    }

    /// Physically remove a token row. Idempotent.
    pub async fn delete_token(&self, token: &str) -> Result<(), AuthError> {
        Ok(self.store.delete_refresh_token(token).await?)
    }

    /// Remove all tokens past their expiry. Returns the number removed.
    pub async fn clear_expired(&self) -> Result<u64, AuthError> {
        Ok(self.store.clear_expired_refresh_tokens().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperbase_storage::User;
    use paperbase_store_memory::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store.create_or_update_user("a@x.com").await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn issue_then_lookup_unrevoked() {
        let (store, user) = setup().await;
        let rotator = RefreshTokenRotator::new(store, AuthConfig::default());

        let issued = rotator.issue(&user.id).await.unwrap();
        let row = rotator.lookup(&issued.token).await.unwrap();
        assert!(!row.revoked);
        assert_eq!(row.user_id, user.id);
    }

    #[tokio::test]
    async fn revoked_token_remains_visible() {
        let (store, user) = setup().await;
        let rotator = RefreshTokenRotator::new(store, AuthConfig::default());

        let issued = rotator.issue(&user.id).await.unwrap();
        rotator.revoke(&issued.token).await.unwrap();
        rotator.revoke(&issued.token).await.unwrap(); // idempotent

        assert!(rotator.lookup(&issued.token).await.unwrap().revoked);

        // A token issued afterwards starts unrevoked.
        let fresh = rotator.issue(&user.id).await.unwrap();
        assert!(!rotator.lookup(&fresh.token).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn revoke_all_spares_later_issues() {
        let (store, user) = setup().await;
        let rotator = RefreshTokenRotator::new(store, AuthConfig::default());

        let before1 = rotator.issue(&user.id).await.unwrap();
        let before2 = rotator.issue(&user.id).await.unwrap();
        assert_eq!(rotator.revoke_all_for_user(&user.id).await.unwrap(), 2);

        let after = rotator.issue(&user.id).await.unwrap();
        assert!(rotator.lookup(&before1.token).await.unwrap().revoked);
        assert!(rotator.lookup(&before2.token).await.unwrap().revoked);
        assert!(!rotator.lookup(&after.token).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn revoke_all_only_counts_other_users_out() {
        let (store, user) = setup().await;
        let other = store.create_or_update_user("b@x.com").await.unwrap();
        let rotator = RefreshTokenRotator::new(store, AuthConfig::default());

        rotator.issue(&user.id).await.unwrap();
        let others = rotator.issue(&other.id).await.unwrap();

        assert_eq!(rotator.revoke_all_for_user(&user.id).await.unwrap(), 1);
        assert!(!rotator.lookup(&others.token).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (store, user) = setup().await;
        let rotator = RefreshTokenRotator::new(store, AuthConfig::default());

        let issued = rotator.issue(&user.id).await.unwrap();
        rotator.delete_token(&issued.token).await.unwrap();
        assert!(matches!(
            rotator.lookup(&issued.token).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn clear_expired_spares_live_tokens() {
        let (store, user) = setup().await;
        let live = RefreshTokenRotator::new(store.clone(), AuthConfig::default());
        let dead = RefreshTokenRotator::new(
            store,
            AuthConfig {
                refresh_token_lifetime_secs: 0,
                ..Default::default()
            },
        );

        let keep = live.issue(&user.id).await.unwrap();
        dead.issue(&user.id).await.unwrap();

        assert_eq!(live.clear_expired().await.unwrap(), 1);
        assert!(live.lookup(&keep.token).await.is_ok());
    }
}
