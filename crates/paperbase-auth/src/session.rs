//! Session lifecycle: issuance, validation, revocation.

use std::sync::Arc;

use chrono::{Duration, Utc};

use paperbase_storage::{CreateSessionParams, Session, Store, StoreError, User, UserId};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Issues and validates long-lived session tokens bound to a user.
pub struct SessionManager<S> {
    store: Arc<S>,
    config: AuthConfig,
}

impl<S: Store> SessionManager<S> {
    pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Issue a brand-new session. Tokens are never reused; multiple live
    /// sessions per user are permitted (multi-device).
    pub async fn create(&self, user_id: &UserId) -> Result<Session, AuthError> {
        let token = paperbase_token::opaque_token();
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        Ok(self
            .store
            .insert_session(&CreateSessionParams {
                user_id: user_id.clone(),
                token,
                expires_at,
            })
            .await?)
    }

    /// Resolve a session token to its user.
    pub async fn validate(&self, token: &str) -> Result<User, AuthError> {
        let session = match self.store.get_session_by_token(token).await {
            Ok(session) => session,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        if session.expires_at < Utc::now() {
            // Sessions have no sweep; delete on observation instead.
            let _ = self.store.delete_session(token).await;
            return Err(AuthError::Expired);
        }

        match self.store.get_user_by_id(&session.user_id).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a session (logout). Idempotent.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        Ok(self.store.delete_session(token).await?)
    }
}
