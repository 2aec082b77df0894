//! User identity operations — lookup and the login upsert.

use std::sync::Arc;

use paperbase_storage::{Store, StoreError, User, UserId, UserPatch};

use crate::error::AuthError;

/// Normalize an email address for use as a lookup key.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Persistent record of users, keyed by email.
pub struct IdentityService<S> {
    store: Arc<S>,
}

impl<S: Store> IdentityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Upsert the user for a successful login: an existing user gets
    /// `last_login_at` bumped, a first-time login inserts a fresh row.
    pub async fn login_or_create(&self, email: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        Ok(self.store.create_or_update_user(&email).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        match self.store.get_user_by_email(&email).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_id(&self, user_id: &UserId) -> Result<User, AuthError> {
        match self.store.get_user_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Patch profile fields (name, avatar, default workspace).
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        patch: &UserPatch,
    ) -> Result<User, AuthError> {
        match self.store.update_user_profile(user_id, patch).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
