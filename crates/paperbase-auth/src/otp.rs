//! One-time login codes: issuance and verification.
//!
//! State machine per email: no code → active code → consumed on a correct
//! verify, or left to expire / hit the attempt cap and be swept. At most one
//! code exists per email at any time; `request` replaces any prior code in a
//! single conditional write.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

use paperbase_storage::{PutOtpParams, Store, StoreError};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::normalize_email;

/// A freshly issued code, returned to the caller for side-channel delivery
/// (email). Never persisted outside the store row.
#[derive(Debug, Clone)]
pub struct OtpIssued {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates one-time login codes.
pub struct OtpVerifier<S> {
    store: Arc<S>,
    config: AuthConfig,
}

impl<S: Store> OtpVerifier<S> {
    pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Issue a fresh code for the email, superseding any outstanding one.
    pub async fn request(&self, email: &str) -> Result<OtpIssued, AuthError> {
        let email = normalize_email(email);
        let code = paperbase_token::numeric_code(self.config.otp_code_length);
        let expires_at = Utc::now() + Duration::seconds(self.config.otp_lifetime_secs as i64);

        let otp = self
            .store
            .put_otp(&PutOtpParams {
                email: email.clone(),
                code: code.clone(),
                expires_at,
            })
            .await?;

        Ok(OtpIssued {
            email,
            code,
            expires_at: otp.expires_at,
        })
    }

    /// Verify a submitted code. On success the code is consumed (single-use)
    /// and the bound email is returned.
    pub async fn verify(&self, email: &str, submitted: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let otp = match self.store.get_otp(&email).await {
            Ok(otp) => otp,
            Err(StoreError::NotFound) => return Err(AuthError::NotFound),
            Err(e) => return Err(e.into()),
        };

        if otp.expires_at < Utc::now() {
            // Eager cleanup; the sweep would get it anyway.
            let _ = self.store.delete_otp(&email).await;
            return Err(AuthError::Expired);
        }

        if otp.attempts >= self.config.otp_max_attempts {
            return Err(AuthError::AttemptsExceeded);
        }

        let matches: bool = submitted.as_bytes().ct_eq(otp.code.as_bytes()).into();
        if !matches {
            match self.store.increment_otp_attempts(&email).await {
                // The row may have been replaced or swept mid-verify.
                Ok(_) | Err(StoreError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
            return Err(AuthError::InvalidCode);
        }

        self.store.delete_otp(&email).await?;
        Ok(otp.email)
    }

    /// Explicitly cancel the outstanding code for an email. Idempotent.
    pub async fn cancel(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        Ok(self.store.delete_otp(&email).await?)
    }

    /// Remove all codes past their expiry. Returns the number removed.
    pub async fn clear_expired(&self) -> Result<u64, AuthError> {
        Ok(self.store.clear_expired_otps().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperbase_store_memory::MemoryStore;

    fn verifier(config: AuthConfig) -> OtpVerifier<MemoryStore> {
        OtpVerifier::new(Arc::new(MemoryStore::new()), config)
    }

    #[tokio::test]
    async fn request_twice_leaves_one_code() {
        let v = verifier(AuthConfig::default());
        let first = v.request("a@x.com").await.unwrap();
        let second = v.request("a@x.com").await.unwrap();

        // Only the second code verifies.
        assert!(matches!(
            v.verify("a@x.com", &first.code).await,
            Err(AuthError::InvalidCode)
        ));
        assert_eq!(v.verify("a@x.com", &second.code).await.unwrap(), "a@x.com");
    }

    #[tokio::test]
    async fn correct_code_verifies_exactly_once() {
        let v = verifier(AuthConfig::default());
        let issued = v.request("a@x.com").await.unwrap();

        assert!(v.verify("a@x.com", &issued.code).await.is_ok());
        // Consumed: the second attempt has no row to check.
        assert!(matches!(
            v.verify("a@x.com", &issued.code).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_cleaned_up() {
        let v = verifier(AuthConfig {
            otp_lifetime_secs: 0,
            ..Default::default()
        });
        let issued = v.request("a@x.com").await.unwrap();

        assert!(matches!(
            v.verify("a@x.com", &issued.code).await,
            Err(AuthError::Expired)
        ));
        // The row was deleted on observation.
        assert!(matches!(
            v.verify("a@x.com", &issued.code).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn attempt_cap_blocks_even_the_correct_code() {
        let v = verifier(AuthConfig {
            otp_max_attempts: 3,
            ..Default::default()
        });
        let issued = v.request("a@x.com").await.unwrap();

        for _ in 0..3 {
            assert!(matches!(
                v.verify("a@x.com", "000000").await,
                Err(AuthError::InvalidCode)
            ));
        }
        // Cap reached: the correct code no longer helps.
        assert!(matches!(
            v.verify("a@x.com", &issued.code).await,
            Err(AuthError::AttemptsExceeded)
        ));
    }

    #[tokio::test]
    async fn wrong_code_below_cap_leaves_code_usable() {
        let v = verifier(AuthConfig::default());
        let issued = v.request("a@x.com").await.unwrap();

        assert!(matches!(
            v.verify("a@x.com", "999999").await,
            Err(AuthError::InvalidCode)
        ));
        assert!(v.verify("a@x.com", &issued.code).await.is_ok());
    }

    #[tokio::test]
    async fn cancel_resets_to_no_code() {
        let v = verifier(AuthConfig::default());
        let issued = v.request("a@x.com").await.unwrap();
        v.cancel("a@x.com").await.unwrap();
        v.cancel("a@x.com").await.unwrap(); // idempotent

        assert!(matches!(
            v.verify("a@x.com", &issued.code).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn email_is_normalized_between_request_and_verify() {
        let v = verifier(AuthConfig::default());
        let issued = v.request("  A@X.com ").await.unwrap();
        assert_eq!(issued.email, "a@x.com");
        assert_eq!(v.verify("a@x.COM", &issued.code).await.unwrap(), "a@x.com");
    }

    #[tokio::test]
    async fn clear_expired_spares_live_codes() {
        let store = Arc::new(MemoryStore::new());
        let live = OtpVerifier::new(store.clone(), AuthConfig::default());
        let dead = OtpVerifier::new(
            store,
            AuthConfig {
                otp_lifetime_secs: 0,
                ..Default::default()
            },
        );

        let keep = live.request("keep@x.com").await.unwrap();
        dead.request("gone@x.com").await.unwrap();

        assert_eq!(live.clear_expired().await.unwrap(), 1);
        assert!(live.verify("keep@x.com", &keep.code).await.is_ok());
    }
}
