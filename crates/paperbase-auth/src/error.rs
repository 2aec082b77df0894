//! Authentication error types.

use paperbase_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by the identity services.
///
/// Everything except `Store` is an expected business outcome: an expired or
/// exhausted code prompts a fresh request, an invalid token forces
/// re-authentication. `Store` passes a backend failure through unchanged;
/// the caller may retry with backoff, this layer never retries internally.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found")]
    NotFound,

    #[error("expired")]
    Expired,

    #[error("too many attempts")]
    AttemptsExceeded,

    #[error("invalid code")]
    InvalidCode,

    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    Store(#[from] StoreError),
}
