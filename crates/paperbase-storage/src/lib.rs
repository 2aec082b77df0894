//! Storage abstraction for the paperbase identity and workspace core.
//!
//! Backend crates (e.g. `paperbase-store-memory`) implement the [`Store`]
//! trait so the service crates don't depend on any specific database engine
//! or schema details.

use thiserror::Error;

mod store;
pub mod types;

pub use store::Store;
#[cfg(feature = "test-support")]
pub use store::MockStore;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}
