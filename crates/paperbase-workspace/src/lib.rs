//! Workspace tenancy services: registry, membership, and time-boxed
//! invitations, all speaking to an abstract [`paperbase_storage::Store`].

pub mod config;
pub mod error;
pub mod invite;
pub mod membership;
pub mod registry;
pub mod slug;

pub use config::WorkspaceConfig;
pub use error::{SagaStep, WorkspaceError};
pub use invite::InviteManager;
pub use membership::{MemberUpsert, MemberWithUser, MembershipManager};
pub use registry::{WorkspaceRegistry, WorkspaceWithRole};
