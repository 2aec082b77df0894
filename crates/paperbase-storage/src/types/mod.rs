//! Type definitions for paperbase storage.

mod ids;
mod invites;
mod members;
mod otps;
mod roles;
mod sessions;
mod tokens;
mod users;
mod workspaces;

// Re-export all types from submodules
pub use ids::*;
pub use invites::*;
pub use members::*;
pub use otps::*;
pub use roles::*;
pub use sessions::*;
pub use tokens::*;
pub use users::*;
pub use workspaces::*;
