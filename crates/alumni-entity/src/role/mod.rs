//! Role domain entities.

pub mod builtin;
pub mod model;
pub mod permission;

pub use builtin::{ADMIN_ROLE, BUILT_IN_ROLES, is_built_in};
pub use model::{CreateRole, Role, RoleSummary, UpdateRole};
pub use permission::PermissionSet;
