//! User-role assignment entities.

pub mod model;

pub use model::UserRoleAssignment;
