//! User domain entities.

pub mod model;
pub mod profile;

pub use model::{CreateUser, UpdateUser, User, UserWithRoles};
pub use profile::{RoleHolder, UserProfile, UserSummary};
