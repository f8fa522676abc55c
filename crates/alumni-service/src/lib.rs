//! # alumni-service
//!
//! Business logic for the alumni portal. Each service orchestrates the
//! stores from `alumni-database` and the primitives from `alumni-auth`.
//!
//! Services follow constructor injection: every dependency is handed in at
//! construction time as an `Arc`, so tests run the same code against the
//! in-memory store.

pub mod alumni;
pub mod assignment;
pub mod auth;
pub mod context;
pub mod credential;
#[cfg(feature = "dev-endpoints")]
pub mod devtools;
pub mod registration;
pub mod role;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use alumni::AlumniService;
pub use assignment::AssignmentLedger;
pub use auth::{AuthenticatedUser, Authenticator, LoginOutcome};
pub use context::RequestContext;
pub use credential::{CredentialStore, NewUser};
pub use registration::{Registration, RegistrationOutcome, RegistrationService};
pub use role::RoleRegistry;
pub use user::{UserAdminService, UserDetail};

#[cfg(feature = "dev-endpoints")]
pub use devtools::DevTools;
