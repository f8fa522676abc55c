//! # alumni-auth
//!
//! Stateless building blocks for authentication and authorization.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password policy
//! - `jwt`: session token claims, signing and verification
//! - `guard`: role and permission predicates evaluated against claims
//!
//! Nothing in this crate touches storage; services in `alumni-service`
//! combine these pieces with the stores.

pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::{AccessDenied, AccessRequirement};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenSubject};
pub use password::{PasswordHasher, PasswordValidator};
