//! # alumni-database
//!
//! Persistence for users, roles, role assignments and alumni records.
//!
//! Services depend only on the object-safe store traits in [`store`]. Two
//! implementations exist: PostgreSQL repositories over a bounded sqlx pool
//! ([`repositories`]) and a process-local [`memory::MemoryStore`] used by
//! tests and by `provider = "memory"` deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{AlumniStore, AssignmentStore, RoleStore, Stores, UserStore};
