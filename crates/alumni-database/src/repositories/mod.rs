//! PostgreSQL implementations of the store traits.

pub mod alumni;
pub mod assignment;
pub mod role;
pub mod user;

pub use alumni::PgAlumniRepository;
pub use assignment::PgAssignmentRepository;
pub use role::PgRoleRepository;
pub use user::PgUserRepository;
