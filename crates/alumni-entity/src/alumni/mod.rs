//! Alumni directory entities.

pub mod model;

pub use model::{Alumni, AlumniFields, AlumniYearCount};
