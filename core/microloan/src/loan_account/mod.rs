mod entity;
pub mod error;

pub use entity::*;
pub use error::{LoanAccountError, LoanStateViolation};
