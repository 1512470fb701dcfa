#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

mod amount;
mod asset;
pub mod error;
mod rate;

pub use amount::*;
pub use asset::*;
pub use error::MoneyError;
pub use rate::*;
