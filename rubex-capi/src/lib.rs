#[macro_use]
mod macros;
mod api;
mod error;

pub use crate::api::*;
pub use crate::error::*;
